//! Explicit filter selection applied before every aggregation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ResultRecord;

/// Errors building a filter from user input.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid rank range: min {min} is greater than max {max}")]
    InvalidRankRange { min: u32, max: u32 },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(s.to_string()))
}

/// A conjunction of constraints; unset or empty fields do not restrict.
///
/// Event types compare case-insensitively. Player, deck and event names
/// compare exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub date_start: Option<NaiveDate>,

    #[serde(default)]
    pub date_end: Option<NaiveDate>,

    /// Event types, compared case-insensitively.
    #[serde(default)]
    pub event_types: BTreeSet<String>,

    #[serde(default)]
    pub event_names: BTreeSet<String>,

    #[serde(default)]
    pub player: Option<String>,

    #[serde(default)]
    pub deck: Option<String>,

    #[serde(default)]
    pub deck_exclude: BTreeSet<String>,

    #[serde(default)]
    pub rank_min: Option<u32>,

    #[serde(default)]
    pub rank_max: Option<u32>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record of a single event.
    pub fn for_event(name: impl Into<String>) -> Self {
        Self::new().with_event(name)
    }

    /// Every record of a single player.
    pub fn for_player(name: impl Into<String>) -> Self {
        Self::new().with_player(name)
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    pub fn with_event_type(mut self, event_type: &str) -> Self {
        self.event_types.insert(event_type.trim().to_lowercase());
        self
    }

    pub fn with_event_types<I, S>(self, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        event_types
            .into_iter()
            .fold(self, |spec, t| spec.with_event_type(t.as_ref()))
    }

    pub fn with_event(mut self, name: impl Into<String>) -> Self {
        self.event_names.insert(name.into());
        self
    }

    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.player = Some(name.into());
        self
    }

    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = Some(deck.into());
        self
    }

    pub fn excluding_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck_exclude.insert(deck.into());
        self
    }

    pub fn with_rank_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.rank_min = min;
        self.rank_max = max;
        self
    }

    /// Check the filter is satisfiable before use.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            if start > end {
                return Err(FilterError::InvalidDateRange { start, end });
            }
        }
        if let (Some(min), Some(max)) = (self.rank_min, self.rank_max) {
            if min > max {
                return Err(FilterError::InvalidRankRange { min, max });
            }
        }
        Ok(())
    }

    pub fn has_rank_range(&self) -> bool {
        self.rank_min.is_some() || self.rank_max.is_some()
    }

    /// Whether a rank passes the rank slicer. Bounds default to 1 and
    /// unbounded once either is set.
    pub fn rank_matches(&self, rank: u32) -> bool {
        if !self.has_rank_range() {
            return true;
        }
        let min = self.rank_min.unwrap_or(1);
        let max = self.rank_max.unwrap_or(u32::MAX);
        rank >= min && rank <= max
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        if self.date_start.is_some_and(|start| record.date < start) {
            return false;
        }
        if self.date_end.is_some_and(|end| record.date > end) {
            return false;
        }
        if !self.event_types.is_empty() {
            let event_type = record.event_type.to_lowercase();
            if !self.event_types.iter().any(|t| t.to_lowercase() == event_type) {
                return false;
            }
        }
        if !self.event_names.is_empty() && !self.event_names.contains(&record.event) {
            return false;
        }
        if self.player.as_ref().is_some_and(|p| *p != record.player) {
            return false;
        }
        if self.deck.as_ref().is_some_and(|d| *d != record.deck) {
            return false;
        }
        if self.deck_exclude.contains(&record.deck) {
            return false;
        }
        self.rank_matches(record.rank)
    }
}
