//! Applying filter selections and building the option lists behind them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ranking::{compare_names, sort_names};
use crate::models::{FilterSpec, ResultRecord};

/// Records satisfying every constraint of `spec`, in input order.
pub fn filter_records<'a>(
    records: &'a [ResultRecord],
    spec: &FilterSpec,
) -> Vec<&'a ResultRecord> {
    let selected: Vec<&ResultRecord> = records.iter().filter(|r| spec.matches(r)).collect();
    debug!("Filter kept {} of {} records", selected.len(), records.len());
    selected
}

/// Rank-position slicer applied on its own after the other filters.
pub fn slice_by_rank<'a>(
    records: &[&'a ResultRecord],
    rank_min: Option<u32>,
    rank_max: Option<u32>,
) -> Vec<&'a ResultRecord> {
    let spec = FilterSpec::new().with_rank_range(rank_min, rank_max);
    records
        .iter()
        .copied()
        .filter(|r| spec.rank_matches(r.rank))
        .collect()
}

/// An event in the event picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub name: String,
    pub date: NaiveDate,
    pub event_type: String,
}

/// Everything the filter controls offer for the current dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Newest first.
    pub events: Vec<EventOption>,
    pub players: Vec<String>,
    pub decks: Vec<String>,
    /// Oldest first.
    pub dates: Vec<NaiveDate>,
    pub event_types: Vec<String>,
    pub max_rank: u32,
}

impl FilterOptions {
    /// Build option lists. A non-empty `event_types` restricts the event
    /// list to those types (case-insensitive).
    pub fn from_records(records: &[ResultRecord], event_types: &[String]) -> Self {
        let wanted: BTreeSet<String> = event_types.iter().map(|t| t.to_lowercase()).collect();

        let mut events: BTreeMap<&str, EventOption> = BTreeMap::new();
        let mut players = BTreeSet::new();
        let mut decks = BTreeSet::new();
        let mut dates = BTreeSet::new();
        let mut types = BTreeSet::new();
        let mut max_rank = 0;

        for record in records {
            players.insert(record.player.clone());
            dates.insert(record.date);
            types.insert(record.event_type.to_lowercase());
            max_rank = max_rank.max(record.rank);
            if !record.is_sentinel() {
                decks.insert(record.deck.clone());
            }
            if wanted.is_empty() || wanted.contains(&record.event_type.to_lowercase()) {
                events.entry(record.event.as_str()).or_insert_with(|| EventOption {
                    name: record.event.clone(),
                    date: record.date,
                    event_type: record.event_type.clone(),
                });
            }
        }

        let mut events: Vec<EventOption> = events.into_values().collect();
        events.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| compare_names(&a.name, &b.name))
        });

        let mut players: Vec<String> = players.into_iter().collect();
        sort_names(&mut players);
        let mut decks: Vec<String> = decks.into_iter().collect();
        sort_names(&mut decks);

        Self {
            events,
            players,
            decks,
            dates: dates.into_iter().collect(),
            event_types: types.into_iter().collect(),
            max_rank,
        }
    }
}

/// Dates a player attended, oldest first.
pub fn player_dates(records: &[ResultRecord], player: &str) -> Vec<NaiveDate> {
    records
        .iter()
        .filter(|r| r.player == player)
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
