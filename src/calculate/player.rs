//! Player histories: deck usage, performance and finishes across events.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ranking::{rank_by, ties_at_max, ties_at_min, Named};
use super::{mean, percent_of};
use crate::format::months_between;
use crate::models::{RankBucket, RankBucketCounts, ResultRecord, WinLoss};

/// A win rate achieved in one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWinRate {
    pub event: String,
    pub date: NaiveDate,
    pub win_rate: f64,
}

/// How a player fared with one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPerformance {
    pub deck: String,
    /// Distinct events played with the deck.
    pub event_count: u32,
    /// Records with the deck.
    pub entries: u32,
    pub wins: u32,
    pub losses: u32,
    pub overall_win_rate: f64,
    pub best_event: Option<EventWinRate>,
    pub worst_event: Option<EventWinRate>,
}

impl DeckPerformance {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

impl Named for DeckPerformance {
    fn name(&self) -> &str {
        &self.deck
    }
}

/// Which extreme a highlight card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    BestPerforming,
    WorstPerforming,
    MostPlayed,
    LeastPlayed,
}

impl HighlightKind {
    pub fn title(&self, tied: bool) -> String {
        let (lead, tail) = match self {
            HighlightKind::BestPerforming => ("Best", "Performing Deck"),
            HighlightKind::WorstPerforming => ("Worst", "Performing Deck"),
            HighlightKind::MostPlayed => ("Most", "Played Deck"),
            HighlightKind::LeastPlayed => ("Least", "Played Deck"),
        };
        if tied {
            format!("{} (Tied) {}", lead, tail)
        } else {
            format!("{} {}", lead, tail)
        }
    }
}

/// Deck(s) sharing an extreme value; several entries mean a tie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckHighlight {
    pub kind: HighlightKind,
    pub decks: Vec<DeckPerformance>,
}

impl DeckHighlight {
    fn new(kind: HighlightKind, decks: Vec<&DeckPerformance>) -> Self {
        Self {
            kind,
            decks: decks.into_iter().cloned().collect(),
        }
    }

    pub fn is_tied(&self) -> bool {
        self.decks.len() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn title(&self) -> String {
        self.kind.title(self.is_tied())
    }

    pub fn names(&self) -> Vec<&str> {
        self.decks.iter().map(|d| d.deck.as_str()).collect()
    }

    pub fn lead(&self) -> Option<&DeckPerformance> {
        self.decks.first()
    }
}

/// Time covered by a player's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
    /// Calendar months touched, counting both ends.
    pub months: u32,
    pub years: Vec<i32>,
}

impl EventSpan {
    pub fn from_dates(dates: &[NaiveDate]) -> Option<Self> {
        let first = *dates.iter().min()?;
        let last = *dates.iter().max()?;
        let years: BTreeSet<i32> = dates.iter().map(|d| d.year()).collect();
        Some(Self {
            first,
            last,
            months: months_between(first, last),
            years: years.into_iter().collect(),
        })
    }

    /// "14 Months (Years 2023, 2024)", or "Single Event" inside one month.
    pub fn label(&self) -> String {
        if self.months > 1 {
            let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
            format!("{} Months (Years {})", self.months, years.join(", "))
        } else {
            "Single Event".to_string()
        }
    }
}

/// Bucket finishes against the number of events played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConversion {
    pub counts: RankBucketCounts,
    pub total_events: u32,
}

impl RankConversion {
    pub fn rate(&self, bucket: RankBucket) -> f64 {
        percent_of(self.counts.get(bucket), self.total_events)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub event: String,
    pub deck: String,
    pub rank: u32,
}

/// Everything a player did on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub events: Vec<HistoryItem>,
}

/// Aggregated view of one player's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: Option<String>,
    pub total_events: u32,
    pub event_span: Option<EventSpan>,
    pub unique_decks: u32,
    pub most_played: DeckHighlight,
    pub least_played: DeckHighlight,
    pub rank_conversion: RankConversion,
    /// Ranked by overall win rate.
    pub deck_performance: Vec<DeckPerformance>,
    pub best_decks: DeckHighlight,
    pub worst_decks: DeckHighlight,
    /// `None` when no games were recorded.
    pub overall_win_rate: Option<f64>,
    pub history: Vec<HistoryEntry>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        profile_player(&[])
    }
}

fn distinct_events(records: &[&ResultRecord]) -> u32 {
    records
        .iter()
        .map(|r| r.event.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// Per-deck performance over `records`, "No Show" excluded.
pub fn deck_performance(records: &[&ResultRecord]) -> Vec<DeckPerformance> {
    let mut by_deck: BTreeMap<&str, Vec<&ResultRecord>> = BTreeMap::new();
    for record in records.iter().copied().filter(|r| !r.is_no_show()) {
        by_deck.entry(record.deck.as_str()).or_default().push(record);
    }

    let mut performance: Vec<DeckPerformance> = by_deck
        .into_iter()
        .map(|(deck, mut entries)| {
            entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event.cmp(&b.event)));
            let games: WinLoss = entries.iter().copied().collect();
            let to_event = |r: &ResultRecord| EventWinRate {
                event: r.event.clone(),
                date: r.date,
                win_rate: r.win_rate(),
            };
            // Earliest event wins ties.
            let best = entries
                .iter()
                .copied()
                .reduce(|best, r| if r.win_rate() > best.win_rate() { r } else { best });
            let worst = entries
                .iter()
                .copied()
                .reduce(|worst, r| if r.win_rate() < worst.win_rate() { r } else { worst });

            DeckPerformance {
                deck: deck.to_string(),
                event_count: distinct_events(&entries),
                entries: entries.len() as u32,
                wins: games.wins,
                losses: games.losses,
                overall_win_rate: games.win_rate(),
                best_event: best.map(to_event),
                worst_event: worst.map(to_event),
            }
        })
        .collect();

    rank_by(&mut performance, |d| d.overall_win_rate);
    performance
}

/// Build a player's profile from their (already player-scoped) records.
///
/// Every field has its own empty value, so an empty slice yields a
/// complete profile of zeroes and `None`s.
pub fn profile_player(records: &[&ResultRecord]) -> PlayerProfile {
    let total_events = distinct_events(records);
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let performance = deck_performance(records);

    let by_entries = |d: &DeckPerformance| d.entries as f64;
    let most_played =
        DeckHighlight::new(HighlightKind::MostPlayed, ties_at_max(&performance, by_entries));
    let least_played =
        DeckHighlight::new(HighlightKind::LeastPlayed, ties_at_min(&performance, by_entries));

    let played: Vec<DeckPerformance> = performance
        .iter()
        .filter(|d| d.games() > 0)
        .cloned()
        .collect();
    let by_rate = |d: &DeckPerformance| d.overall_win_rate;
    let best_decks =
        DeckHighlight::new(HighlightKind::BestPerforming, ties_at_max(&played, by_rate));
    let worst_decks =
        DeckHighlight::new(HighlightKind::WorstPerforming, ties_at_min(&played, by_rate));

    let games: WinLoss = records.iter().copied().filter(|r| !r.is_no_show()).collect();
    let overall_win_rate = (games.games() > 0).then(|| games.win_rate());

    PlayerProfile {
        player: records.first().map(|r| r.player.clone()),
        total_events,
        event_span: EventSpan::from_dates(&dates),
        unique_decks: performance.len() as u32,
        most_played,
        least_played,
        rank_conversion: RankConversion {
            counts: records.iter().map(|r| r.rank).collect(),
            total_events,
        },
        deck_performance: performance,
        best_decks,
        worst_decks,
        overall_win_rate,
        history: event_history(records),
    }
}

/// Events grouped by date, oldest first.
pub fn event_history(records: &[&ResultRecord]) -> Vec<HistoryEntry> {
    let mut by_date: BTreeMap<NaiveDate, Vec<HistoryItem>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(HistoryItem {
            event: record.event.clone(),
            deck: record.deck.clone(),
            rank: record.rank,
        });
    }
    by_date
        .into_iter()
        .map(|(date, events)| HistoryEntry { date, events })
        .collect()
}

/// One point on a player's win-rate line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEventPoint {
    pub date: NaiveDate,
    pub event: String,
    pub deck: String,
    pub rank: u32,
    pub win_rate: f64,
}

/// Chronological per-event win rate, optionally for one deck only.
pub fn player_win_rate_series(
    records: &[&ResultRecord],
    deck: Option<&str>,
) -> Vec<PlayerEventPoint> {
    let mut by_event: BTreeMap<(NaiveDate, &str), (WinLoss, &ResultRecord)> = BTreeMap::new();
    for record in records
        .iter()
        .copied()
        .filter(|r| !r.is_no_show())
        .filter(|r| deck.map_or(true, |d| r.deck == d))
    {
        by_event
            .entry((record.date, record.event.as_str()))
            .or_insert_with(|| (WinLoss::default(), record))
            .0
            .add(record);
    }

    by_event
        .into_values()
        .map(|(games, first)| PlayerEventPoint {
            date: first.date,
            event: first.event.clone(),
            deck: first.deck.clone(),
            rank: first.rank,
            win_rate: games.win_rate(),
        })
        .collect()
}

/// A player's average per-event win rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWinRate {
    pub player: String,
    pub events: u32,
    pub average_win_rate: f64,
}

impl Named for PlayerWinRate {
    fn name(&self) -> &str {
        &self.player
    }
}

/// Average win rate per player over the events they played, ranked.
///
/// Each event contributes its first record's reported win rate once.
pub fn player_leaderboard(records: &[&ResultRecord]) -> Vec<PlayerWinRate> {
    let mut by_player: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for record in records.iter().copied() {
        by_player
            .entry(record.player.as_str())
            .or_default()
            .entry(record.event.as_str())
            .or_insert_with(|| record.reported_win_rate_pct());
    }

    let mut board: Vec<PlayerWinRate> = by_player
        .into_iter()
        .map(|(player, events)| {
            let rates: Vec<f64> = events.into_values().collect();
            PlayerWinRate {
                player: player.to_string(),
                events: rates.len() as u32,
                average_win_rate: mean(&rates),
            }
        })
        .collect();
    rank_by(&mut board, |p| p.average_win_rate);
    board
}
