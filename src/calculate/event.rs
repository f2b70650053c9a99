//! Single-event and date-range summaries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::deck::{aggregate_decks, most_copied, DeckCopies, DeckScope, DeckStat};
use super::ranking::{compare_names, rank_by, ties_at_max, ties_at_min, Named};
use super::{meta_share, win_rate};
use crate::models::{RankBucket, RankBucketCounts, ResultRecord, WinLoss};

/// A player's finish, as shown on the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFinish {
    pub player: String,
    pub deck: String,
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

impl From<&ResultRecord> for PlayerFinish {
    fn from(record: &ResultRecord) -> Self {
        Self {
            player: record.player.clone(),
            deck: record.deck.clone(),
            rank: record.rank,
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate(),
        }
    }
}

/// First entry with the given finishing rank.
pub fn finisher(records: &[&ResultRecord], rank: u32) -> Option<PlayerFinish> {
    records
        .iter()
        .find(|r| r.rank == rank)
        .map(|r| PlayerFinish::from(*r))
}

/// A deck leading one rank bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketDeck {
    pub deck: String,
    /// Copies finishing inside the bucket.
    pub copies: u32,
    /// Win rate of those copies only.
    pub win_rate: f64,
    /// Share of the whole scope.
    pub meta_share: f64,
}

/// Who leads a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketLeaders {
    /// No valid deck finished in the bucket.
    Empty,
    /// Several decks finished there, none more than once.
    AllUnique,
    /// Deck(s) tied for most copies, in name order.
    Leaders { decks: Vec<BucketDeck> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTopDecks {
    pub bucket: RankBucket,
    /// Every valid deck that finished in the bucket, in name order.
    pub decks: Vec<String>,
    pub leaders: BucketLeaders,
}

#[derive(Default)]
struct BucketTally<'a> {
    copies: BTreeMap<&'a str, (u32, WinLoss)>,
}

/// Bucket leaders over `records`, sentinel decks excluded.
pub fn top_decks_by_bucket(records: &[&ResultRecord]) -> Vec<BucketTopDecks> {
    let total = records.len() as u32;
    let mut scope_counts: BTreeMap<&str, u32> = BTreeMap::new();
    let mut tallies: BTreeMap<RankBucket, BucketTally> = BTreeMap::new();

    for record in records.iter().copied().filter(|r| !r.is_sentinel()) {
        *scope_counts.entry(record.deck.as_str()).or_insert(0) += 1;
        let slot = tallies
            .entry(record.bucket())
            .or_default()
            .copies
            .entry(record.deck.as_str())
            .or_insert((0, WinLoss::default()));
        slot.0 += 1;
        slot.1.add(record);
    }

    RankBucket::ALL
        .iter()
        .map(|&bucket| {
            let copies = tallies.remove(&bucket).unwrap_or_default().copies;
            let mut decks: Vec<String> = copies.keys().map(|d| d.to_string()).collect();
            decks.sort_by(|a, b| compare_names(a, b));

            let max = copies.values().map(|(n, _)| *n).max().unwrap_or(0);
            let leaders = if copies.is_empty() {
                BucketLeaders::Empty
            } else if max == 1 && copies.len() > 1 {
                BucketLeaders::AllUnique
            } else {
                let mut leading: Vec<BucketDeck> = copies
                    .iter()
                    .filter(|(_, (n, _))| *n == max)
                    .map(|(deck, (n, wl))| BucketDeck {
                        deck: deck.to_string(),
                        copies: *n,
                        win_rate: wl.win_rate(),
                        meta_share: meta_share(
                            scope_counts.get(deck).copied().unwrap_or(0),
                            total,
                        ),
                    })
                    .collect();
                leading.sort_by(|a, b| compare_names(&a.deck, &b.deck));
                BucketLeaders::Leaders { decks: leading }
            };

            BucketTopDecks {
                bucket,
                decks,
                leaders,
            }
        })
        .collect()
}

/// Summary cards for one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: Option<String>,
    pub date: Option<NaiveDate>,
    pub total_players: u32,
    pub top_player: Option<PlayerFinish>,
    pub runner_up: Option<PlayerFinish>,
    pub most_copied: DeckCopies,
    pub top_decks_by_bucket: Vec<BucketTopDecks>,
    /// Valid-deck entries per bucket.
    pub bucket_deck_counts: RankBucketCounts,
}

/// Summarize the records of a single event.
pub fn summarize_event(records: &[&ResultRecord]) -> EventSummary {
    trace!("Summarizing event over {} records", records.len());
    let first = records.first();
    EventSummary {
        event: first.map(|r| r.event.clone()),
        date: first.map(|r| r.date),
        total_players: records.len() as u32,
        top_player: finisher(records, 1),
        runner_up: finisher(records, 2),
        most_copied: most_copied(records),
        top_decks_by_bucket: top_decks_by_bucket(records),
        bucket_deck_counts: records
            .iter()
            .filter(|r| !r.is_sentinel())
            .map(|r| r.rank)
            .collect(),
    }
}

/// Attendance of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSize {
    pub event: String,
    pub date: NaiveDate,
    pub players: u32,
}

impl Named for EventSize {
    fn name(&self) -> &str {
        &self.event
    }
}

/// One entry per distinct event, largest first.
pub fn event_sizes(records: &[&ResultRecord]) -> Vec<EventSize> {
    let mut sizes: BTreeMap<&str, EventSize> = BTreeMap::new();
    for record in records.iter().copied() {
        sizes
            .entry(record.event.as_str())
            .or_insert_with(|| EventSize {
                event: record.event.clone(),
                date: record.date,
                players: 0,
            })
            .players += 1;
    }
    let mut sizes: Vec<EventSize> = sizes.into_values().collect();
    rank_by(&mut sizes, |s| s.players as f64);
    sizes
}

/// Summary cards for a date range spanning several events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub total_events: u32,
    pub total_players: u32,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub most_players_event: Option<EventSize>,
    pub least_players_event: Option<EventSize>,
    pub most_copied: DeckCopies,
    pub top_decks_by_bucket: Vec<BucketTopDecks>,
    /// Valid decks ranked by meta share.
    pub decks: Vec<DeckStat>,
    /// Win rate over every game in the range.
    pub overall_win_rate: f64,
}

/// Summarize a multi-event scope.
pub fn summarize_range(records: &[&ResultRecord]) -> RangeSummary {
    let sizes = event_sizes(records);
    let games: WinLoss = records.iter().copied().collect();

    RangeSummary {
        total_events: sizes.len() as u32,
        total_players: records.len() as u32,
        first_date: records.iter().map(|r| r.date).min(),
        last_date: records.iter().map(|r| r.date).max(),
        most_players_event: ties_at_max(&sizes, |s| s.players as f64)
            .first()
            .map(|s| (*s).clone()),
        least_players_event: ties_at_min(&sizes, |s| s.players as f64)
            .first()
            .map(|s| (*s).clone()),
        most_copied: most_copied(records),
        top_decks_by_bucket: top_decks_by_bucket(records),
        decks: aggregate_decks(records, DeckScope::ValidOnly),
        overall_win_rate: win_rate(games.wins, games.losses),
    }
}
