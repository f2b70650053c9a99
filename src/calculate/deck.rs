//! Per-deck aggregation: count, meta share, win rate and bucket conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::meta_share;
use super::ranking::{rank_by, ties_at_max, Named};
use crate::models::{
    is_sentinel_deck, RankBucket, RankBucketCounts, RankBucketPercents, ResultRecord, WinLoss,
};

/// Whether placeholder decks take part in an aggregation.
///
/// The meta-share denominator is every record in scope either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckScope {
    All,
    ValidOnly,
}

impl DeckScope {
    pub fn includes(&self, deck: &str) -> bool {
        match self {
            DeckScope::All => true,
            DeckScope::ValidOnly => !is_sentinel_deck(deck),
        }
    }
}

/// Aggregated statistics for one deck within a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckStat {
    pub deck: String,
    pub count: u32,
    /// Percent of all records in scope.
    pub meta_share: f64,
    pub wins: u32,
    pub losses: u32,
    /// Percent, 0 when no games were played.
    pub win_rate: f64,
    pub buckets: RankBucketCounts,
    /// Each bucket as a percent of `count`.
    pub bucket_percents: RankBucketPercents,
}

impl DeckStat {
    fn build(
        deck: &str,
        count: u32,
        record: WinLoss,
        buckets: RankBucketCounts,
        total: u32,
    ) -> Self {
        Self {
            deck: deck.to_string(),
            count,
            meta_share: meta_share(count, total),
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate(),
            buckets,
            bucket_percents: buckets.percents(count),
        }
    }

    pub fn empty(deck: &str) -> Self {
        Self::build(deck, 0, WinLoss::default(), RankBucketCounts::default(), 0)
    }

    /// Share of this deck's entries that finished in `bucket`.
    pub fn conversion(&self, bucket: RankBucket) -> f64 {
        self.bucket_percents.get(bucket)
    }
}

impl Named for DeckStat {
    fn name(&self) -> &str {
        &self.deck
    }
}

/// Metric decks can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckMetric {
    MetaShare,
    WinRate,
    Top8Conversion,
    Count,
}

impl DeckMetric {
    pub fn value(&self, stat: &DeckStat) -> f64 {
        match self {
            DeckMetric::MetaShare => stat.meta_share,
            DeckMetric::WinRate => stat.win_rate,
            DeckMetric::Top8Conversion => stat.conversion(RankBucket::Top8),
            DeckMetric::Count => stat.count as f64,
        }
    }
}

#[derive(Default)]
struct DeckAccumulator {
    count: u32,
    record: WinLoss,
    buckets: RankBucketCounts,
}

impl DeckAccumulator {
    fn add(&mut self, record: &ResultRecord) {
        self.count += 1;
        self.record.add(record);
        self.buckets.record(record.rank);
    }
}

/// Statistics for every distinct deck in `records`, ranked by meta share.
pub fn aggregate_decks(records: &[&ResultRecord], scope: DeckScope) -> Vec<DeckStat> {
    let total = records.len() as u32;
    let mut by_deck: BTreeMap<&str, DeckAccumulator> = BTreeMap::new();

    for record in records.iter().filter(|r| scope.includes(&r.deck)) {
        by_deck.entry(record.deck.as_str()).or_default().add(record);
    }

    let mut stats: Vec<DeckStat> = by_deck
        .into_iter()
        .map(|(deck, acc)| DeckStat::build(deck, acc.count, acc.record, acc.buckets, total))
        .collect();
    rank_decks(&mut stats, DeckMetric::MetaShare);
    stats
}

/// Statistics for a single deck; zeroed when it is absent.
pub fn deck_stat(records: &[&ResultRecord], deck: &str) -> DeckStat {
    let mut acc = DeckAccumulator::default();
    for record in records.iter().filter(|r| r.deck == deck) {
        acc.add(record);
    }
    DeckStat::build(deck, acc.count, acc.record, acc.buckets, records.len() as u32)
}

pub fn rank_decks(stats: &mut [DeckStat], metric: DeckMetric) {
    rank_by(stats, |s| metric.value(s));
}

/// Deck(s) with the most copies, sentinels excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCopies {
    /// Tied decks in name order; empty when no valid deck is present.
    pub decks: Vec<String>,
    pub copies: u32,
}

impl DeckCopies {
    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

#[derive(Debug, Clone)]
struct DeckCount<'a> {
    deck: &'a str,
    count: u32,
}

impl Named for DeckCount<'_> {
    fn name(&self) -> &str {
        self.deck
    }
}

fn valid_deck_counts<'a>(records: &[&'a ResultRecord]) -> Vec<DeckCount<'a>> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for record in records.iter().copied().filter(|r| !r.is_sentinel()) {
        *counts.entry(record.deck.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(deck, count)| DeckCount { deck, count })
        .collect()
}

pub fn most_copied(records: &[&ResultRecord]) -> DeckCopies {
    let counts = valid_deck_counts(records);
    let tied = ties_at_max(&counts, |c| c.count as f64);
    DeckCopies {
        copies: tied.first().map(|c| c.count).unwrap_or(0),
        decks: tied.iter().map(|c| c.deck.to_string()).collect(),
    }
}

/// Number of distinct valid decks.
pub fn distinct_valid_decks(records: &[&ResultRecord]) -> usize {
    valid_deck_counts(records).len()
}
