//! Per-view reports: a filter applied, the matching aggregations run,
//! and the results bundled for output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculate::charts::{
    conversion_funnel_chart, deck_evolution_chart, meta_win_rate_chart, player_average_chart,
    player_deck_scatter, player_win_rate_chart, Positions,
};
use crate::calculate::deck::{
    aggregate_decks, deck_stat, rank_decks, DeckMetric, DeckScope, DeckStat,
};
use crate::calculate::event::{
    event_sizes, summarize_event, summarize_range, BucketTopDecks, EventSize, EventSummary,
    RangeSummary,
};
use crate::calculate::evolution::{
    deck_evolution, deck_history_table, DeckEvolution, DeckHistoryRow,
};
use crate::calculate::filter::filter_records;
use crate::calculate::player::{player_leaderboard, profile_player, PlayerProfile, PlayerWinRate};
use crate::calculate::ranking::slice_positions;
use crate::calculate::tables::{player_event_rows, result_rows, PlayerEventRow, ResultRow};
use crate::format::{
    bucket_leaders_label, bucket_percent_label_with, format_date, format_date_range,
    format_percentage_with, PlayerCard, NO_DATA,
};
use crate::models::{Chart, FilterSpec, RankBucket, ResultRecord};

/// Presentation settings shared by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub sort: DeckMetric,
    pub positions: Option<Positions>,
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sort: DeckMetric::MetaShare,
            positions: None,
            precision: 1,
        }
    }
}

/// A deck table row with display strings alongside the raw stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckRow {
    pub stat: DeckStat,
    pub meta_share: String,
    pub win_rate: String,
    /// Bucket conversions; `--` for an empty bucket.
    pub conversions: Vec<String>,
}

fn deck_rows(stats: &[DeckStat], precision: usize) -> Vec<DeckRow> {
    stats
        .iter()
        .map(|s| DeckRow {
            stat: s.clone(),
            meta_share: format_percentage_with(s.meta_share, precision),
            win_rate: format_percentage_with(s.win_rate, precision),
            conversions: RankBucket::ALL
                .iter()
                .map(|&b| bucket_percent_label_with(s.buckets.get(b), s.conversion(b), precision))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLine {
    pub bucket: String,
    pub leaders: String,
}

fn bucket_lines(buckets: &[BucketTopDecks]) -> Vec<BucketLine> {
    buckets
        .iter()
        .map(|b| BucketLine {
            bucket: b.bucket.label().to_string(),
            leaders: bucket_leaders_label(&b.leaders),
        })
        .collect()
}

fn ranked_decks(scope: &[&ResultRecord], options: &ReportOptions) -> Vec<DeckStat> {
    let mut stats = aggregate_decks(scope, DeckScope::ValidOnly);
    rank_decks(&mut stats, options.sort);
    match options.positions {
        Some(p) => slice_positions(stats, p.start, p.end),
        None => stats,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub filter: FilterSpec,
    pub date_label: String,
    pub summary: EventSummary,
    pub bucket_leaders: Vec<BucketLine>,
    pub decks: Vec<DeckRow>,
    pub meta_chart: Chart,
    pub funnel_chart: Chart,
    pub rows: Vec<ResultRow>,
}

/// Single-event view.
pub fn event_report(
    records: &[ResultRecord],
    filter: &FilterSpec,
    options: &ReportOptions,
) -> EventReport {
    let scope = filter_records(records, filter);
    let summary = summarize_event(&scope);
    info!("Event report for {:?}: {} players", summary.event, summary.total_players);

    EventReport {
        filter: filter.clone(),
        date_label: summary
            .date
            .map(format_date)
            .unwrap_or_else(|| NO_DATA.to_string()),
        bucket_leaders: bucket_lines(&summary.top_decks_by_bucket),
        decks: deck_rows(&ranked_decks(&scope, options), options.precision),
        meta_chart: meta_win_rate_chart(&scope, options.sort, options.positions),
        funnel_chart: conversion_funnel_chart(&scope),
        rows: result_rows(&scope),
        summary,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReport {
    pub filter: FilterSpec,
    pub range_label: String,
    pub summary: RangeSummary,
    pub events: Vec<EventSize>,
    pub bucket_leaders: Vec<BucketLine>,
    pub decks: Vec<DeckRow>,
    pub meta_chart: Chart,
    pub funnel_chart: Chart,
}

/// Multi-event view over a date range.
pub fn range_report(
    records: &[ResultRecord],
    filter: &FilterSpec,
    options: &ReportOptions,
) -> RangeReport {
    let scope = filter_records(records, filter);
    let summary = summarize_range(&scope);
    info!("Range report: {} events, {} records", summary.total_events, summary.total_players);

    RangeReport {
        filter: filter.clone(),
        range_label: format_date_range(filter.date_start, filter.date_end),
        events: event_sizes(&scope),
        bucket_leaders: bucket_lines(&summary.top_decks_by_bucket),
        decks: deck_rows(&ranked_decks(&scope, options), options.precision),
        meta_chart: meta_win_rate_chart(&scope, options.sort, options.positions),
        funnel_chart: conversion_funnel_chart(&scope),
        summary,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub filter: FilterSpec,
    pub deck: String,
    pub range_label: String,
    pub overall: DeckStat,
    pub evolution: DeckEvolution,
    pub chart: Chart,
    pub table: Vec<DeckHistoryRow>,
}

/// One deck tracked across dates. `filter.deck` is ignored so the
/// table keeps the whole field.
pub fn evolution_report(
    records: &[ResultRecord],
    filter: &FilterSpec,
    deck: &str,
) -> EvolutionReport {
    let mut field = filter.clone();
    field.deck = None;
    let scope = filter_records(records, &field);
    let evolution = deck_evolution(&scope, deck);
    info!("Evolution report for {}: {} dates", deck, evolution.points.len());

    EvolutionReport {
        filter: field.clone(),
        deck: deck.to_string(),
        range_label: format_date_range(field.date_start, field.date_end),
        overall: deck_stat(&scope, deck),
        chart: deck_evolution_chart(&evolution),
        table: deck_history_table(&scope, deck),
        evolution,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub filter: FilterSpec,
    pub profile: PlayerProfile,
    pub card: PlayerCard,
    pub events: Vec<PlayerEventRow>,
    pub dates: Vec<NaiveDate>,
    pub win_rate_chart: Chart,
    pub deck_chart: Chart,
}

/// A player's history. `chart_deck` narrows only the win-rate chart.
pub fn player_report(
    records: &[ResultRecord],
    filter: &FilterSpec,
    chart_deck: Option<&str>,
) -> PlayerReport {
    let scope = filter_records(records, filter);
    let profile = profile_player(&scope);
    info!("Player report for {:?}: {} events", profile.player, profile.total_events);

    let mut dates: Vec<NaiveDate> = scope.iter().map(|r| r.date).collect();
    dates.sort();
    dates.dedup();

    PlayerReport {
        filter: filter.clone(),
        card: PlayerCard::from(&profile),
        events: player_event_rows(&scope, records),
        dates,
        win_rate_chart: player_win_rate_chart(&scope, chart_deck),
        deck_chart: player_deck_scatter(&scope),
        profile,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardReport {
    pub filter: FilterSpec,
    pub players: Vec<PlayerWinRate>,
    pub chart: Chart,
}

/// Average win rate per player over the filtered events.
pub fn leaderboard_report(
    records: &[ResultRecord],
    filter: &FilterSpec,
    options: &ReportOptions,
) -> LeaderboardReport {
    let scope = filter_records(records, filter);
    let players = player_leaderboard(&scope);
    info!("Leaderboard report: {} players", players.len());

    LeaderboardReport {
        filter: filter.clone(),
        chart: player_average_chart(&scope, options.positions),
        players: match options.positions {
            Some(p) => slice_positions(players, p.start, p.end),
            None => players,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, NO_SHOW};
    use pretty_assertions::assert_eq;

    fn entry(
        date: &str,
        event: &str,
        player: &str,
        deck: &str,
        rank: u32,
        wins: u32,
        losses: u32,
    ) -> ResultRecord {
        ResultRecord::new(parse_date(date).unwrap(), event, player, deck, rank)
            .with_record(wins, losses)
    }

    fn dataset() -> Vec<ResultRecord> {
        vec![
            entry("2024-01-06", "Winter Cup", "Alice", "Red", 1, 4, 0),
            entry("2024-01-06", "Winter Cup", "Bob", "Blue", 2, 3, 1),
            entry("2024-01-06", "Winter Cup", "Carol", "Red", 9, 1, 3),
            entry("2024-01-06", "Winter Cup", "Dan", NO_SHOW, 10, 0, 0),
            entry("2024-03-02", "Spring Open", "Bob", "Red", 1, 4, 0),
            entry("2024-03-02", "Spring Open", "Alice", "Green", 2, 2, 2),
            entry("2024-03-02", "Spring Open", "Eve", "Blue", 3, 1, 3),
        ]
    }

    #[test]
    fn test_event_report() {
        let data = dataset();
        let filter = FilterSpec::for_event("Winter Cup");
        let report = event_report(&data, &filter, &ReportOptions::default());

        assert_eq!(report.summary.total_players, 4);
        assert_eq!(report.date_label, "January 06, 2024");
        assert_eq!(report.decks.len(), 2);
        assert_eq!(report.decks[0].stat.deck, "Red");
        assert_eq!(report.decks[0].meta_share, "50.0%");
        assert_eq!(report.decks[0].conversions, vec!["50.0%", "50.0%", "--", "--"]);
        assert_eq!(report.bucket_leaders[0].leaders, "All Unique Decks");
        assert_eq!(report.bucket_leaders[2].leaders, "--");
        assert_eq!(report.rows.len(), 4);
        assert!(!report.meta_chart.is_empty());
    }

    #[test]
    fn test_event_report_unknown_event() {
        let data = dataset();
        let report = event_report(&data, &FilterSpec::for_event("Nope"), &ReportOptions::default());
        assert_eq!(report.summary.total_players, 0);
        assert_eq!(report.date_label, "--");
        assert!(report.decks.is_empty());
        assert!(report.meta_chart.is_empty());
    }

    #[test]
    fn test_range_report() {
        let data = dataset();
        let filter = FilterSpec::new().with_date_range(
            Some(parse_date("2024-01-01").unwrap()),
            Some(parse_date("2024-03-31").unwrap()),
        );
        let options = ReportOptions {
            positions: Some(Positions { start: 1, end: 1 }),
            ..ReportOptions::default()
        };
        let report = range_report(&data, &filter, &options);

        assert_eq!(report.range_label, "3 months, in 2024");
        assert_eq!(report.summary.total_events, 2);
        assert_eq!(report.events[0].event, "Winter Cup");
        assert_eq!(report.decks.len(), 1);
        assert_eq!(report.decks[0].stat.deck, "Red");
    }

    #[test]
    fn test_evolution_report() {
        let data = dataset();
        let report = evolution_report(&data, &FilterSpec::new().with_deck("Blue"), "Green");

        assert!(report.filter.deck.is_none());
        assert_eq!(report.evolution.points.len(), 1);
        assert_eq!(report.table.len(), 2);
        assert_eq!(report.overall.count, 1);
        assert_eq!(report.range_label, "Select a date range");
    }

    #[test]
    fn test_player_report() {
        let data = dataset();
        let report = player_report(&data, &FilterSpec::for_player("Alice"), None);

        assert_eq!(report.profile.total_events, 2);
        assert_eq!(report.card.player, "Alice");
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[0].players, 4);
        assert_eq!(report.dates.len(), 2);
        assert!(matches!(report.deck_chart, Chart::Scatter { .. }));
    }

    #[test]
    fn test_leaderboard_report() {
        let data = dataset();
        let report = leaderboard_report(&data, &FilterSpec::new(), &ReportOptions::default());
        assert_eq!(report.players.len(), 5);
        assert_eq!(report.players[0].player, "Bob");
    }
}
