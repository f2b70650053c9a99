//! Chart payload builders.

use super::deck::{aggregate_decks, rank_decks, DeckMetric, DeckScope};
use super::evolution::DeckEvolution;
use super::player::{deck_performance, player_leaderboard, player_win_rate_series};
use super::ranking::slice_positions;
use crate::models::{Chart, ChartData, RankBucket, ResultRecord, ScatterPoint};

pub const META_SERIES: &str = "Meta %";
pub const WIN_RATE_SERIES: &str = "Win Rate %";

/// 1-based inclusive positions of a ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positions {
    pub start: usize,
    pub end: usize,
}

/// Meta share and win rate per valid deck, ranked by `metric`.
pub fn meta_win_rate_chart(
    records: &[&ResultRecord],
    metric: DeckMetric,
    positions: Option<Positions>,
) -> Chart {
    let mut stats = aggregate_decks(records, DeckScope::ValidOnly);
    if stats.is_empty() {
        return Chart::no_data();
    }
    rank_decks(&mut stats, metric);
    if let Some(p) = positions {
        stats = slice_positions(stats, p.start, p.end);
    }

    Chart::Bar(
        ChartData::new(stats.iter().map(|s| s.deck.clone()).collect())
            .with_series(META_SERIES, stats.iter().map(|s| s.meta_share).collect())
            .with_series(WIN_RATE_SERIES, stats.iter().map(|s| s.win_rate).collect()),
    )
}

/// Share of each deck's entries reaching each bucket, ranked by Top 8 conversion.
pub fn conversion_funnel_chart(records: &[&ResultRecord]) -> Chart {
    let mut stats = aggregate_decks(records, DeckScope::ValidOnly);
    if stats.is_empty() {
        return Chart::no_data();
    }
    rank_decks(&mut stats, DeckMetric::Top8Conversion);

    let labels = stats.iter().map(|s| s.deck.clone()).collect();
    let data = RankBucket::ALL.iter().fold(ChartData::new(labels), |data, bucket| {
        data.with_series(
            bucket.label(),
            stats.iter().map(|s| s.conversion(*bucket)).collect(),
        )
    });
    Chart::Bar(data)
}

pub fn deck_evolution_chart(evolution: &DeckEvolution) -> Chart {
    if evolution.is_empty() {
        return Chart::no_data();
    }
    let labels = evolution
        .dates()
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    Chart::Line(
        ChartData::new(labels)
            .with_series(META_SERIES, evolution.meta_shares())
            .with_series(WIN_RATE_SERIES, evolution.win_rates()),
    )
}

/// A player's win rate per event over time.
pub fn player_win_rate_chart(records: &[&ResultRecord], deck: Option<&str>) -> Chart {
    let series = player_win_rate_series(records, deck);
    if series.is_empty() {
        return Chart::no_data();
    }
    Chart::Line(
        ChartData::new(series.iter().map(|p| p.event.clone()).collect())
            .with_series(WIN_RATE_SERIES, series.iter().map(|p| p.win_rate).collect()),
    )
}

/// Events played with each deck against its overall win rate.
pub fn player_deck_scatter(records: &[&ResultRecord]) -> Chart {
    let performance = deck_performance(records);
    if performance.is_empty() {
        return Chart::no_data();
    }
    Chart::Scatter {
        points: performance
            .iter()
            .map(|d| ScatterPoint {
                label: d.deck.clone(),
                x: d.event_count as f64,
                y: d.overall_win_rate,
            })
            .collect(),
    }
}

/// Average win rate and events played per player.
pub fn player_average_chart(records: &[&ResultRecord], positions: Option<Positions>) -> Chart {
    let mut board = player_leaderboard(records);
    if board.is_empty() {
        return Chart::no_data();
    }
    if let Some(p) = positions {
        board = slice_positions(board, p.start, p.end);
    }
    Chart::Bar(
        ChartData::new(board.iter().map(|p| p.player.clone()).collect())
            .with_series(WIN_RATE_SERIES, board.iter().map(|p| p.average_win_rate).collect())
            .with_series("Events", board.iter().map(|p| p.events as f64).collect()),
    )
}
