//! Deck evolution across event dates.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deck::DeckScope;
use super::ranking::sort_names;
use super::{meta_share, percent_of};
use crate::models::{RankBucketCounts, RankBucketPercents, ResultRecord, WinLoss};

/// One date on a deck's evolution series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub date: NaiveDate,
    /// First event name seen on this date.
    pub event: String,
    pub count: u32,
    pub total_players: u32,
    pub wins: u32,
    pub losses: u32,
    pub meta_share: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckEvolution {
    pub deck: String,
    /// Chronological; dates without the deck are left out.
    pub points: Vec<EvolutionPoint>,
}

impl DeckEvolution {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn meta_shares(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.meta_share).collect()
    }

    pub fn win_rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.win_rate).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

struct DateGroup<'a> {
    event: &'a str,
    records: Vec<&'a ResultRecord>,
}

fn group_by_date<'a>(records: &[&'a ResultRecord]) -> BTreeMap<NaiveDate, DateGroup<'a>> {
    let mut groups: BTreeMap<NaiveDate, DateGroup<'a>> = BTreeMap::new();
    for record in records.iter().copied() {
        groups
            .entry(record.date)
            .or_insert_with(|| DateGroup {
                event: &record.event,
                records: Vec::new(),
            })
            .records
            .push(record);
    }
    groups
}

/// Meta share and win rate of `deck` on every date it appears.
pub fn deck_evolution(records: &[&ResultRecord], deck: &str) -> DeckEvolution {
    let points = group_by_date(records)
        .into_iter()
        .filter_map(|(date, group)| {
            let games: WinLoss = group.records.iter().copied().filter(|r| r.deck == deck).collect();
            let count = group.records.iter().filter(|r| r.deck == deck).count() as u32;
            if count == 0 {
                return None;
            }
            let total_players = group.records.len() as u32;
            Some(EvolutionPoint {
                date,
                event: group.event.to_string(),
                count,
                total_players,
                wins: games.wins,
                losses: games.losses,
                meta_share: meta_share(count, total_players),
                win_rate: games.win_rate(),
            })
        })
        .collect();

    DeckEvolution {
        deck: deck.to_string(),
        points,
    }
}

/// One series per valid deck, in name order.
pub fn all_deck_evolutions(records: &[&ResultRecord]) -> Vec<DeckEvolution> {
    let mut decks: Vec<String> = records
        .iter()
        .filter(|r| DeckScope::ValidOnly.includes(&r.deck))
        .map(|r| r.deck.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sort_names(&mut decks);
    decks
        .iter()
        .map(|deck| deck_evolution(records, deck))
        .collect()
}

/// A row of the per-date deck table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckHistoryRow {
    pub date: NaiveDate,
    pub event: String,
    pub total_players: u32,
    pub count: u32,
    pub meta_share: f64,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub buckets: RankBucketCounts,
    pub bucket_percents: RankBucketPercents,
    pub winner: Option<String>,
    pub winner_deck: Option<String>,
}

/// One row per date in scope, including dates where `deck` is absent.
pub fn deck_history_table(records: &[&ResultRecord], deck: &str) -> Vec<DeckHistoryRow> {
    group_by_date(records)
        .into_iter()
        .map(|(date, group)| {
            let mine: Vec<&ResultRecord> = group
                .records
                .iter()
                .copied()
                .filter(|r| r.deck == deck)
                .collect();
            let count = mine.len() as u32;
            let games: WinLoss = mine.iter().copied().collect();
            let buckets: RankBucketCounts = mine.iter().map(|r| r.rank).collect();
            let winner = group.records.iter().find(|r| r.rank == 1);
            let total_players = group.records.len() as u32;

            DeckHistoryRow {
                date,
                event: group.event.to_string(),
                total_players,
                count,
                meta_share: meta_share(count, total_players),
                wins: games.wins,
                losses: games.losses,
                win_rate: percent_of(games.wins, games.games()),
                buckets,
                bucket_percents: buckets.percents(count),
                winner: winner.map(|r| r.player.clone()),
                winner_deck: winner.map(|r| r.deck.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, NO_SHOW};
    use pretty_assertions::assert_eq;

    fn entry(
        date: &str,
        player: &str,
        deck: &str,
        rank: u32,
        wins: u32,
        losses: u32,
    ) -> ResultRecord {
        ResultRecord::new(parse_date(date).unwrap(), format!("Event {}", date), player, deck, rank)
            .with_record(wins, losses)
    }

    fn dataset() -> Vec<ResultRecord> {
        vec![
            // Deliberately out of order
            entry("2024-03-02", "A", "Red", 1, 4, 0),
            entry("2024-03-02", "B", "Blue", 2, 3, 1),
            entry("2024-01-06", "A", "Red", 2, 2, 2),
            entry("2024-01-06", "B", "Red", 1, 3, 1),
            entry("2024-01-06", "C", "Blue", 3, 1, 3),
            entry("2024-01-06", "D", NO_SHOW, 4, 0, 0),
            entry("2024-02-10", "B", "Blue", 1, 4, 0),
            entry("2024-02-10", "C", "Green", 2, 2, 2),
        ]
    }

    #[test]
    fn test_evolution_omits_absent_dates() {
        let data = dataset();
        let scope: Vec<&ResultRecord> = data.iter().collect();
        let red = deck_evolution(&scope, "Red");

        assert_eq!(
            red.dates(),
            vec![parse_date("2024-01-06").unwrap(), parse_date("2024-03-02").unwrap()]
        );
        assert_eq!(red.meta_shares(), vec![50.0, 50.0]);
        assert_eq!(red.win_rates(), vec![62.5, 100.0]);
        assert_eq!(red.points[0].total_players, 4);
    }

    #[test]
    fn test_evolution_unknown_deck_is_empty() {
        let data = dataset();
        let scope: Vec<&ResultRecord> = data.iter().collect();
        assert!(deck_evolution(&scope, "Purple").is_empty());
        assert!(deck_evolution(&[], "Red").is_empty());
    }

    #[test]
    fn test_all_deck_evolutions() {
        let data = dataset();
        let scope: Vec<&ResultRecord> = data.iter().collect();
        let all = all_deck_evolutions(&scope);
        let decks: Vec<&str> = all.iter().map(|e| e.deck.as_str()).collect();
        assert_eq!(decks, vec!["Blue", "Green", "Red"]);
        assert_eq!(all[0].points.len(), 3);
    }

    #[test]
    fn test_deck_history_table_keeps_every_date() {
        let data = dataset();
        let scope: Vec<&ResultRecord> = data.iter().collect();
        let rows = deck_history_table(&scope, "Red");

        assert_eq!(rows.len(), 3);
        let feb = &rows[1];
        assert_eq!(feb.count, 0);
        assert_eq!(feb.win_rate, 0.0);
        assert_eq!(feb.bucket_percents, RankBucketPercents::default());
        assert_eq!(feb.winner.as_deref(), Some("B"));
        assert_eq!(feb.winner_deck.as_deref(), Some("Blue"));

        let jan = &rows[0];
        assert_eq!(jan.count, 2);
        assert_eq!(jan.buckets.top8, 2);
        assert_eq!(jan.event, "Event 2024-01-06");
    }
}
