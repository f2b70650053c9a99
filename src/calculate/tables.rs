//! Row-shaped outputs for table renderers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::PlayerFinish;
use super::ranking::compare_names;
use super::{meta_share, win_rate};
use crate::format::format_percentage;
use crate::models::{ResultRecord, WinLoss};

/// A raw result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub event: String,
    pub rank: u32,
    pub player: String,
    pub deck: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

impl From<&ResultRecord> for ResultRow {
    fn from(record: &ResultRecord) -> Self {
        Self {
            date: record.date,
            event: record.event.clone(),
            rank: record.rank,
            player: record.player.clone(),
            deck: record.deck.clone(),
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate(),
        }
    }
}

/// Rows ordered by date, event, rank, then player.
pub fn result_rows(records: &[&ResultRecord]) -> Vec<ResultRow> {
    let mut rows: Vec<ResultRow> = records.iter().map(|r| ResultRow::from(*r)).collect();
    rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.event.cmp(&b.event))
            .then_with(|| a.rank.cmp(&b.rank))
            .then_with(|| compare_names(&a.player, &b.player))
    });
    rows
}

/// One event a player attended, set against the whole field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEventRow {
    pub date: NaiveDate,
    pub event: String,
    /// Entries in the event.
    pub players: u32,
    pub rank: u32,
    pub deck: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    /// The deck's win rate across the whole event.
    pub deck_win_rate: f64,
    /// The deck's share of the event.
    pub deck_meta_share: f64,
    pub winner: Option<PlayerFinish>,
    pub winner_deck_meta_share: f64,
}

impl PlayerEventRow {
    /// "Event won by X with D (75.0% Overall WR and 12.5%)".
    pub fn winner_note(&self) -> Option<String> {
        self.winner.as_ref().map(|w| {
            format!(
                "Event won by {} with {} ({} Overall WR and {})",
                w.player,
                w.deck,
                format_percentage(w.win_rate),
                format_percentage(self.winner_deck_meta_share)
            )
        })
    }
}

/// Context rows for each of a player's records, oldest first.
///
/// `field` must hold every record of the events the player attended.
pub fn player_event_rows(
    player_records: &[&ResultRecord],
    field: &[ResultRecord],
) -> Vec<PlayerEventRow> {
    let mut by_event: BTreeMap<&str, Vec<&ResultRecord>> = BTreeMap::new();
    for record in field {
        by_event.entry(record.event.as_str()).or_default().push(record);
    }

    let mut rows: Vec<PlayerEventRow> = player_records
        .iter()
        .map(|row| {
            let event = by_event
                .get(row.event.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let deck_games: WinLoss = event
                .iter()
                .copied()
                .filter(|r| r.deck == row.deck)
                .collect();
            let deck_count = event.iter().filter(|r| r.deck == row.deck).count() as u32;
            let players = event.len() as u32;
            // Lowest rank wins; the first such entry on a tie.
            let winner = event
                .iter()
                .copied()
                .reduce(|best, r| if r.rank < best.rank { r } else { best });
            let winner_deck_count = winner
                .map(|w| event.iter().filter(|r| r.deck == w.deck).count() as u32)
                .unwrap_or(0);

            PlayerEventRow {
                date: row.date,
                event: row.event.clone(),
                players,
                rank: row.rank,
                deck: row.deck.clone(),
                wins: row.wins,
                losses: row.losses,
                win_rate: row.win_rate(),
                deck_win_rate: win_rate(deck_games.wins, deck_games.losses),
                deck_meta_share: meta_share(deck_count, players),
                winner: winner.map(PlayerFinish::from),
                winner_deck_meta_share: meta_share(winner_deck_count, players),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event.cmp(&b.event)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;
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

    fn field() -> Vec<ResultRecord> {
        vec![
            entry("2024-03-02", "Spring Open", "Bob", "Blue", 1, 5, 0),
            entry("2024-03-02", "Spring Open", "Alice", "Red", 2, 4, 1),
            entry("2024-03-02", "Spring Open", "Carol", "Red", 3, 2, 3),
            entry("2024-03-02", "Spring Open", "Dan", "Blue", 4, 3, 2),
            entry("2024-01-06", "Winter Cup", "Alice", "Red", 1, 3, 0),
            entry("2024-01-06", "Winter Cup", "Eve", "Green", 2, 2, 1),
        ]
    }

    #[test]
    fn test_result_rows_order() {
        let data = field();
        let scope: Vec<&ResultRecord> = data.iter().rev().collect();
        let rows = result_rows(&scope);
        let order: Vec<(&str, u32)> = rows.iter().map(|r| (r.event.as_str(), r.rank)).collect();
        assert_eq!(
            order,
            vec![
                ("Winter Cup", 1),
                ("Winter Cup", 2),
                ("Spring Open", 1),
                ("Spring Open", 2),
                ("Spring Open", 3),
                ("Spring Open", 4),
            ]
        );
        assert_eq!(rows[0].win_rate, 100.0);
    }

    #[test]
    fn test_player_event_rows() {
        let data = field();
        let alice: Vec<&ResultRecord> = data.iter().filter(|r| r.player == "Alice").collect();
        let rows = player_event_rows(&alice, &data);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event, "Winter Cup");

        let spring = &rows[1];
        assert_eq!(spring.players, 4);
        assert_eq!(spring.win_rate, 80.0);
        assert_eq!(spring.deck_win_rate, 60.0);
        assert_eq!(spring.deck_meta_share, 50.0);
        assert_eq!(spring.winner.as_ref().map(|w| w.player.as_str()), Some("Bob"));
        assert_eq!(
            spring.winner_note().as_deref(),
            Some("Event won by Bob with Blue (100.0% Overall WR and 50.0%)")
        );
    }

    #[test]
    fn test_player_event_rows_missing_field() {
        let data = field();
        let alice: Vec<&ResultRecord> = data.iter().filter(|r| r.player == "Alice").collect();
        let rows = player_event_rows(&alice, &[]);
        assert_eq!(rows[0].players, 0);
        assert!(rows[0].winner.is_none());
        assert!(rows[0].winner_note().is_none());
        assert_eq!(rows[0].deck_meta_share, 0.0);
    }
}
