//! Tournament result records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RankBucket, RecordId};
use crate::calculate::win_rate;

/// Deck recorded for a registered player who never played a round.
pub const NO_SHOW: &str = "No Show";

/// Deck recorded when the archetype could not be identified.
pub const UNKNOWN_DECK: &str = "UNKNOWN";

/// Whether a deck name is a placeholder rather than a real archetype.
pub fn is_sentinel_deck(deck: &str) -> bool {
    deck == NO_SHOW || deck == UNKNOWN_DECK
}

/// One player's result in one event.
///
/// Field names follow the dataset columns so exported rows deserialize
/// without a mapping step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Event")]
    pub event: String,

    #[serde(rename = "EventType")]
    pub event_type: String,

    #[serde(rename = "Player")]
    pub player: String,

    #[serde(rename = "Deck")]
    pub deck: String,

    #[serde(rename = "Rank")]
    pub rank: u32,

    #[serde(rename = "Wins")]
    pub wins: u32,

    #[serde(rename = "Losses")]
    pub losses: u32,

    /// Precomputed win fraction (0..1) when the export carries one.
    #[serde(
        rename = "Win Rate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reported_win_rate: Option<f64>,
}

impl ResultRecord {
    pub fn new(
        date: NaiveDate,
        event: impl Into<String>,
        player: impl Into<String>,
        deck: impl Into<String>,
        rank: u32,
    ) -> Self {
        Self {
            date,
            event: event.into(),
            event_type: "offline".to_string(),
            player: player.into(),
            deck: deck.into(),
            rank,
            wins: 0,
            losses: 0,
            reported_win_rate: None,
        }
    }

    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn with_reported_win_rate(mut self, fraction: f64) -> Self {
        self.reported_win_rate = Some(fraction);
        self
    }

    /// Deterministic identity of this entry: one player per event per date.
    pub fn id(&self) -> RecordId {
        let date = self.date.format("%Y-%m-%d").to_string();
        RecordId::generate(&[&date, &self.event, &self.player])
    }

    pub fn bucket(&self) -> RankBucket {
        RankBucket::from_rank(self.rank)
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel_deck(&self.deck)
    }

    pub fn is_no_show(&self) -> bool {
        self.deck == NO_SHOW
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win rate in percent recomputed from wins and losses.
    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins, self.losses)
    }

    /// Win rate in percent, preferring the export's precomputed value.
    pub fn reported_win_rate_pct(&self) -> f64 {
        match self.reported_win_rate {
            Some(fraction) if fraction.is_finite() => fraction * 100.0,
            _ => self.win_rate(),
        }
    }
}

/// Running wins/losses total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn add(&mut self, record: &ResultRecord) {
        self.wins += record.wins;
        self.losses += record.losses;
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins, self.losses)
    }
}

impl<'a> FromIterator<&'a ResultRecord> for WinLoss {
    fn from_iter<I: IntoIterator<Item = &'a ResultRecord>>(iter: I) -> Self {
        let mut total = WinLoss::default();
        for record in iter {
            total.add(record);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_dataset_row() {
        let json = r#"{"Date":"2024-03-02","Event":"Spring Open","EventType":"offline",
            "Player":"Alice","Deck":"Blue Control","Rank":1,"Wins":5,"Losses":1,"Win Rate":0.8333}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date, date("2024-03-02"));
        assert_eq!(record.deck, "Blue Control");
        assert_eq!(record.rank, 1);
        assert_eq!(record.reported_win_rate, Some(0.8333));
    }

    #[test]
    fn test_deserialize_without_win_rate() {
        let json = r#"{"Date":"2024-03-02","Event":"Spring Open","EventType":"online",
            "Player":"Bob","Deck":"No Show","Rank":12,"Wins":0,"Losses":0}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();

        assert!(record.reported_win_rate.is_none());
        assert!(record.is_no_show());
        assert_eq!(record.win_rate(), 0.0);
    }

    #[test]
    fn test_win_rate_percent() {
        let record = ResultRecord::new(date("2024-01-01"), "E", "P", "D", 3).with_record(3, 1);
        assert!((record.win_rate() - 75.0).abs() < 1e-9);
        assert!((record.reported_win_rate_pct() - 75.0).abs() < 1e-9);

        let reported = record.with_reported_win_rate(0.5);
        assert!((reported.reported_win_rate_pct() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinel_decks() {
        assert!(is_sentinel_deck(NO_SHOW));
        assert!(is_sentinel_deck(UNKNOWN_DECK));
        assert!(!is_sentinel_deck("unknown"));
        assert!(!is_sentinel_deck("Red Aggro"));
    }

    #[test]
    fn test_id_ignores_deck_and_rank() {
        let a = ResultRecord::new(date("2024-01-01"), "E", "P", "A", 1);
        let b = ResultRecord::new(date("2024-01-01"), "E", "P", "B", 7);
        let c = ResultRecord::new(date("2024-01-01"), "E", "Q", "A", 1);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_win_loss_collect() {
        let records = vec![
            ResultRecord::new(date("2024-01-01"), "E", "P", "A", 1).with_record(3, 1),
            ResultRecord::new(date("2024-01-01"), "E", "Q", "A", 9).with_record(2, 2),
        ];
        let total: WinLoss = records.iter().collect();
        assert_eq!(total.wins, 5);
        assert_eq!(total.losses, 3);
        assert!((total.win_rate() - 62.5).abs() < 1e-9);
    }
}
