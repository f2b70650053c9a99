//! Display formatting for statistics cards.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculate::event::BucketLeaders;
use crate::calculate::player::{
    DeckHighlight, DeckPerformance, EventWinRate, HighlightKind, PlayerProfile,
};
use crate::models::RankBucket;

/// Shown where a value does not apply.
pub const NO_DATA: &str = "--";

/// Shown where a count is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for a rank bucket where no deck repeats.
pub const ALL_UNIQUE: &str = "All Unique Decks";

pub fn format_percentage(value: f64) -> String {
    format_percentage_with(value, 1)
}

pub fn format_percentage_with(value: f64, precision: usize) -> String {
    format!("{:.*}%", precision, value)
}

/// Bucket percentage, or `--` when the bucket is empty.
pub fn bucket_percent_label(count: u32, percent: f64) -> String {
    bucket_percent_label_with(count, percent, 1)
}

pub fn bucket_percent_label_with(count: u32, percent: f64, precision: usize) -> String {
    if count == 0 {
        NO_DATA.to_string()
    } else {
        format_percentage_with(percent, precision)
    }
}

/// "March 05, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Calendar months touched by a range, counting both ends.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    months.max(1) as u32
}

/// "3 months, in 2024" or "14 months, from 2023 to 2024".
pub fn format_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return "Select a date range".to_string();
    };
    let months = months_between(start, end);
    let unit = if months == 1 { "month" } else { "months" };
    let (first, last) = (start.min(end).year(), start.max(end).year());
    if first == last {
        format!("{} {}, in {}", months, unit, first)
    } else {
        format!("{} {}, from {} to {}", months, unit, first, last)
    }
}

/// Leader names for a rank bucket card.
pub fn bucket_leaders_label(leaders: &BucketLeaders) -> String {
    match leaders {
        BucketLeaders::Empty => NO_DATA.to_string(),
        BucketLeaders::AllUnique => ALL_UNIQUE.to_string(),
        BucketLeaders::Leaders { decks } => decks
            .iter()
            .map(|d| d.deck.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn or_no_data(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_DATA.to_string())
}

/// Display strings for one highlight card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightCard {
    pub title: String,
    pub decks: String,
    pub events: String,
    pub win_rate: String,
    pub best_event: String,
    pub worst_event: String,
}

fn per_deck<F>(decks: &[DeckPerformance], render: F) -> String
where
    F: Fn(&DeckPerformance) -> String,
{
    decks.iter().map(render).collect::<Vec<_>>().join(", ")
}

impl From<&DeckHighlight> for HighlightCard {
    fn from(highlight: &DeckHighlight) -> Self {
        let by_usage = matches!(
            highlight.kind,
            HighlightKind::MostPlayed | HighlightKind::LeastPlayed
        );
        let Some(lead) = highlight.lead() else {
            let (events, win_rate) = if by_usage { ("0", "0%") } else { (NO_DATA, NO_DATA) };
            let no_event = format!("{} (Event: {})", NO_DATA, NO_DATA);
            return Self {
                title: highlight.title(),
                decks: NO_DATA.to_string(),
                events: events.to_string(),
                win_rate: win_rate.to_string(),
                best_event: no_event.clone(),
                worst_event: no_event,
            };
        };

        let event_rate = |e: Option<&EventWinRate>| match e {
            Some(e) => format!("{} (Event: {})", format_percentage_with(e.win_rate, 2), e.event),
            None => format!("{} (Event: {})", NO_DATA, NO_DATA),
        };

        Self {
            title: highlight.title(),
            decks: highlight.names().join(", "),
            events: lead.event_count.to_string(),
            // Tied performance decks share one rate; tied usage decks do not.
            win_rate: if by_usage {
                per_deck(&highlight.decks, |d| format_percentage_with(d.overall_win_rate, 2))
            } else {
                format_percentage_with(lead.overall_win_rate, 2)
            },
            best_event: per_deck(&highlight.decks, |d| event_rate(d.best_event.as_ref())),
            worst_event: per_deck(&highlight.decks, |d| event_rate(d.worst_event.as_ref())),
        }
    }
}

/// Display strings for one rank bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCard {
    pub bucket: String,
    pub count: String,
    pub conversion: String,
}

/// A player profile rendered to card strings, each with its own empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCard {
    pub player: String,
    pub total_events: String,
    pub events_detail: String,
    pub unique_decks: String,
    pub most_played: String,
    pub most_played_count: String,
    pub least_played: String,
    pub least_played_count: String,
    pub most_played_deck: HighlightCard,
    pub least_played_deck: HighlightCard,
    pub buckets: Vec<BucketCard>,
    pub overall_win_rate: String,
    pub best_deck: HighlightCard,
    pub worst_deck: HighlightCard,
}

fn played_count(highlight: &DeckHighlight) -> String {
    highlight
        .lead()
        .map(|d| format!("{}x", d.entries))
        .unwrap_or_default()
}

impl From<&PlayerProfile> for PlayerCard {
    fn from(profile: &PlayerProfile) -> Self {
        let names = |h: &DeckHighlight| {
            if h.is_empty() {
                NO_DATA.to_string()
            } else {
                h.names().join(", ")
            }
        };
        let conversion = &profile.rank_conversion;

        Self {
            player: profile
                .player
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            total_events: match profile.total_events {
                0 => NOT_AVAILABLE.to_string(),
                n => n.to_string(),
            },
            events_detail: or_no_data(profile.event_span.as_ref().map(|s| s.label())),
            unique_decks: match profile.unique_decks {
                0 => NOT_AVAILABLE.to_string(),
                n => n.to_string(),
            },
            most_played: names(&profile.most_played),
            most_played_count: played_count(&profile.most_played),
            least_played: names(&profile.least_played),
            least_played_count: played_count(&profile.least_played),
            most_played_deck: HighlightCard::from(&profile.most_played),
            least_played_deck: HighlightCard::from(&profile.least_played),
            buckets: RankBucket::ALL
                .iter()
                .map(|&bucket| {
                    let count = conversion.counts.get(bucket);
                    BucketCard {
                        bucket: bucket.label().to_string(),
                        count: match count {
                            0 => NO_DATA.to_string(),
                            n => n.to_string(),
                        },
                        conversion: if conversion.total_events == 0 {
                            NO_DATA.to_string()
                        } else {
                            format_percentage_with(conversion.rate(bucket), 0)
                        },
                    }
                })
                .collect(),
            overall_win_rate: or_no_data(profile.overall_win_rate.map(format_percentage)),
            best_deck: HighlightCard::from(&profile.best_decks),
            worst_deck: HighlightCard::from(&profile.worst_decks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::player::profile_player;
    use crate::models::{parse_date, ResultRecord};
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(66.666), "66.7%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage_with(42.0, 0), "42%");
        assert_eq!(format_percentage_with(62.5, 2), "62.50%");
    }

    #[test]
    fn test_bucket_percent_label() {
        assert_eq!(bucket_percent_label(0, 0.0), "--");
        assert_eq!(bucket_percent_label(2, 0.0), "0.0%");
        assert_eq!(bucket_percent_label(1, 50.0), "50.0%");
    }

    #[test]
    fn test_bucket_leaders_label() {
        use crate::calculate::event::BucketDeck;

        assert_eq!(bucket_leaders_label(&BucketLeaders::Empty), "--");
        assert_eq!(bucket_leaders_label(&BucketLeaders::AllUnique), "All Unique Decks");
        let deck = |name: &str| BucketDeck {
            deck: name.to_string(),
            copies: 2,
            win_rate: 50.0,
            meta_share: 10.0,
        };
        let leaders = BucketLeaders::Leaders {
            decks: vec![deck("Blue"), deck("Red")],
        };
        assert_eq!(bucket_leaders_label(&leaders), "Blue, Red");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date("2024-03-05")), "March 05, 2024");
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range(Some(date("2024-01-01")), Some(date("2024-03-31"))),
            "3 months, in 2024"
        );
        assert_eq!(
            format_date_range(Some(date("2024-05-01")), Some(date("2024-05-20"))),
            "1 month, in 2024"
        );
        assert_eq!(
            format_date_range(Some(date("2023-11-01")), Some(date("2024-12-31"))),
            "14 months, from 2023 to 2024"
        );
        assert_eq!(format_date_range(None, Some(date("2024-01-01"))), "Select a date range");
    }

    #[test]
    fn test_empty_player_card() {
        let card = PlayerCard::from(&profile_player(&[]));

        assert_eq!(card.player, "N/A");
        assert_eq!(card.total_events, "N/A");
        assert_eq!(card.events_detail, "--");
        assert_eq!(card.unique_decks, "N/A");
        assert_eq!(card.most_played, "--");
        assert_eq!(card.most_played_count, "");
        assert!(card.buckets.iter().all(|b| b.count == "--" && b.conversion == "--"));
        assert_eq!(card.overall_win_rate, "--");
        assert_eq!(card.best_deck.title, "Best Performing Deck");
        assert_eq!(card.best_deck.decks, "--");
        assert_eq!(card.best_deck.best_event, "-- (Event: --)");
        assert_eq!(card.worst_deck.win_rate, "--");
        assert_eq!(card.worst_deck.events, "--");

        assert_eq!(card.most_played_deck.title, "Most Played Deck");
        assert_eq!(card.most_played_deck.decks, "--");
        assert_eq!(card.most_played_deck.events, "0");
        assert_eq!(card.most_played_deck.win_rate, "0%");
        assert_eq!(card.most_played_deck.best_event, "-- (Event: --)");
        assert_eq!(card.least_played_deck.title, "Least Played Deck");
        assert_eq!(card.least_played_deck.worst_event, "-- (Event: --)");
    }

    #[test]
    fn test_player_card() {
        let data = vec![
            ResultRecord::new(date("2024-01-06"), "Winter Cup", "Alice", "Red", 1)
                .with_record(3, 1),
            ResultRecord::new(date("2024-03-02"), "Spring Open", "Alice", "Red", 12)
                .with_record(1, 3),
            ResultRecord::new(date("2024-03-09"), "Club Night", "Alice", "Blue", 5)
                .with_record(2, 2),
        ];
        let scope: Vec<&ResultRecord> = data.iter().collect();
        let card = PlayerCard::from(&profile_player(&scope));

        assert_eq!(card.total_events, "3");
        assert_eq!(card.events_detail, "3 Months (Years 2024)");
        assert_eq!(card.unique_decks, "2");
        assert_eq!(card.most_played, "Red");
        assert_eq!(card.most_played_count, "2x");
        assert_eq!(card.buckets[0].count, "2");
        assert_eq!(card.buckets[0].conversion, "67%");
        assert_eq!(card.buckets[2].count, "--");
        assert_eq!(card.buckets[2].conversion, "0%");
        assert_eq!(card.overall_win_rate, "50.0%");
        assert_eq!(card.best_deck.title, "Best (Tied) Performing Deck");
        assert_eq!(card.best_deck.decks, "Blue, Red");
        assert_eq!(card.best_deck.win_rate, "50.00%");
        assert_eq!(
            card.best_deck.best_event,
            "50.00% (Event: Club Night), 75.00% (Event: Winter Cup)"
        );
        assert_eq!(
            card.best_deck.worst_event,
            "50.00% (Event: Club Night), 25.00% (Event: Spring Open)"
        );

        assert_eq!(card.most_played_deck.title, "Most Played Deck");
        assert_eq!(card.most_played_deck.decks, "Red");
        assert_eq!(card.most_played_deck.events, "2");
        assert_eq!(card.most_played_deck.win_rate, "50.00%");
        assert_eq!(card.least_played_deck.decks, "Blue");
        assert_eq!(card.least_played_deck.best_event, "50.00% (Event: Club Night)");
    }

    #[test]
    fn test_tied_most_played_card_lists_every_deck() {
        let data = vec![
            ResultRecord::new(date("2024-01-06"), "Winter Cup", "Alice", "Red", 1)
                .with_record(3, 1),
            ResultRecord::new(date("2024-03-02"), "Spring Open", "Alice", "Blue", 12)
                .with_record(1, 3),
        ];
        let scope: Vec<&ResultRecord> = data.iter().collect();
        let card = PlayerCard::from(&profile_player(&scope));

        assert_eq!(card.most_played_deck.title, "Most (Tied) Played Deck");
        assert_eq!(card.most_played_deck.decks, "Blue, Red");
        assert_eq!(card.most_played_deck.win_rate, "25.00%, 75.00%");
        assert_eq!(
            card.most_played_deck.best_event,
            "25.00% (Event: Spring Open), 75.00% (Event: Winter Cup)"
        );
        assert_eq!(card.least_played_deck.title, "Least (Tied) Played Deck");
    }
}
