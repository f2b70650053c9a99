//! Statistics calculation engine.
//!
//! Every function here is a pure computation over an already-filtered
//! slice of records:
//! - Deck meta share, win rate and rank-bucket conversion
//! - Single-event and date-range summaries
//! - Deck evolution across event dates
//! - Player profiles and histories
//! - Chart and table shaped outputs
//!
//! Ratios with a zero denominator resolve to `0.0`.

pub mod charts;
pub mod deck;
pub mod event;
pub mod evolution;
pub mod filter;
pub mod player;
pub mod ranking;
pub mod tables;

/// Win rate in percent from wins and losses.
pub fn win_rate(wins: u32, losses: u32) -> f64 {
    percent_of(wins, wins + losses)
}

/// Share of a scope in percent.
pub fn meta_share(count: u32, total: u32) -> f64 {
    percent_of(count, total)
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate() {
        assert!((win_rate(5, 3) - 62.5).abs() < 1e-9);
        assert_eq!(win_rate(4, 0), 100.0);
        assert_eq!(win_rate(0, 0), 0.0);
    }

    #[test]
    fn test_meta_share() {
        assert!((meta_share(2, 3) - 66.666_666).abs() < 1e-3);
        assert_eq!(meta_share(0, 10), 0.0);
        assert_eq!(meta_share(3, 0), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[50.0, 100.0]) - 75.0).abs() < 1e-9);
    }
}
