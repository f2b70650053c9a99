//! # Deck Meta
//!
//! Statistics over card-game tournament results: deck meta shares, win
//! rates, rank conversion and per-player histories.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (result records, rank buckets, filters, charts)
//! - **calculate**: Aggregation and ranking over filtered records
//! - **format**: Display strings for cards and tables
//! - **report**: Per-view reports assembled for output
//! - **storage**: Dataset loading (JSONL, JSON)
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod format;
pub mod models;
pub mod report;
pub mod storage;

pub use models::*;

use calculate::charts::Positions;

/// Parse a "top N" or "A-B" position window (e.g., "10", "5-15").
///
/// Positions are 1-based and inclusive; `0` is rejected.
pub fn parse_positions(s: &str) -> Option<Positions> {
    let s = s.trim();
    let (start, end) = match s.split_once('-') {
        Some((a, b)) => (a.trim().parse().ok()?, b.trim().parse().ok()?),
        None => (1, s.parse().ok()?),
    };
    if start == 0 || end < start {
        return None;
    }
    Some(Positions { start, end })
}
