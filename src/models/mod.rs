//! Core data models for tournament results.

mod bucket;
mod chart;
mod filter;
mod ids;
mod record;

pub use bucket::*;
pub use chart::*;
pub use filter::*;
pub use ids::*;
pub use record::*;
