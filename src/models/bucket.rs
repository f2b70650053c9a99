//! Fixed finishing-position buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculate::percent_of;

/// Finishing-position range.
///
/// Bounds are inclusive; the last bucket is open-ended. A rank of 0 never
/// occurs in clean data and falls into `Top8` so every record has a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBucket {
    Top8,
    Top16,
    Top32,
    BelowTop32,
}

impl RankBucket {
    pub const ALL: [RankBucket; 4] = [
        RankBucket::Top8,
        RankBucket::Top16,
        RankBucket::Top32,
        RankBucket::BelowTop32,
    ];

    pub fn from_rank(rank: u32) -> Self {
        match rank {
            0..=8 => RankBucket::Top8,
            9..=16 => RankBucket::Top16,
            17..=32 => RankBucket::Top32,
            _ => RankBucket::BelowTop32,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankBucket::Top8 => "Top 8",
            RankBucket::Top16 => "Top 9-16",
            RankBucket::Top32 => "Top 17-32",
            RankBucket::BelowTop32 => "Below Top 32",
        }
    }

    pub fn contains(&self, rank: u32) -> bool {
        RankBucket::from_rank(rank) == *self
    }
}

impl fmt::Display for RankBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw record counts per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBucketCounts {
    pub top8: u32,
    pub top16: u32,
    pub top32: u32,
    pub below_top32: u32,
}

impl RankBucketCounts {
    pub fn record(&mut self, rank: u32) {
        *self.slot(RankBucket::from_rank(rank)) += 1;
    }

    fn slot(&mut self, bucket: RankBucket) -> &mut u32 {
        match bucket {
            RankBucket::Top8 => &mut self.top8,
            RankBucket::Top16 => &mut self.top16,
            RankBucket::Top32 => &mut self.top32,
            RankBucket::BelowTop32 => &mut self.below_top32,
        }
    }

    pub fn get(&self, bucket: RankBucket) -> u32 {
        match bucket {
            RankBucket::Top8 => self.top8,
            RankBucket::Top16 => self.top16,
            RankBucket::Top32 => self.top32,
            RankBucket::BelowTop32 => self.below_top32,
        }
    }

    pub fn total(&self) -> u32 {
        self.top8 + self.top16 + self.top32 + self.below_top32
    }

    /// Each bucket as a percentage of `denominator`; all zero when it is 0.
    pub fn percents(&self, denominator: u32) -> RankBucketPercents {
        RankBucketPercents {
            top8: percent_of(self.top8, denominator),
            top16: percent_of(self.top16, denominator),
            top32: percent_of(self.top32, denominator),
            below_top32: percent_of(self.below_top32, denominator),
        }
    }
}

impl FromIterator<u32> for RankBucketCounts {
    fn from_iter<I: IntoIterator<Item = u32>>(ranks: I) -> Self {
        let mut counts = RankBucketCounts::default();
        for rank in ranks {
            counts.record(rank);
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankBucketPercents {
    pub top8: f64,
    pub top16: f64,
    pub top32: f64,
    pub below_top32: f64,
}

impl RankBucketPercents {
    pub fn get(&self, bucket: RankBucket) -> f64 {
        match bucket {
            RankBucket::Top8 => self.top8,
            RankBucket::Top16 => self.top16,
            RankBucket::Top32 => self.top32,
            RankBucket::BelowTop32 => self.below_top32,
        }
    }
}
