//! Ordering and tie detection shared by every ranked output.
//!
//! Entities are ordered by a numeric metric descending, then by name
//! ascending ignoring case, then by exact name so the order is total.

use std::cmp::Ordering;

/// Metrics are compared at this resolution so float noise never splits a tie.
pub const TIE_EPSILON: f64 = 1e-9;

fn quantize(metric: f64) -> f64 {
    (metric / TIE_EPSILON).round()
}

/// Anything ranked by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Case-insensitive name order with an exact-name fallback.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Metric descending, then name.
pub fn compare_ranked(a_metric: f64, a_name: &str, b_metric: f64, b_name: &str) -> Ordering {
    quantize(b_metric)
        .total_cmp(&quantize(a_metric))
        .then_with(|| compare_names(a_name, b_name))
}

/// Sort in place by `metric` descending with the name tie-break.
pub fn rank_by<T, F>(items: &mut [T], metric: F)
where
    T: Named,
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| compare_ranked(metric(a), a.name(), metric(b), b.name()));
}

/// Sort names alphabetically with the same tie-break used for ranking.
pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| compare_names(a, b));
}

/// Items sharing the highest metric, in name order.
pub fn ties_at_max<'a, T, F>(items: &'a [T], metric: F) -> Vec<&'a T>
where
    T: Named,
    F: Fn(&T) -> f64,
{
    ties_at(items, metric, f64::max)
}

/// Items sharing the lowest metric, in name order.
pub fn ties_at_min<'a, T, F>(items: &'a [T], metric: F) -> Vec<&'a T>
where
    T: Named,
    F: Fn(&T) -> f64,
{
    ties_at(items, metric, f64::min)
}

fn ties_at<'a, T, F, P>(items: &'a [T], metric: F, pick: P) -> Vec<&'a T>
where
    T: Named,
    F: Fn(&T) -> f64,
    P: Fn(f64, f64) -> f64,
{
    let Some(target) = items.iter().map(|item| quantize(metric(item))).reduce(&pick) else {
        return Vec::new();
    };

    let mut tied: Vec<&T> = items
        .iter()
        .filter(|item| quantize(metric(*item)) == target)
        .collect();
    tied.sort_by(|a, b| compare_names(a.name(), b.name()));
    tied
}

/// Keep 1-based positions `start..=end` of an already ranked list.
pub fn slice_positions<T>(ranked: Vec<T>, start: usize, end: usize) -> Vec<T> {
    let from = start.max(1) - 1;
    if end <= from {
        return Vec::new();
    }
    ranked.into_iter().skip(from).take(end - from).collect()
}
