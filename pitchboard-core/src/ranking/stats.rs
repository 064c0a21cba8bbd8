use itertools::Itertools;

/// Summary of the official totals of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
}

impl Stats {
    /// `None` when there is nothing to summarize.
    pub fn from_totals(totals: &[f64]) -> Option<Stats> {
        let (min, max) = totals.iter().copied().minmax_by(f64::total_cmp).into_option()?;
        let mean = totals.iter().sum::<f64>() / totals.len() as f64;
        Some(Stats {
            mean: round2(mean),
            median: round2(median(totals)?),
            max,
            min,
        })
    }
}

/// Middle value; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => sorted.get(mid).copied(),
        _ => Some((sorted.get(mid - 1)? + sorted.get(mid)?) / 2.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
