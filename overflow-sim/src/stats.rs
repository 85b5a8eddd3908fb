//! Reductions over many trials: summary moments, per-member breakdown,
//! overflow histogram and year-indexed percentile bands.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::banner::PullTally;
use crate::constants::{BAND_LOWER_QUANTILE, BAND_MEDIAN_QUANTILE, BAND_UPPER_QUANTILE};
use crate::numbers::{floor_index, u64_to_f64, usize_to_f64};
use crate::roster::{MemberId, Roster};
use crate::trial::HistoricalTrialResult;

/// Streaming mean and population variance (Welford).
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let count = u64_to_f64(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// Population variance: divides by N, not N - 1.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / u64_to_f64(self.count)
        }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl FromIterator<u32> for RunningStats {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut stats = Self::default();
        for value in iter {
            stats.add(f64::from(value));
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
}

#[must_use]
pub fn summarize(values: &[u32]) -> Summary {
    let stats: RunningStats = values.iter().copied().collect();
    Summary {
        mean: stats.mean(),
        std_dev: stats.std_dev(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub overflow: u32,
    pub trials: usize,
    /// Share of all trials, in percent.
    pub percent: f64,
}

/// One bin per distinct observed value, ascending.
#[must_use]
pub fn histogram(values: &[u32]) -> Vec<HistogramBin> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &value in values {
        *counts.entry(value).or_default() += 1;
    }
    let total = usize_to_f64(values.len());
    counts
        .into_iter()
        .map(|(overflow, trials)| HistogramBin {
            overflow,
            trials,
            percent: usize_to_f64(trials) / total * 100.0,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
    pub mean_copies: f64,
    pub mean_overflow: f64,
}

/// Mean copies and overflow per member across historical trials.
#[must_use]
pub fn member_breakdown(roster: &Roster, results: &[HistoricalTrialResult]) -> Vec<MemberSummary> {
    let members = results.iter().map(|r| r.per_member.len()).max().unwrap_or(0);
    let mut copies = vec![RunningStats::default(); members];
    let mut overflow = vec![RunningStats::default(); members];
    for result in results {
        for (index, outcome) in result.per_member.iter().enumerate() {
            copies[index].add(f64::from(outcome.copies));
            overflow[index].add(f64::from(outcome.overflow));
        }
    }
    copies
        .iter()
        .zip(&overflow)
        .enumerate()
        .map(|(index, (c, o))| MemberSummary {
            name: roster
                .name(MemberId(index))
                .map_or_else(|| MemberId(index).to_string(), ToString::to_string),
            mean_copies: c.mean(),
            mean_overflow: o.mean(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TallySummary {
    pub limited_rate_up: f64,
    pub limited_off_banner: f64,
    pub standard_category_a: f64,
    pub standard_category_b: f64,
}

#[must_use]
pub fn tally_summary<'a, I>(tallies: I) -> TallySummary
where
    I: IntoIterator<Item = &'a PullTally>,
{
    let mut rate_up = RunningStats::default();
    let mut off_banner = RunningStats::default();
    let mut category_a = RunningStats::default();
    let mut category_b = RunningStats::default();
    for tally in tallies {
        rate_up.add(f64::from(tally.limited_rate_up));
        off_banner.add(f64::from(tally.limited_off_banner));
        category_a.add(f64::from(tally.standard_category_a));
        category_b.add(f64::from(tally.standard_category_b));
    }
    TallySummary {
        limited_rate_up: rate_up.mean(),
        limited_off_banner: off_banner.mean(),
        standard_category_a: category_a.mean(),
        standard_category_b: category_b.mean(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PercentileBand {
    pub lower: u32,
    pub median: u32,
    pub upper: u32,
}

/// Empirical band read at `floor(N * q)` of the ascending sort.
/// Returns `None` when there are no samples.
#[must_use]
pub fn percentile_band(values: &[u32]) -> Option<PercentileBand> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = usize_to_f64(sorted.len());
    let at = |q: f64| floor_index(n * q, sorted.len()).and_then(|i| sorted.get(i).copied());
    Some(PercentileBand {
        lower: at(BAND_LOWER_QUANTILE)?,
        median: at(BAND_MEDIAN_QUANTILE)?,
        upper: at(BAND_UPPER_QUANTILE)?,
    })
}
