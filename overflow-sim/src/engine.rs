//! Run-level entry points: validate, fan trials out, reduce to reports.
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bonus::{BonusAllocator, SelectionStrategy};
use crate::config::{FutureParams, HistoricalParams, SimConfig};
use crate::constants::{FUTURE_SEED_DOMAIN, HISTORICAL_SEED_DOMAIN};
use crate::error::SimError;
use crate::seed::trial_rng;
use crate::stats::{
    HistogramBin, MemberSummary, PercentileBand, RunningStats, TallySummary, histogram,
    member_breakdown, percentile_band, summarize, tally_summary,
};
use crate::trial::{FutureTrial, HistoricalTrial};
use crate::worker::TrialPool;

/// Aggregated outcome of a historical replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    pub trials: usize,
    pub seed: u64,
    pub strategy: SelectionStrategy,
    pub extra_bonus_per_year: u32,
    /// Total overflow of every trial, in trial order.
    pub overflow_series: Vec<u32>,
    pub mean: f64,
    pub std_dev: f64,
    pub histogram: Vec<HistogramBin>,
    pub member_stats: Vec<MemberSummary>,
    pub tally: TallySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBand {
    pub year: u32,
    pub pool_size: usize,
    pub mean: f64,
    #[serde(flatten)]
    pub band: PercentileBand,
}

/// Aggregated outcome of a future projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureReport {
    pub trials: usize,
    pub seed: u64,
    pub strategy: SelectionStrategy,
    pub extra_bonus_per_year: u32,
    /// Cumulative overflow per trial, keyed by 1-based year.
    pub overflow_by_year: BTreeMap<u32, Vec<u32>>,
    pub bands: Vec<YearBand>,
    pub tally: TallySummary,
}

impl FutureReport {
    #[must_use]
    pub fn final_year(&self) -> Option<&YearBand> {
        self.bands.last()
    }
}

/// Validated configuration bound to a worker pool.
#[derive(Debug, Clone)]
pub struct OverflowEngine {
    config: SimConfig,
    pool: TrialPool,
}

impl OverflowEngine {
    /// # Errors
    ///
    /// Returns the configuration error, or `SimError::WorkerPool` when the
    /// thread pool cannot be built.
    pub fn new(config: SimConfig, workers: usize) -> Result<Self, SimError> {
        config.validate()?;
        let pool = TrialPool::new(workers)?;
        Ok(Self { config, pool })
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.pool.thread_count()
    }

    /// Replay the historical timeline `params.trials` times.
    ///
    /// # Errors
    ///
    /// Parameter errors are raised before any trial runs.
    pub fn run_historical(&self, params: &HistoricalParams) -> Result<HistoricalReport, SimError> {
        let timeline = &self.config.historical;
        params.validate(timeline)?;
        warn_on_oversized_bonus(params.extra_bonus_per_year, timeline.max_pool_size());
        debug!(
            "historical run: {} trials, seed {}, {} workers, strategy {}",
            params.trials,
            params.seed,
            self.worker_count(),
            params.strategy
        );

        let trial = HistoricalTrial {
            timeline,
            limited_pulls_per_patch: &params.limited_pulls_per_patch,
            standard_pulls_per_patch: &params.standard_pulls_per_patch,
            extra_bonus_per_year: params.extra_bonus_per_year,
            allocator: BonusAllocator::new(params.strategy),
        };
        let results = self.pool.run_trials(params.trials, |index| {
            let mut rng = trial_rng(params.seed, HISTORICAL_SEED_DOMAIN, index)?;
            let result = trial.run(&mut rng);
            trace!("historical trial {index}: overflow {}", result.total_overflow);
            Ok(result)
        })?;

        let overflow_series: Vec<u32> = results.iter().map(|r| r.total_overflow).collect();
        let summary = summarize(&overflow_series);
        let report = HistoricalReport {
            trials: params.trials,
            seed: params.seed,
            strategy: params.strategy,
            extra_bonus_per_year: params.extra_bonus_per_year,
            histogram: histogram(&overflow_series),
            member_stats: member_breakdown(&self.config.roster, &results),
            tally: tally_summary(results.iter().map(|r| &r.tally)),
            mean: summary.mean,
            std_dev: summary.std_dev,
            overflow_series,
        };
        debug!(
            "historical run finished: mean {:.3}, std dev {:.3}",
            report.mean, report.std_dev
        );
        Ok(report)
    }

    /// Project the player's account forward over the configured horizon.
    ///
    /// # Errors
    ///
    /// Parameter errors are raised before any trial runs.
    pub fn run_future(&self, params: &FutureParams) -> Result<FutureReport, SimError> {
        let roster = &self.config.roster;
        let horizon = &self.config.future;
        params.validate(roster)?;
        warn_on_oversized_bonus(params.extra_bonus_per_year, horizon.max_pool_size());
        debug!(
            "future run: {} trials, seed {}, {} workers, {} years",
            params.trials,
            params.seed,
            self.worker_count(),
            horizon.years
        );

        let seed_copies = params.seed_copies(roster, roster.len())?;
        let baseline = horizon.baseline_pool_size;
        let trial = FutureTrial {
            horizon,
            seed_copies: &seed_copies,
            limited: params.limited_state(baseline),
            standard: params.standard_state(baseline),
            limited_pulls_per_patch: params.limited_pulls_per_patch,
            standard_pulls_per_patch: params.standard_pulls_per_patch,
            extra_bonus_per_year: params.extra_bonus_per_year,
            allocator: BonusAllocator::new(params.strategy),
        };
        let results = self.pool.run_trials(params.trials, |index| {
            let mut rng = trial_rng(params.seed, FUTURE_SEED_DOMAIN, index)?;
            let result = trial.run(&mut rng);
            trace!("future trial {index}: {:?}", result.overflow_by_year);
            Ok(result)
        })?;

        let mut overflow_by_year: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for result in &results {
            for (year, &overflow) in (1..).zip(&result.overflow_by_year) {
                overflow_by_year.entry(year).or_default().push(overflow);
            }
        }
        let bands = overflow_by_year
            .iter()
            .filter_map(|(&year, values)| {
                let band = percentile_band(values)?;
                let stats: RunningStats = values.iter().copied().collect();
                Some(YearBand {
                    year,
                    pool_size: horizon.pool_size_for_year(year),
                    mean: stats.mean(),
                    band,
                })
            })
            .collect();

        let report = FutureReport {
            trials: params.trials,
            seed: params.seed,
            strategy: params.strategy,
            extra_bonus_per_year: params.extra_bonus_per_year,
            overflow_by_year,
            bands,
            tally: tally_summary(results.iter().map(|r| &r.tally)),
        };
        if let Some(last) = report.final_year() {
            debug!(
                "future run finished: year {} median {} ({}..{})",
                last.year, last.band.median, last.band.lower, last.band.upper
            );
        }
        Ok(report)
    }
}

fn warn_on_oversized_bonus(extra_bonus_per_year: u32, largest_pool: usize) {
    let requested = usize::try_from(extra_bonus_per_year).unwrap_or(usize::MAX);
    if requested > largest_pool {
        warn!(
            "one-time bonus count {extra_bonus_per_year} exceeds the largest pool ({largest_pool}); \
             awards stop once every member has been granted"
        );
    }
}
