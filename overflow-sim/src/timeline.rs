//! Historical patch timeline and the projected future horizon.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FUTURE_BASELINE_POOL, DEFAULT_FUTURE_OFF_BANNER_LOSS, DEFAULT_FUTURE_YEARS,
    DEFAULT_ONE_TIME_BONUS_FROM_VERSION, DEFAULT_SELF_SELECT_FROM_VERSION, PATCHES_PER_YEAR,
};
use crate::error::SimError;
use crate::roster::Roster;

/// One immutable segment of the historical timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub label: String,
    pub patch_count: u32,
    pub start_version: f64,
    pub pool_size: usize,
    pub off_banner_loss_probability: f64,
}

impl Phase {
    #[must_use]
    pub fn new(
        label: &str,
        patch_count: u32,
        start_version: f64,
        pool_size: usize,
        off_banner_loss_probability: f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            patch_count,
            start_version,
            pool_size,
            off_banner_loss_probability,
        }
    }

    /// Whole years contained in the phase; partial years earn no awards.
    #[must_use]
    pub const fn whole_years(&self) -> u32 {
        self.patch_count / PATCHES_PER_YEAR
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTimeline {
    #[serde(default = "HistoricalTimeline::default_phases")]
    pub phases: Vec<Phase>,
    #[serde(default = "HistoricalTimeline::default_self_select_from")]
    pub self_select_from_version: f64,
    #[serde(default = "HistoricalTimeline::default_one_time_bonus_from")]
    pub one_time_bonus_from_version: f64,
}

impl HistoricalTimeline {
    fn default_phases() -> Vec<Phase> {
        vec![
            Phase::new("1.0-2.8", 17, 1.0, 5, 0.5),
            Phase::new("3.0-3.4", 5, 3.0, 6, 0.5),
            Phase::new("3.5-4.8", 12, 3.5, 7, 0.5),
            Phase::new("5.0-5.3", 4, 5.0, 7, 0.45),
            Phase::new("5.4-Present", 5, 5.4, 8, 0.45),
        ]
    }

    const fn default_self_select_from() -> f64 {
        DEFAULT_SELF_SELECT_FROM_VERSION
    }

    const fn default_one_time_bonus_from() -> f64 {
        DEFAULT_ONE_TIME_BONUS_FROM_VERSION
    }

    /// Largest pool reached by any phase; sizes the per-trial ledger.
    #[must_use]
    pub fn max_pool_size(&self) -> usize {
        self.phases.iter().map(|p| p.pool_size).max().unwrap_or(0)
    }

    /// Check every phase against the roster.
    ///
    /// # Errors
    ///
    /// Returns `SimError::EmptyPhase` for a phase without patches,
    /// `SimError::ShrinkingPool` when a phase declares a smaller pool than
    /// the one before it, `SimError::UnknownPoolSize` for a pool size without
    /// a roster definition, or `SimError::InvalidProbability` for a bad loss rate.
    pub fn validate(&self, roster: &Roster) -> Result<(), SimError> {
        let mut previous_pool: Option<usize> = None;
        for phase in &self.phases {
            if phase.patch_count == 0 {
                return Err(SimError::EmptyPhase {
                    phase: phase.label.clone(),
                });
            }
            if let Some(previous) = previous_pool.filter(|&prev| phase.pool_size < prev) {
                return Err(SimError::ShrinkingPool {
                    phase: phase.label.clone(),
                    previous,
                    requested: phase.pool_size,
                });
            }
            previous_pool = Some(phase.pool_size);
            roster.check_pool_size(phase.pool_size)?;
            check_probability(
                "phase.off_banner_loss_probability",
                phase.off_banner_loss_probability,
            )?;
        }
        Ok(())
    }
}

impl Default for HistoricalTimeline {
    fn default() -> Self {
        Self {
            phases: Self::default_phases(),
            self_select_from_version: Self::default_self_select_from(),
            one_time_bonus_from_version: Self::default_one_time_bonus_from(),
        }
    }
}

/// Fixed projection window; the pool grows by one member per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureHorizon {
    #[serde(default = "FutureHorizon::default_years")]
    pub years: u32,
    #[serde(default = "FutureHorizon::default_baseline_pool_size")]
    pub baseline_pool_size: usize,
    #[serde(default = "FutureHorizon::default_off_banner_loss")]
    pub off_banner_loss_probability: f64,
}

impl FutureHorizon {
    const fn default_years() -> u32 {
        DEFAULT_FUTURE_YEARS
    }

    const fn default_baseline_pool_size() -> usize {
        DEFAULT_FUTURE_BASELINE_POOL
    }

    const fn default_off_banner_loss() -> f64 {
        DEFAULT_FUTURE_OFF_BANNER_LOSS
    }

    /// Pool size in effect during `year` (1-based).
    #[must_use]
    pub fn pool_size_for_year(&self, year: u32) -> usize {
        let offset = usize::try_from(year.saturating_sub(1)).unwrap_or(usize::MAX);
        self.baseline_pool_size.saturating_add(offset)
    }

    #[must_use]
    pub fn max_pool_size(&self) -> usize {
        self.pool_size_for_year(self.years.max(1))
    }

    #[must_use]
    pub const fn total_patches(&self) -> u32 {
        self.years.saturating_mul(PATCHES_PER_YEAR)
    }

    /// Check that every projected year has a roster definition.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownPoolSize` when the horizon outgrows the roster.
    pub fn validate(&self, roster: &Roster) -> Result<(), SimError> {
        roster.check_pool_size(self.baseline_pool_size)?;
        roster.check_pool_size(self.max_pool_size())?;
        check_probability(
            "future.off_banner_loss_probability",
            self.off_banner_loss_probability,
        )
    }
}

impl Default for FutureHorizon {
    fn default() -> Self {
        Self {
            years: Self::default_years(),
            baseline_pool_size: Self::default_baseline_pool_size(),
            off_banner_loss_probability: Self::default_off_banner_loss(),
        }
    }
}

pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<(), SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability { field, value })
    }
}
