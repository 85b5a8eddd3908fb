//! Centralized pull-mechanics constants for the overflow engine.
//!
//! These values define the deterministic math behind every simulated pull.
//! They are deliberately not part of `SimConfig`: the roster and timeline
//! can be overridden from JSON, the pity curve cannot.

// Five-star pity curve -----------------------------------------------------
pub const BASE_SUCCESS_RATE: f64 = 0.006;
pub const SOFT_PITY_START: u32 = 73;
pub const HARD_PITY: u32 = 90;
/// Soft-pity ramp numerator offset, in basis points of 1/10000.
pub(crate) const SOFT_PITY_BASE_BP: f64 = 60.0;
pub(crate) const SOFT_PITY_STEP_BP: f64 = 600.0;
pub(crate) const BASIS_POINTS: f64 = 10_000.0;

// Standard banner category selection --------------------------------------
pub const CATEGORY_BASE_WEIGHT: f64 = 30.0;
pub const CATEGORY_SOFT_PITY_START: u32 = 146;
pub(crate) const CATEGORY_WEIGHT_STEP: f64 = 300.0;

// Roster and calendar -------------------------------------------------------
/// Copies beyond this count are overflow (base copy plus six upgrades).
pub const OVERFLOW_CAP: u32 = 7;
pub const PATCHES_PER_YEAR: u32 = 9;
pub const DEFAULT_MIN_POOL_SIZE: usize = 5;
pub const DEFAULT_FUTURE_YEARS: u32 = 5;
pub const DEFAULT_FUTURE_BASELINE_POOL: usize = 8;
pub const DEFAULT_FUTURE_OFF_BANNER_LOSS: f64 = 0.45;
pub const DEFAULT_SELF_SELECT_FROM_VERSION: f64 = 5.0;
pub const DEFAULT_ONE_TIME_BONUS_FROM_VERSION: f64 = 6.0;

/// Sentinel used by callers for "member not owned" in starting copy counts.
pub const NOT_OWNED_SENTINEL: i32 = -1;

// Percentile bands ----------------------------------------------------------
pub const BAND_LOWER_QUANTILE: f64 = 0.025;
pub const BAND_MEDIAN_QUANTILE: f64 = 0.5;
pub const BAND_UPPER_QUANTILE: f64 = 0.975;

// Worker pool ---------------------------------------------------------------
/// Minimum number of consecutive trials a worker claims at once.
pub(crate) const TRIAL_CHUNK: usize = 64;
pub(crate) const WORKER_STACK_BYTES: usize = 4 * 1024 * 1024;

// Seed derivation domains -------------------------------------------------
pub(crate) const HISTORICAL_SEED_DOMAIN: &[u8] = b"overflow.historical";
pub(crate) const FUTURE_SEED_DOMAIN: &[u8] = b"overflow.future";
