//! Overflow Simulation Engine
//!
//! Monte Carlo estimate of how many standard-roster copies a player collects
//! beyond the useful cap, driven by a limited (rate-up) track, a standard
//! track and periodic bonus awards. The crate performs no I/O; callers supply
//! parameters and render the returned reports.

pub mod banner;
pub mod bonus;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod numbers;
pub mod probability;
pub mod roster;
pub mod seed;
pub mod stats;
pub mod timeline;
pub mod trial;
pub mod worker;

// Re-export commonly used types
pub use banner::{
    LimitedBannerState, LimitedPullOutcome, PullTally, StandardBannerState, StandardPullOutcome,
};
pub use bonus::{BonusAllocator, BonusGrants, SelectionStrategy};
pub use config::{FutureParams, HistoricalParams, SimConfig, copies_from_level};
pub use engine::{FutureReport, HistoricalReport, OverflowEngine, YearBand};
pub use error::SimError;
pub use ledger::{BonusHistory, PrizeLedger, overflow_of};
pub use probability::{
    category_a_share, category_weight, expected_pulls_per_success, success_probability,
};
pub use roster::{MemberId, Roster};
pub use seed::{derive_trial_seed, trial_rng};
pub use stats::{
    HistogramBin, MemberSummary, PercentileBand, RunningStats, Summary, TallySummary, histogram,
    member_breakdown, percentile_band, summarize, tally_summary,
};
pub use timeline::{FutureHorizon, HistoricalTimeline, Phase};
pub use trial::{
    FutureTrial, FutureTrialResult, HistoricalTrial, HistoricalTrialResult, MemberOutcome,
    TrialState, patch_pulls, phase_pulls,
};
pub use worker::TrialPool;
