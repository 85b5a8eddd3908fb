//! Banner state machines. Each advances one pull at a time against the
//! trial's shared `PrizeLedger`.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::roster::MemberId;

pub mod limited;
pub mod standard;

pub use limited::{LimitedBannerState, LimitedPullOutcome};
pub use standard::{StandardBannerState, StandardPullOutcome};

/// Uniform draw in `[0, 1)`.
pub(crate) fn unit_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.r#gen::<f64>()
}

/// Uniformly random member of the pool at `pool_size`.
pub(crate) fn random_member<R: Rng + ?Sized>(pool_size: usize, rng: &mut R) -> Option<MemberId> {
    if pool_size == 0 {
        return None;
    }
    Some(MemberId(rng.gen_range(0..pool_size)))
}

/// Running count of five-star outcomes across both tracks of one trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullTally {
    pub limited_rate_up: u32,
    pub limited_off_banner: u32,
    pub standard_category_a: u32,
    pub standard_category_b: u32,
}

impl PullTally {
    pub fn record_limited(&mut self, outcome: LimitedPullOutcome) {
        match outcome {
            LimitedPullOutcome::Miss => {}
            LimitedPullOutcome::RateUp => self.limited_rate_up += 1,
            LimitedPullOutcome::OffBanner(_) => self.limited_off_banner += 1,
        }
    }

    pub fn record_standard(&mut self, outcome: StandardPullOutcome) {
        match outcome {
            StandardPullOutcome::Miss => {}
            StandardPullOutcome::CategoryA(_) => self.standard_category_a += 1,
            StandardPullOutcome::CategoryB => self.standard_category_b += 1,
        }
    }
}
