//! Limited (rate-up) banner with a loss-guarantee flag.
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{random_member, unit_draw};
use crate::ledger::PrizeLedger;
use crate::probability::success_probability;
use crate::roster::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimitedBannerState {
    pub pity: u32,
    /// When set, the next success is the rate-up member.
    pub guaranteed: bool,
    pub pool_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedPullOutcome {
    Miss,
    /// Rate-up member won. Not tracked in the ledger.
    RateUp,
    /// Lost the rate-up check; a random standard member was credited.
    OffBanner(MemberId),
}

impl LimitedBannerState {
    #[must_use]
    pub const fn new(pity: u32, guaranteed: bool, pool_size: usize) -> Self {
        Self {
            pity,
            guaranteed,
            pool_size,
        }
    }

    /// Advance a single pull.
    ///
    /// A lost rate-up check sets the guarantee and credits a uniformly random
    /// member of the current pool (not the rate-up member's own pool).
    pub fn advance_one_pull<R: Rng + ?Sized>(
        &mut self,
        ledger: &mut PrizeLedger,
        off_banner_loss_probability: f64,
        rng: &mut R,
    ) -> LimitedPullOutcome {
        self.pity = self.pity.saturating_add(1);
        if unit_draw(rng) >= success_probability(self.pity) {
            return LimitedPullOutcome::Miss;
        }
        self.pity = 0;

        if self.guaranteed || unit_draw(rng) >= off_banner_loss_probability {
            self.guaranteed = false;
            return LimitedPullOutcome::RateUp;
        }

        self.guaranteed = true;
        match random_member(self.pool_size, rng) {
            Some(member) => {
                ledger.grant(member);
                LimitedPullOutcome::OffBanner(member)
            }
            None => LimitedPullOutcome::Miss,
        }
    }
}
