//! Standard banner: one five-star counter plus two category counters that
//! decide which prize type a success pays out.
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{random_member, unit_draw};
use crate::ledger::PrizeLedger;
use crate::probability::{category_a_share, success_probability};
use crate::roster::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandardBannerState {
    pub pity: u32,
    pub category_a_pity: u32,
    pub category_b_pity: u32,
    pub pool_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardPullOutcome {
    Miss,
    /// Roster member won and credited to the ledger.
    CategoryA(MemberId),
    /// Disjoint prize type, outside the ledger.
    CategoryB,
}

impl StandardBannerState {
    #[must_use]
    pub const fn new(
        pity: u32,
        category_a_pity: u32,
        category_b_pity: u32,
        pool_size: usize,
    ) -> Self {
        Self {
            pity,
            category_a_pity,
            category_b_pity,
            pool_size,
        }
    }

    pub fn advance_one_pull<R: Rng + ?Sized>(
        &mut self,
        ledger: &mut PrizeLedger,
        rng: &mut R,
    ) -> StandardPullOutcome {
        self.pity = self.pity.saturating_add(1);
        self.category_a_pity = self.category_a_pity.saturating_add(1);
        self.category_b_pity = self.category_b_pity.saturating_add(1);

        if unit_draw(rng) >= success_probability(self.pity) {
            return StandardPullOutcome::Miss;
        }
        self.pity = 0;

        if unit_draw(rng) < category_a_share(self.category_a_pity, self.category_b_pity) {
            self.category_a_pity = 0;
            match random_member(self.pool_size, rng) {
                Some(member) => {
                    ledger.grant(member);
                    StandardPullOutcome::CategoryA(member)
                }
                None => StandardPullOutcome::Miss,
            }
        } else {
            self.category_b_pity = 0;
            StandardPullOutcome::CategoryB
        }
    }
}
