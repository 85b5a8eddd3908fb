//! Periodic awards granted between pull batches.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::ledger::{BonusHistory, PrizeLedger};
use crate::roster::{MemberId, pool_ids};

/// Which copy count the allocator targets. Ties break uniformly at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    #[default]
    Lowest,
    Highest,
}

impl SelectionStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Highest => "highest",
        }
    }

    /// Pick one candidate whose copy count is the strategy's extreme.
    /// Returns `None` for an empty candidate list.
    pub fn select<R: Rng + ?Sized>(
        self,
        candidates: &[MemberId],
        ledger: &PrizeLedger,
        rng: &mut R,
    ) -> Option<MemberId> {
        let counts = candidates.iter().map(|&member| ledger.copies(member));
        let target = match self {
            Self::Lowest => counts.min()?,
            Self::Highest => counts.max()?,
        };
        let tied: SmallVec<[MemberId; 16]> = candidates
            .iter()
            .copied()
            .filter(|&member| ledger.copies(member) == target)
            .collect();
        let pick = rng.gen_range(0..tied.len());
        tied.get(pick).copied()
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest" => Ok(Self::Lowest),
            "highest" => Ok(Self::Highest),
            other => Err(format!("unknown strategy '{other}' (expected lowest or highest)")),
        }
    }
}

/// Members credited by a single one-time-bonus period.
pub type BonusGrants = SmallVec<[MemberId; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonusAllocator {
    strategy: SelectionStrategy,
}

impl BonusAllocator {
    #[must_use]
    pub const fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Grant one copy to a member of the full current pool. No eligibility limit.
    pub fn self_select<R: Rng + ?Sized>(
        &self,
        pool_size: usize,
        ledger: &mut PrizeLedger,
        rng: &mut R,
    ) -> Option<MemberId> {
        let pool: SmallVec<[MemberId; 16]> = pool_ids(pool_size).collect();
        let member = self.strategy.select(&pool, ledger, rng)?;
        ledger.grant(member);
        Some(member)
    }

    /// Grant up to `count` copies, each to a distinct pool member that has
    /// never received this bonus in the trial. Stops early when nobody is left.
    pub fn one_time_bonus<R: Rng + ?Sized>(
        &self,
        pool_size: usize,
        count: u32,
        ledger: &mut PrizeLedger,
        history: &mut BonusHistory,
        rng: &mut R,
    ) -> BonusGrants {
        let mut eligible: SmallVec<[MemberId; 16]> = pool_ids(pool_size)
            .filter(|&member| !history.contains(member))
            .collect();
        let mut grants = BonusGrants::new();
        for _ in 0..count {
            let Some(member) = self.strategy.select(&eligible, ledger, rng) else {
                break;
            };
            ledger.grant(member);
            history.record(member);
            eligible.retain(|candidate| *candidate != member);
            grants.push(member);
        }
        grants
    }
}
