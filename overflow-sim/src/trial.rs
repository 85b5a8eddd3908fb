//! Single-trial orchestration for the historical replay and the future
//! projection. Each trial owns exactly one ledger, one bonus history and the
//! two banner states; calls into them are strictly sequential.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::banner::{LimitedBannerState, PullTally, StandardBannerState};
use crate::bonus::BonusAllocator;
use crate::constants::PATCHES_PER_YEAR;
use crate::ledger::{BonusHistory, PrizeLedger, overflow_of};
use crate::numbers::round_f64_to_u32;
use crate::timeline::{FutureHorizon, HistoricalTimeline};

/// Pull count for a whole phase: `round(patches * average)`.
#[must_use]
pub fn phase_pulls(patch_count: u32, average_per_patch: f64) -> u32 {
    round_f64_to_u32(f64::from(patch_count) * average_per_patch)
}

/// Pulls for the 1-based `patch` of a horizon. Fractions carry over so the
/// first `n` patches receive exactly `round(n * average)` pulls in total,
/// rather than `n * ceil(average)` from rounding every patch up.
#[must_use]
pub fn patch_pulls(patch: u32, average_per_patch: f64) -> u32 {
    let through = phase_pulls(patch, average_per_patch);
    let before = phase_pulls(patch.saturating_sub(1), average_per_patch);
    through.saturating_sub(before)
}

/// Mutable state of one trial.
#[derive(Debug, Clone)]
pub struct TrialState {
    pub ledger: PrizeLedger,
    pub history: BonusHistory,
    pub limited: LimitedBannerState,
    pub standard: StandardBannerState,
    pub tally: PullTally,
}

impl TrialState {
    #[must_use]
    pub fn new(
        ledger: PrizeLedger,
        limited: LimitedBannerState,
        standard: StandardBannerState,
    ) -> Self {
        Self {
            ledger,
            history: BonusHistory::default(),
            limited,
            standard,
            tally: PullTally::default(),
        }
    }

    /// Both tracks move to a new pool; pool size never shrinks in a trial.
    pub fn set_pool_size(&mut self, pool_size: usize) {
        let pool_size = pool_size.max(self.limited.pool_size);
        self.limited.pool_size = pool_size;
        self.standard.pool_size = pool_size;
    }

    pub fn pull_limited<R: Rng + ?Sized>(&mut self, pulls: u32, loss_probability: f64, rng: &mut R) {
        for _ in 0..pulls {
            let outcome = self
                .limited
                .advance_one_pull(&mut self.ledger, loss_probability, rng);
            self.tally.record_limited(outcome);
        }
    }

    pub fn pull_standard<R: Rng + ?Sized>(&mut self, pulls: u32, rng: &mut R) {
        for _ in 0..pulls {
            let outcome = self.standard.advance_one_pull(&mut self.ledger, rng);
            self.tally.record_standard(outcome);
        }
    }

    pub fn award_self_select<R: Rng + ?Sized>(&mut self, allocator: &BonusAllocator, rng: &mut R) {
        allocator.self_select(self.limited.pool_size, &mut self.ledger, rng);
    }

    pub fn award_one_time_bonus<R: Rng + ?Sized>(
        &mut self,
        allocator: &BonusAllocator,
        count: u32,
        rng: &mut R,
    ) {
        if count == 0 {
            return;
        }
        allocator.one_time_bonus(
            self.limited.pool_size,
            count,
            &mut self.ledger,
            &mut self.history,
            rng,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub copies: u32,
    pub overflow: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTrialResult {
    pub total_overflow: u32,
    /// Indexed by roster position, covering the largest historical pool.
    pub per_member: Vec<MemberOutcome>,
    pub tally: PullTally,
}

impl HistoricalTrialResult {
    fn from_state(state: &TrialState) -> Self {
        let per_member: Vec<MemberOutcome> = state
            .ledger
            .as_slice()
            .iter()
            .map(|&copies| MemberOutcome {
                copies,
                overflow: overflow_of(copies),
            })
            .collect();
        let total_overflow = per_member.iter().map(|m| m.overflow).sum();
        Self {
            total_overflow,
            per_member,
            tally: state.tally,
        }
    }
}

/// Inputs of one historical replay trial, borrowed from the run parameters.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalTrial<'a> {
    pub timeline: &'a HistoricalTimeline,
    pub limited_pulls_per_patch: &'a [f64],
    pub standard_pulls_per_patch: &'a [f64],
    pub extra_bonus_per_year: u32,
    pub allocator: BonusAllocator,
}

impl HistoricalTrial<'_> {
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> HistoricalTrialResult {
        let members = self.timeline.max_pool_size();
        let mut state = TrialState::new(
            PrizeLedger::with_members(members),
            LimitedBannerState::default(),
            StandardBannerState::default(),
        );

        for (index, phase) in self.timeline.phases.iter().enumerate() {
            state.set_pool_size(phase.pool_size);

            let limited_rate = self.limited_pulls_per_patch.get(index).copied().unwrap_or(0.0);
            let standard_rate = self.standard_pulls_per_patch.get(index).copied().unwrap_or(0.0);
            state.pull_limited(
                phase_pulls(phase.patch_count, limited_rate),
                phase.off_banner_loss_probability,
                rng,
            );
            state.pull_standard(phase_pulls(phase.patch_count, standard_rate), rng);

            let self_select = phase.start_version >= self.timeline.self_select_from_version;
            let one_time = phase.start_version >= self.timeline.one_time_bonus_from_version;
            for _ in 0..phase.whole_years() {
                if self_select {
                    state.award_self_select(&self.allocator, rng);
                }
                if one_time {
                    state.award_one_time_bonus(&self.allocator, self.extra_bonus_per_year, rng);
                }
            }
        }

        HistoricalTrialResult::from_state(&state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureTrialResult {
    /// Cumulative total overflow at the end of each projected year.
    pub overflow_by_year: Vec<u32>,
    pub tally: PullTally,
}

/// Inputs of one future projection trial.
#[derive(Debug, Clone, Copy)]
pub struct FutureTrial<'a> {
    pub horizon: &'a FutureHorizon,
    /// Starting ledger counts in roster order.
    pub seed_copies: &'a [u32],
    pub limited: LimitedBannerState,
    pub standard: StandardBannerState,
    pub limited_pulls_per_patch: f64,
    pub standard_pulls_per_patch: f64,
    pub extra_bonus_per_year: u32,
    pub allocator: BonusAllocator,
}

impl FutureTrial<'_> {
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> FutureTrialResult {
        let members = self.seed_copies.len().max(self.horizon.max_pool_size());
        let mut state = TrialState::new(
            PrizeLedger::seeded(self.seed_copies.to_vec(), members),
            self.limited,
            self.standard,
        );
        let years = usize::try_from(self.horizon.years).unwrap_or(0);
        let mut overflow_by_year = Vec::with_capacity(years);

        for year in 1..=self.horizon.years {
            state.set_pool_size(self.horizon.pool_size_for_year(year));
            state.award_self_select(&self.allocator, rng);
            state.award_one_time_bonus(&self.allocator, self.extra_bonus_per_year, rng);

            let first_patch = (year - 1) * PATCHES_PER_YEAR;
            for patch in first_patch + 1..=first_patch + PATCHES_PER_YEAR {
                state.pull_limited(
                    patch_pulls(patch, self.limited_pulls_per_patch),
                    self.horizon.off_banner_loss_probability,
                    rng,
                );
                state.pull_standard(patch_pulls(patch, self.standard_pulls_per_patch), rng);
            }

            overflow_by_year.push(state.ledger.total_overflow());
        }

        FutureTrialResult {
            overflow_by_year,
            tally: state.tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::SelectionStrategy;
    use crate::timeline::Phase;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn allocator() -> BonusAllocator {
        BonusAllocator::new(SelectionStrategy::Lowest)
    }

    fn idle_historical(timeline: &HistoricalTimeline, extra: u32) -> HistoricalTrialResult {
        let zeros = vec![0.0; timeline.phases.len()];
        let trial = HistoricalTrial {
            timeline,
            limited_pulls_per_patch: &zeros,
            standard_pulls_per_patch: &zeros,
            extra_bonus_per_year: extra,
            allocator: allocator(),
        };
        trial.run(&mut ChaCha20Rng::seed_from_u64(1))
    }

    #[test]
    fn phase_pulls_round_half_up() {
        assert_eq!(phase_pulls(17, 40.5), 689);
        assert_eq!(phase_pulls(5, 0.0), 0);
        assert_eq!(phase_pulls(4, 0.125), 1);
    }

    #[test]
    fn patch_pulls_accumulate_fractions() {
        let per_patch: Vec<u32> = (1..=4).map(|p| patch_pulls(p, 2.5)).collect();
        assert_eq!(per_patch.iter().sum::<u32>(), 10);
        assert_eq!(per_patch, vec![3, 2, 3, 2]);
        let total: u32 = (1..=45).map(|p| patch_pulls(p, 41.3)).sum();
        assert_eq!(total, phase_pulls(45, 41.3));
    }

    #[test]
    fn idle_default_history_produces_no_copies() {
        let result = idle_historical(&HistoricalTimeline::default(), 3);
        assert_eq!(result.total_overflow, 0);
        assert_eq!(result.per_member.len(), 8);
        assert!(result.per_member.iter().all(|m| m.copies == 0));
    }

    #[test]
    fn self_select_counts_whole_years_after_threshold() {
        let timeline = HistoricalTimeline {
            phases: vec![
                Phase::new("early", 18, 4.0, 5, 0.5),
                Phase::new("late", 18, 5.0, 5, 0.45),
            ],
            ..HistoricalTimeline::default()
        };
        let result = idle_historical(&timeline, 0);
        let copies: u32 = result.per_member.iter().map(|m| m.copies).sum();
        assert_eq!(copies, 2);
        assert_eq!(result.total_overflow, 0);
    }

    #[test]
    fn one_time_bonus_starts_at_its_version() {
        let timeline = HistoricalTimeline {
            phases: vec![Phase::new("six", 9, 6.0, 6, 0.45)],
            ..HistoricalTimeline::default()
        };
        let result = idle_historical(&timeline, 2);
        let copies: Vec<u32> = result.per_member.iter().map(|m| m.copies).collect();
        assert_eq!(copies.iter().sum::<u32>(), 3);
        assert!(copies.iter().all(|&c| c <= 1), "lowest strategy spreads awards: {copies:?}");
    }

    #[test]
    fn historical_total_matches_member_overflow() {
        let timeline = HistoricalTimeline::default();
        let limited = vec![120.0; 5];
        let standard = vec![60.0; 5];
        let trial = HistoricalTrial {
            timeline: &timeline,
            limited_pulls_per_patch: &limited,
            standard_pulls_per_patch: &standard,
            extra_bonus_per_year: 1,
            allocator: BonusAllocator::new(SelectionStrategy::Highest),
        };
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        for _ in 0..20 {
            let result = trial.run(&mut rng);
            let expected: u32 = result
                .per_member
                .iter()
                .map(|m| m.copies.saturating_sub(7))
                .sum();
            assert_eq!(result.total_overflow, expected);
            assert!(result.per_member.iter().all(|m| m.overflow == m.copies.saturating_sub(7)));
        }
    }

    #[test]
    fn future_overflow_is_cumulative_and_non_decreasing() {
        let horizon = FutureHorizon::default();
        let seed = vec![7, 7, 7, 7, 7, 7, 7, 7];
        let trial = FutureTrial {
            horizon: &horizon,
            seed_copies: &seed,
            limited: LimitedBannerState::new(0, false, 8),
            standard: StandardBannerState::new(0, 0, 0, 8),
            limited_pulls_per_patch: 60.0,
            standard_pulls_per_patch: 20.0,
            extra_bonus_per_year: 0,
            allocator: allocator(),
        };
        let result = trial.run(&mut ChaCha20Rng::seed_from_u64(5));
        assert_eq!(result.overflow_by_year.len(), 5);
        assert!(result.overflow_by_year.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn idle_future_grants_one_self_select_per_year() {
        let horizon = FutureHorizon::default();
        let seed = vec![0; 13];
        let trial = FutureTrial {
            horizon: &horizon,
            seed_copies: &seed,
            limited: LimitedBannerState::new(0, false, 8),
            standard: StandardBannerState::new(0, 0, 0, 8),
            limited_pulls_per_patch: 0.0,
            standard_pulls_per_patch: 0.0,
            extra_bonus_per_year: 0,
            allocator: BonusAllocator::new(SelectionStrategy::Highest),
        };
        let result = trial.run(&mut ChaCha20Rng::seed_from_u64(8));
        // Highest keeps stacking one member: 5 copies, still under the cap.
        assert_eq!(result.overflow_by_year, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn stacked_member_overflows_under_highest_strategy() {
        let horizon = FutureHorizon::default();
        let mut seed = vec![0; 13];
        seed[2] = 7;
        let trial = FutureTrial {
            horizon: &horizon,
            seed_copies: &seed,
            limited: LimitedBannerState::new(0, false, 8),
            standard: StandardBannerState::new(0, 0, 0, 8),
            limited_pulls_per_patch: 0.0,
            standard_pulls_per_patch: 0.0,
            extra_bonus_per_year: 0,
            allocator: BonusAllocator::new(SelectionStrategy::Highest),
        };
        let result = trial.run(&mut ChaCha20Rng::seed_from_u64(8));
        assert_eq!(result.overflow_by_year, vec![1, 2, 3, 4, 5]);
    }
}
