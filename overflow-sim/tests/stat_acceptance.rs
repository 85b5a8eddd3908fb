use overflow_sim::{
    LimitedBannerState, LimitedPullOutcome, PrizeLedger, StandardBannerState,
    StandardPullOutcome, expected_pulls_per_success,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::convert::TryFrom;

const PULLS: u32 = 400_000;
const TOLERANCE: f64 = 0.025;

fn ratio(count: u32, total: u32) -> f64 {
    f64::from(count) / f64::from(total)
}

#[test]
fn limited_track_matches_analytic_pull_cost() {
    let mut ledger = PrizeLedger::with_members(8);
    let mut state = LimitedBannerState::new(0, false, 8);
    let mut rng = ChaCha20Rng::seed_from_u64(0xBA5E);

    let mut successes = 0u32;
    for _ in 0..PULLS {
        if state.advance_one_pull(&mut ledger, 0.5, &mut rng) != LimitedPullOutcome::Miss {
            successes += 1;
        }
    }
    let observed = f64::from(PULLS) / f64::from(successes);
    let expected = expected_pulls_per_success();
    assert!(
        (observed - expected).abs() / expected <= TOLERANCE,
        "pulls per success drifted: observed {observed:.3}, expected {expected:.3}"
    );
}

#[test]
fn lost_coin_flips_are_a_third_of_successes() {
    let mut ledger = PrizeLedger::with_members(8);
    let mut state = LimitedBannerState::new(0, false, 8);
    let mut rng = ChaCha20Rng::seed_from_u64(0x5050);

    let mut rate_up = 0u32;
    let mut off_banner = 0u32;
    for _ in 0..PULLS {
        match state.advance_one_pull(&mut ledger, 0.5, &mut rng) {
            LimitedPullOutcome::Miss => {}
            LimitedPullOutcome::RateUp => rate_up += 1,
            LimitedPullOutcome::OffBanner(_) => off_banner += 1,
        }
    }
    let share = ratio(off_banner, rate_up + off_banner);
    assert!(
        (share - 1.0 / 3.0).abs() <= TOLERANCE,
        "off-banner share drifted: {share:.4}"
    );
    let granted: u32 = ledger.as_slice().iter().sum();
    assert_eq!(granted, off_banner, "only off-banner wins reach the ledger");
}

#[test]
fn off_banner_payouts_are_uniform_over_the_pool() {
    let pool = 6;
    let mut ledger = PrizeLedger::with_members(pool);
    let mut state = LimitedBannerState::new(0, false, pool);
    let mut rng = ChaCha20Rng::seed_from_u64(0x0FF);

    for _ in 0..PULLS * 2 {
        state.advance_one_pull(&mut ledger, 1.0, &mut rng);
    }
    let total: u32 = ledger.as_slice().iter().sum();
    let expected = 1.0 / f64::from(u32::try_from(pool).expect("pool fits"));
    for (index, &copies) in ledger.as_slice().iter().enumerate() {
        let share = ratio(copies, total);
        assert!(
            (share - expected).abs() <= TOLERANCE,
            "member {index} share {share:.4} vs {expected:.4}"
        );
    }
}

#[test]
fn standard_categories_split_evenly() {
    let mut ledger = PrizeLedger::with_members(8);
    let mut state = StandardBannerState::new(0, 0, 0, 8);
    let mut rng = ChaCha20Rng::seed_from_u64(0xCA7);

    let mut category_a = 0u32;
    let mut category_b = 0u32;
    for _ in 0..PULLS {
        match state.advance_one_pull(&mut ledger, &mut rng) {
            StandardPullOutcome::Miss => {}
            StandardPullOutcome::CategoryA(_) => category_a += 1,
            StandardPullOutcome::CategoryB => category_b += 1,
        }
    }
    let share = ratio(category_a, category_a + category_b);
    assert!(
        (share - 0.5).abs() <= TOLERANCE,
        "category A share drifted: {share:.4}"
    );
    let granted: u32 = ledger.as_slice().iter().sum();
    assert_eq!(granted, category_a);
}
