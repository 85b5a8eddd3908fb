//! Pity curves: five-star success odds and standard-banner category weights.

use crate::constants::{
    BASE_SUCCESS_RATE, BASIS_POINTS, CATEGORY_BASE_WEIGHT, CATEGORY_SOFT_PITY_START,
    CATEGORY_WEIGHT_STEP, HARD_PITY, SOFT_PITY_BASE_BP, SOFT_PITY_START, SOFT_PITY_STEP_BP,
};

/// Probability that the pull bringing the counter to `pity` is a success.
///
/// Callers pass the counter value *after* incrementing it for the current
/// pull, so the first pull after a reset is evaluated at `pity == 1`.
#[must_use]
pub fn success_probability(pity: u32) -> f64 {
    if pity <= SOFT_PITY_START {
        return BASE_SUCCESS_RATE;
    }
    if pity >= HARD_PITY {
        return 1.0;
    }
    let steps = f64::from(pity - SOFT_PITY_START);
    (SOFT_PITY_BASE_BP + SOFT_PITY_STEP_BP * steps) / BASIS_POINTS
}

/// Selection weight of a standard-banner category given its own pity counter.
#[must_use]
pub fn category_weight(pity: u32) -> f64 {
    if pity <= CATEGORY_SOFT_PITY_START {
        CATEGORY_BASE_WEIGHT
    } else {
        CATEGORY_BASE_WEIGHT + CATEGORY_WEIGHT_STEP * f64::from(pity - CATEGORY_SOFT_PITY_START)
    }
}

/// Chance that category A wins a standard-banner success.
#[must_use]
pub fn category_a_share(category_a_pity: u32, category_b_pity: u32) -> f64 {
    let weight_a = category_weight(category_a_pity);
    let weight_b = category_weight(category_b_pity);
    weight_a / (weight_a + weight_b)
}

/// Expected number of pulls from a fresh counter to the first success.
#[must_use]
pub fn expected_pulls_per_success() -> f64 {
    let mut survival = 1.0;
    let mut expected = 0.0;
    for pity in 1..=HARD_PITY {
        let p = success_probability(pity);
        expected += f64::from(pity) * survival * p;
        survival *= 1.0 - p;
        if p >= 1.0 {
            break;
        }
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rate_holds_through_soft_pity_start() {
        assert!((success_probability(1) - 0.006).abs() < f64::EPSILON);
        assert!((success_probability(73) - 0.006).abs() < f64::EPSILON);
    }

    #[test]
    fn soft_pity_ramps_linearly() {
        assert!((success_probability(74) - 0.066).abs() < 1e-12);
        assert!((success_probability(84) - 0.66).abs() < 1e-12);
        assert!((success_probability(89) - 0.966).abs() < 1e-12);
    }

    #[test]
    fn hard_pity_is_certain() {
        assert!((success_probability(90) - 1.0).abs() < f64::EPSILON);
        assert!((success_probability(250) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn curve_is_non_decreasing() {
        let mut previous = success_probability(0);
        for pity in 1..=120 {
            let current = success_probability(pity);
            assert!(current >= previous, "curve dipped at pity {pity}");
            previous = current;
        }
    }

    #[test]
    fn category_weights_ramp_after_threshold() {
        assert!((category_weight(0) - 30.0).abs() < f64::EPSILON);
        assert!((category_weight(146) - 30.0).abs() < f64::EPSILON);
        assert!((category_weight(147) - 330.0).abs() < f64::EPSILON);
        assert!((category_a_share(10, 10) - 0.5).abs() < f64::EPSILON);
        assert!(category_a_share(147, 1) > 0.9);
    }

    #[test]
    fn expected_pulls_sits_between_soft_and_hard_pity() {
        let expected = expected_pulls_per_success();
        assert!(expected > 60.0 && expected < 65.0, "got {expected}");
    }
}
