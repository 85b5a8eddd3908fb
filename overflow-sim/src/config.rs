//! Engine configuration and per-run parameters.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::banner::{LimitedBannerState, StandardBannerState};
use crate::bonus::SelectionStrategy;
use crate::constants::NOT_OWNED_SENTINEL;
use crate::error::SimError;
use crate::roster::{MemberId, Roster};
use crate::timeline::{FutureHorizon, HistoricalTimeline};

/// Roster and timeline data. Overridable from JSON; every section defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub historical: HistoricalTimeline,
    #[serde(default)]
    pub future: FutureHorizon,
}

impl SimConfig {
    /// Parse a JSON override; missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` on malformed JSON, or the validation error.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the roster and every pool size the timelines will request.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SimError> {
        self.roster.validate()?;
        self.historical.validate(&self.roster)?;
        self.future.validate(&self.roster)?;
        Ok(())
    }
}

fn default_trials() -> usize {
    10_000
}

fn default_seed() -> u64 {
    1337
}

/// Parameters for a historical replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalParams {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Average limited pulls per patch, one entry per phase.
    pub limited_pulls_per_patch: Vec<f64>,
    /// Average standard pulls per patch, one entry per phase.
    pub standard_pulls_per_patch: Vec<f64>,
    #[serde(default)]
    pub extra_bonus_per_year: u32,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl HistoricalParams {
    /// Parameters with the same pull rates for every phase.
    #[must_use]
    pub fn uniform(phases: usize, limited: f64, standard: f64) -> Self {
        Self {
            trials: default_trials(),
            seed: default_seed(),
            limited_pulls_per_patch: vec![limited; phases],
            standard_pulls_per_patch: vec![standard; phases],
            extra_bonus_per_year: 0,
            strategy: SelectionStrategy::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `SimError::NoTrials` or `SimError::PhaseRateMismatch`.
    pub fn validate(&self, timeline: &HistoricalTimeline) -> Result<(), SimError> {
        if self.trials == 0 {
            return Err(SimError::NoTrials);
        }
        let phases = timeline.phases.len();
        if self.limited_pulls_per_patch.len() != phases
            || self.standard_pulls_per_patch.len() != phases
        {
            return Err(SimError::PhaseRateMismatch {
                phases,
                limited: self.limited_pulls_per_patch.len(),
                standard: self.standard_pulls_per_patch.len(),
            });
        }
        Ok(())
    }
}

/// Parameters for a forward projection from the player's current account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureParams {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Upgrade level per member name; `-1` means not owned.
    #[serde(default)]
    pub starting_copies: BTreeMap<String, i32>,
    #[serde(default)]
    pub limited_pity: u32,
    #[serde(default)]
    pub limited_guaranteed: bool,
    #[serde(default)]
    pub standard_pity: u32,
    #[serde(default)]
    pub category_a_pity: u32,
    #[serde(default)]
    pub category_b_pity: u32,
    pub limited_pulls_per_patch: f64,
    pub standard_pulls_per_patch: f64,
    #[serde(default)]
    pub extra_bonus_per_year: u32,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl FutureParams {
    #[must_use]
    pub fn new(limited_pulls_per_patch: f64, standard_pulls_per_patch: f64) -> Self {
        Self {
            trials: default_trials(),
            seed: default_seed(),
            starting_copies: BTreeMap::new(),
            limited_pity: 0,
            limited_guaranteed: false,
            standard_pity: 0,
            category_a_pity: 0,
            category_b_pity: 0,
            limited_pulls_per_patch,
            standard_pulls_per_patch,
            extra_bonus_per_year: 0,
            strategy: SelectionStrategy::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `SimError::NoTrials`, `SimError::UnknownMember` or
    /// `SimError::DuplicateMember`.
    pub fn validate(&self, roster: &Roster) -> Result<(), SimError> {
        if self.trials == 0 {
            return Err(SimError::NoTrials);
        }
        self.resolve_starting_copies(roster)?;
        Ok(())
    }

    /// Resolve `starting_copies` names against the roster. Names match
    /// case-insensitively, so two keys naming the same member are rejected.
    fn resolve_starting_copies(&self, roster: &Roster) -> Result<Vec<(MemberId, i32)>, SimError> {
        let mut resolved: Vec<(MemberId, i32)> = Vec::with_capacity(self.starting_copies.len());
        for (name, &level) in &self.starting_copies {
            let member = roster.find(name)?;
            if resolved.iter().any(|(seen, _)| *seen == member) {
                return Err(SimError::DuplicateMember(name.trim().to_string()));
            }
            resolved.push((member, level));
        }
        Ok(resolved)
    }

    /// Initial ledger counts in roster order, sized to `members`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownMember` for a name outside the roster, or
    /// `SimError::DuplicateMember` when one member is named twice.
    pub fn seed_copies(&self, roster: &Roster, members: usize) -> Result<Vec<u32>, SimError> {
        let mut copies = vec![0; members.max(roster.len())];
        for (member, level) in self.resolve_starting_copies(roster)? {
            if let Some(slot) = copies.get_mut(member.index()) {
                *slot = copies_from_level(level);
            }
        }
        copies.truncate(members);
        Ok(copies)
    }

    #[must_use]
    pub const fn limited_state(&self, pool_size: usize) -> LimitedBannerState {
        LimitedBannerState::new(self.limited_pity, self.limited_guaranteed, pool_size)
    }

    #[must_use]
    pub const fn standard_state(&self, pool_size: usize) -> StandardBannerState {
        StandardBannerState::new(
            self.standard_pity,
            self.category_a_pity,
            self.category_b_pity,
            pool_size,
        )
    }
}

/// Map a caller-facing upgrade level to a ledger copy count.
/// Not owned is zero copies; level `v` already holds `v + 1` copies.
#[must_use]
pub fn copies_from_level(level: i32) -> u32 {
    if level <= NOT_OWNED_SENTINEL {
        0
    } else {
        u32::try_from(level).map_or(0, |v| v.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = SimConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SimConfig::default());
    }

    #[test]
    fn json_override_is_validated() {
        let err = SimConfig::from_json(r#"{"roster": {"members": ["A", "B"], "min_pool_size": 1}}"#)
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownPoolSize { .. }));
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn level_sentinel_maps_to_zero_copies() {
        assert_eq!(copies_from_level(-1), 0);
        assert_eq!(copies_from_level(0), 1);
        assert_eq!(copies_from_level(6), 7);
    }

    #[test]
    fn seed_copies_follow_roster_order() {
        let roster = Roster::default();
        let mut params = FutureParams::new(40.0, 5.0);
        params.starting_copies.insert("Jean".to_string(), 6);
        params.starting_copies.insert("diluc".to_string(), -1);
        params.starting_copies.insert("Mizuki".to_string(), 0);
        let copies = params.seed_copies(&roster, 12).unwrap();
        assert_eq!(copies.len(), 12);
        assert_eq!(&copies[..8], &[0, 7, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn same_member_in_two_spellings_is_rejected() {
        let roster = Roster::default();
        let mut params = FutureParams::new(40.0, 5.0);
        params.starting_copies.insert("Jean".to_string(), 6);
        params.starting_copies.insert("jean".to_string(), 0);
        assert!(matches!(
            params.validate(&roster),
            Err(SimError::DuplicateMember(_))
        ));
        assert!(matches!(
            params.seed_copies(&roster, 8),
            Err(SimError::DuplicateMember(_))
        ));
    }

    #[test]
    fn historical_params_must_cover_every_phase() {
        let timeline = HistoricalTimeline::default();
        let mut params = HistoricalParams::uniform(5, 40.0, 5.0);
        params.validate(&timeline).unwrap();
        params.standard_pulls_per_patch.pop();
        assert!(matches!(
            params.validate(&timeline),
            Err(SimError::PhaseRateMismatch {
                phases: 5,
                limited: 5,
                standard: 4
            })
        ));
        params.trials = 0;
        assert!(matches!(params.validate(&timeline), Err(SimError::NoTrials)));
    }

    #[test]
    fn unknown_starting_member_is_rejected() {
        let mut params = FutureParams::new(40.0, 5.0);
        params.starting_copies.insert("Nobody".to_string(), 2);
        assert!(matches!(
            params.validate(&Roster::default()),
            Err(SimError::UnknownMember(_))
        ));
    }
}
