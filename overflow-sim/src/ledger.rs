//! Per-trial prize ledger and once-ever bonus history.
//!
//! One `PrizeLedger` exists per trial. Both banner simulators and the bonus
//! allocator borrow it mutably in turn; nothing keeps per-track counts.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::OVERFLOW_CAP;
use crate::roster::MemberId;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrizeLedger {
    copies: Vec<u32>,
}

impl PrizeLedger {
    /// Ledger with every member at zero copies.
    #[must_use]
    pub fn with_members(count: usize) -> Self {
        Self {
            copies: vec![0; count],
        }
    }

    /// Ledger seeded with prior copy counts, padded with zeros to `count`.
    #[must_use]
    pub fn seeded(mut copies: Vec<u32>, count: usize) -> Self {
        if copies.len() < count {
            copies.resize(count, 0);
        }
        Self { copies }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Add one copy. Counts only ever increase; ids outside the ledger are ignored.
    pub fn grant(&mut self, member: MemberId) {
        if let Some(slot) = self.copies.get_mut(member.index()) {
            *slot = slot.saturating_add(1);
        }
    }

    #[must_use]
    pub fn copies(&self, member: MemberId) -> u32 {
        self.copies.get(member.index()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn overflow(&self, member: MemberId) -> u32 {
        overflow_of(self.copies(member))
    }

    #[must_use]
    pub fn total_overflow(&self) -> u32 {
        self.copies.iter().map(|&c| overflow_of(c)).sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.copies
    }
}

/// Copies beyond the useful cap.
#[must_use]
pub const fn overflow_of(copies: u32) -> u32 {
    copies.saturating_sub(OVERFLOW_CAP)
}

/// Members that already received the one-time bonus in this trial.
/// Membership is permanent; only the bonus allocator records into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusHistory {
    awarded: BTreeSet<MemberId>,
}

impl BonusHistory {
    #[must_use]
    pub fn contains(&self, member: MemberId) -> bool {
        self.awarded.contains(&member)
    }

    pub(crate) fn record(&mut self, member: MemberId) {
        self.awarded.insert(member);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.awarded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.awarded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_counts_only_copies_above_cap() {
        let ledger = PrizeLedger::seeded(vec![0, 7, 8, 12], 4);
        assert_eq!(ledger.overflow(MemberId(1)), 0);
        assert_eq!(ledger.overflow(MemberId(2)), 1);
        assert_eq!(ledger.overflow(MemberId(3)), 5);
        assert_eq!(ledger.total_overflow(), 6);
    }

    #[test]
    fn seeded_ledger_pads_missing_members() {
        let ledger = PrizeLedger::seeded(vec![3, 1], 5);
        assert_eq!(ledger.as_slice(), &[3, 1, 0, 0, 0]);
    }

    #[test]
    fn grant_ignores_unknown_members() {
        let mut ledger = PrizeLedger::with_members(2);
        ledger.grant(MemberId(1));
        ledger.grant(MemberId(9));
        assert_eq!(ledger.as_slice(), &[0, 1]);
    }

    #[test]
    fn history_is_monotonic() {
        let mut history = BonusHistory::default();
        history.record(MemberId(3));
        history.record(MemberId(3));
        assert!(history.contains(MemberId(3)));
        assert!(!history.contains(MemberId(0)));
        assert_eq!(history.len(), 1);
    }
}
