//! Canonical standard roster. The pool for size `k` is the first `k` members.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DEFAULT_MIN_POOL_SIZE;
use crate::error::SimError;

/// Position of a member in the canonical roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub usize);

impl MemberId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default = "Roster::default_members")]
    pub members: Vec<String>,
    #[serde(default = "Roster::default_min_pool_size")]
    pub min_pool_size: usize,
}

impl Roster {
    fn default_members() -> Vec<String> {
        [
            "Diluc",
            "Jean",
            "Mona",
            "Qiqi",
            "Keqing",
            "Tighnari",
            "Dehya",
            "Mizuki",
            "FutureChar1",
            "FutureChar2",
            "FutureChar3",
            "FutureChar4",
            "FutureChar5",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    const fn default_min_pool_size() -> usize {
        DEFAULT_MIN_POOL_SIZE
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Validate the roster shape itself.
    ///
    /// # Errors
    ///
    /// Returns `SimError::EmptyRoster` or `SimError::InvalidMinPoolSize`.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.members.is_empty() {
            return Err(SimError::EmptyRoster);
        }
        if self.min_pool_size == 0 || self.min_pool_size > self.members.len() {
            return Err(SimError::InvalidMinPoolSize {
                min: self.min_pool_size,
                len: self.members.len(),
            });
        }
        Ok(())
    }

    /// Confirm a pool size has a roster definition.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownPoolSize` when `size` is outside the valid range.
    pub fn check_pool_size(&self, size: usize) -> Result<usize, SimError> {
        if (self.min_pool_size..=self.members.len()).contains(&size) {
            Ok(size)
        } else {
            Err(SimError::UnknownPoolSize {
                requested: size,
                min: self.min_pool_size,
                max: self.members.len(),
            })
        }
    }

    /// Member names valid at the given pool size.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownPoolSize` when `size` is outside the valid range.
    pub fn pool(&self, size: usize) -> Result<&[String], SimError> {
        let size = self.check_pool_size(size)?;
        Ok(&self.members[..size])
    }

    #[must_use]
    pub fn name(&self, id: MemberId) -> Option<&str> {
        self.members.get(id.index()).map(String::as_str)
    }

    /// Resolve a member name (case-insensitive) to its roster position.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownMember` when no member matches.
    pub fn find(&self, name: &str) -> Result<MemberId, SimError> {
        let wanted = name.trim();
        self.members
            .iter()
            .position(|member| member.eq_ignore_ascii_case(wanted))
            .map(MemberId)
            .ok_or_else(|| SimError::UnknownMember(wanted.to_string()))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            members: Self::default_members(),
            min_pool_size: Self::default_min_pool_size(),
        }
    }
}

/// Member ids of the pool at `size`, in roster order.
pub fn pool_ids(size: usize) -> impl Iterator<Item = MemberId> {
    (0..size).map(MemberId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_are_nested_prefixes() {
        let roster = Roster::default();
        let five = roster.pool(5).unwrap();
        let six = roster.pool(6).unwrap();
        assert_eq!(five, &six[..5]);
        assert_eq!(six.last().map(String::as_str), Some("Tighnari"));
        assert_eq!(roster.pool(13).unwrap().len(), 13);
    }

    #[test]
    fn pool_sizes_outside_range_are_rejected() {
        let roster = Roster::default();
        assert!(matches!(
            roster.pool(4),
            Err(SimError::UnknownPoolSize {
                requested: 4,
                min: 5,
                max: 13
            })
        ));
        assert!(roster.check_pool_size(14).is_err());
    }

    #[test]
    fn find_is_case_insensitive() {
        let roster = Roster::default();
        assert_eq!(roster.find("keqing").unwrap(), MemberId(4));
        assert!(matches!(roster.find("Nobody"), Err(SimError::UnknownMember(_))));
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let empty = Roster {
            members: Vec::new(),
            min_pool_size: 1,
        };
        assert!(matches!(empty.validate(), Err(SimError::EmptyRoster)));
        let oversized = Roster {
            members: vec!["A".to_string()],
            min_pool_size: 2,
        };
        assert!(matches!(
            oversized.validate(),
            Err(SimError::InvalidMinPoolSize { min: 2, len: 1 })
        ));
    }
}
