//! Slot pool ("pot").
//!
//! The pot is the multiset of pending duty obligations. Each member
//! contributes [`Member::quota`] entries; entries are shuffled once per
//! attempt and removed one at a time as members are placed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Member, MemberId};

/// Shuffled multiset of pending duty obligations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pot {
    entries: Vec<MemberId>,
}

impl Pot {
    /// Builds the pot in roster order: `quota()` entries per member.
    pub fn build(members: &[Member]) -> Self {
        let entries = members
            .iter()
            .enumerate()
            .flat_map(|(idx, m)| std::iter::repeat(MemberId::new(idx)).take(m.quota()))
            .collect();
        Self { entries }
    }

    /// Uniformly shuffles the entries.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }

    /// Number of pending entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether every obligation has been placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending entries in draw order.
    pub fn entries(&self) -> &[MemberId] {
        &self.entries
    }

    /// Pending entries for `member`.
    pub fn count(&self, member: MemberId) -> usize {
        self.entries.iter().filter(|&&m| m == member).count()
    }

    /// Removes the entry at `position`.
    ///
    /// # Panics
    /// Panics if `position` is out of bounds.
    pub fn remove_at(&mut self, position: usize) -> MemberId {
        self.entries.remove(position)
    }

    /// Removes one entry for `member`. Returns `false` if none was pending.
    pub fn take(&mut self, member: MemberId) -> bool {
        match self.entries.iter().position(|&m| m == member) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }
}
