//! Roster member model.
//!
//! A member is one participant in the duty rotation. Their workload share
//! is expressed as a percentage of a full-time duty load, converted into a
//! number of duty days by [`Member::quota`].
//!
//! # Identity
//! Members carry no generated identifier. Within a generation run they are
//! addressed by [`MemberId`], their position in the roster slice.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Proportion that corresponds to one duty day.
pub const PROPORTION_PER_DUTY: u32 = 50;

/// Position of a member in the roster handed to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(usize);

impl MemberId {
    /// Creates an id for the member at `index` in the roster.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Roster index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Family (household) identifier.
///
/// Sponsors reference the family they sponsor by this id as well.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FamilyId(pub u32);

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

impl From<u32> for FamilyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A roster participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Share of a full-time duty load, in percent (0, 50 or 100).
    pub proportion: u32,
    /// Family this member belongs to.
    pub family: FamilyId,
    /// Family this member sponsors. `Some` marks the member as a sponsor.
    pub sponsor_for_family: Option<FamilyId>,
    /// Last day of membership. Not scheduled on or after this date.
    pub end_date: Option<NaiveDate>,
    /// Family of the sponsor this member is paired with.
    pub sponsored_by_family: Option<FamilyId>,
}

impl Default for Member {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            proportion: 100,
            family: FamilyId::default(),
            sponsor_for_family: None,
            end_date: None,
            sponsored_by_family: None,
        }
    }
}

impl Member {
    /// Creates a full-time member of family 0.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    /// Sets the duty proportion.
    pub fn with_proportion(mut self, proportion: u32) -> Self {
        self.proportion = proportion;
        self
    }

    /// Sets the family.
    pub fn with_family(mut self, family: impl Into<FamilyId>) -> Self {
        self.family = family.into();
        self
    }

    /// Makes this member a sponsor of `family`.
    pub fn sponsoring(mut self, family: impl Into<FamilyId>) -> Self {
        self.sponsor_for_family = Some(family.into());
        self
    }

    /// Marks this member as sponsored by a sponsor from `family`.
    pub fn sponsored_by(mut self, family: impl Into<FamilyId>) -> Self {
        self.sponsored_by_family = Some(family.into());
        self
    }

    /// Sets the membership end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Display name ("first last").
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this member sponsors another family.
    #[inline]
    pub fn is_sponsor(&self) -> bool {
        self.sponsor_for_family.is_some()
    }

    /// Number of duty days owed: `proportion / 50`, rounded half to even.
    ///
    /// 0 → 0, 50 → 1, 100 → 2; off-grid values follow the same rounding
    /// (25 → 0, 75 → 2, 125 → 2).
    pub fn quota(&self) -> usize {
        (f64::from(self.proportion) / f64::from(PROPORTION_PER_DUTY)).round_ties_even() as usize
    }
}
