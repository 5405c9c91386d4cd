//! SOS day model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MemberId;

/// Members on duty per day.
pub const DAY_CAPACITY: usize = 2;

/// One scheduled duty day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Calendar date.
    pub date: NaiveDate,
    /// Assigned members, in placement order.
    pub members: Vec<MemberId>,
}

impl Day {
    /// Creates an empty day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            members: Vec::with_capacity(DAY_CAPACITY),
        }
    }

    /// Whether the day holds [`DAY_CAPACITY`] members.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.members.len() >= DAY_CAPACITY
    }

    /// Remaining free places.
    #[inline]
    pub fn free_places(&self) -> usize {
        DAY_CAPACITY.saturating_sub(self.members.len())
    }

    /// Whether `member` is assigned to this day.
    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }
}
