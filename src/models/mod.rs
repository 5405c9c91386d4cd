//! Roster domain models.
//!
//! Provides the value types the generator works with: who is on the
//! roster, which dates are available, and what a scheduled day looks like.
//!
//! # Domain Mappings
//!
//! | sos-schedule | Meaning |
//! |--------------|---------|
//! | Member | Roster participant with a workload share |
//! | FamilyId | Household; members share cooldowns |
//! | Day | One duty date with two assigned members |
//! | Calendar | Source of eligible duty dates |

mod calendar;
mod day;
mod member;

pub use calendar::{Calendar, DateListCalendar, WorkDayCalendar};
pub use day::{Day, DAY_CAPACITY};
pub use member::{FamilyId, Member, MemberId, PROPORTION_PER_DUTY};
