//! Duty roster ("SOS day") generation.
//!
//! Assigns members of an organization to recurring two-person duty days,
//! honoring workload proportions, family cooldowns, sponsor pairing and
//! membership end dates. Schedules are randomized; infeasible shuffles are
//! retried a bounded number of times.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Member`, `MemberId`, `FamilyId`, `Day`,
//!   and the `Calendar` date providers
//! - **`scheduler`**: The pot, the day ledger and the `Generator`
//! - **`validation`**: Optional roster integrity checks
//!
//! # Architecture
//!
//! The crate is a pure in-memory computation. Where eligible dates come from
//! (holiday services, closed-day lists) is abstracted behind `Calendar`;
//! storing or presenting the result is left to the caller.

pub mod models;
pub mod scheduler;
pub mod validation;
