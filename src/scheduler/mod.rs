//! SOS schedule generation.
//!
//! Turns a roster into a sequence of two-member duty days.
//!
//! # Algorithm
//!
//! [`Generator`] draws members from a shuffled [`Pot`] and places them into
//! a [`SosDays`] ledger, which enforces end dates, family cooldowns and
//! sponsor pairing. An attempt that gets stuck is discarded and restarted
//! with a new shuffle, up to [`MAX_ATTEMPTS`] times.
//!
//! # Configuration
//!
//! [`GeneratorConfig`] holds the cooldown lengths and the end grace period.

mod config;
mod generator;
mod ledger;
mod pot;

pub use config::GeneratorConfig;
pub use generator::{GenerationError, Generator, MAX_ATTEMPTS};
pub use ledger::{Pairings, SosDays};
pub use pot::Pot;
