//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Placement rules applied while filling the ledger.
///
/// Cooldowns are counted in SOS days (ledger positions), not calendar days.
/// Loaded from JSON/TOML by the caller; missing fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Window, including the placement day itself, in which a second member
    /// of the same family may not be placed. 0 disables the rule.
    pub holy_period_length: usize,

    /// SOS days a sponsor must rest after an appearance before serving again.
    pub sponsor_holy_period_length: usize,

    /// Days before `end_date` from which a leaving member is no longer scheduled.
    pub end_grace_period_days: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            holy_period_length: 10,
            sponsor_holy_period_length: 20,
            end_grace_period_days: 0,
        }
    }
}

impl GeneratorConfig {
    /// Sets the family cooldown.
    pub fn with_holy_period_length(mut self, days: usize) -> Self {
        self.holy_period_length = days;
        self
    }

    /// Sets the sponsor cooldown.
    pub fn with_sponsor_holy_period_length(mut self, days: usize) -> Self {
        self.sponsor_holy_period_length = days;
        self
    }

    /// Sets the end grace period.
    pub fn with_end_grace_period_days(mut self, days: u32) -> Self {
        self.end_grace_period_days = days;
        self
    }
}
