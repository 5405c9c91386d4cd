//! Randomized SOS schedule generator.
//!
//! # Algorithm
//!
//! 1. Build the pot from member proportions and shuffle it.
//! 2. Fill days in calendar order. At the start of each day, pending
//!    sponsors whose cooldown has elapsed are tried first, each together
//!    with a counterpart. Otherwise the first pot entry accepted by the
//!    ledger is placed.
//! 3. If no pending entry fits the open day, the attempt deadlocks and the
//!    whole attempt is restarted with a fresh shuffle.
//! 4. After [`MAX_ATTEMPTS`] deadlocks, generation fails.
//!
//! Restarting instead of backtracking keeps every attempt independent; the
//! retry counter is the only state carried between attempts.

use std::cmp::Reverse;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{GeneratorConfig, Pot, SosDays};
use crate::models::{Calendar, Member, MemberId};

/// Attempts made before giving up.
pub const MAX_ATTEMPTS: u32 = 1000;

/// Error returned when no schedule could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Every attempt deadlocked.
    #[error("not possible to generate sos days after {attempts} attempts")]
    NotPossible {
        /// Attempts made.
        attempts: u32,
    },
}

/// Result of a single fill attempt.
enum Attempt<'r> {
    Complete(SosDays<'r>),
    Deadlock { day: usize, remaining: usize },
}

/// Generates SOS schedules for a roster.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use sos_schedule::models::{Member, WorkDayCalendar};
/// use sos_schedule::scheduler::Generator;
///
/// let members: Vec<Member> = (0..6u32)
///     .map(|i| Member::new(format!("M{i}"), "").with_proportion(50).with_family(i))
///     .collect();
/// let start = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
///
/// let mut generator = Generator::new(members, WorkDayCalendar::new(), start).with_seed(1);
/// let sos_days = generator.generate().unwrap();
/// assert_eq!(sos_days.len(), 3);
/// assert!(sos_days.iter().all(|day| day.members.len() == 2));
/// ```
#[derive(Debug)]
pub struct Generator<C: Calendar> {
    members: Vec<Member>,
    calendar: C,
    start_after: NaiveDate,
    config: GeneratorConfig,
    rng: StdRng,
    pot: Pot,
    number_of_retries_done: u32,
}

impl<C: Calendar> Generator<C> {
    /// Creates a generator scheduling from the first calendar date after
    /// `start_after`, with default rules and an OS-seeded random source.
    pub fn new(members: Vec<Member>, calendar: C, start_after: NaiveDate) -> Self {
        Self {
            members,
            calendar,
            start_after,
            config: GeneratorConfig::default(),
            rng: StdRng::from_os_rng(),
            pot: Pot::default(),
            number_of_retries_done: 0,
        }
    }

    /// Sets the placement rules.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the random source for reproducible schedules.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The roster.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Roster entry for `id`.
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.index())
    }

    /// Placement rules in force.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Pot as left by the last attempt (or [`populate_pot`](Self::populate_pot)).
    pub fn pot(&self) -> &Pot {
        &self.pot
    }

    /// Rebuilds the pot from the roster, unshuffled.
    pub fn populate_pot(&mut self) {
        self.pot = Pot::build(&self.members);
    }

    /// Deadlocked attempts in the last [`generate`](Self::generate) call.
    pub fn number_of_retries_done(&self) -> u32 {
        self.number_of_retries_done
    }

    /// Generates a schedule.
    ///
    /// On success the pot is empty and every returned day holds two members.
    ///
    /// # Errors
    /// [`GenerationError::NotPossible`] once [`MAX_ATTEMPTS`] attempts have
    /// deadlocked; `number_of_retries_done()` then equals [`MAX_ATTEMPTS`].
    pub fn generate(&mut self) -> Result<SosDays<'_>, GenerationError> {
        self.number_of_retries_done = 0;

        while self.number_of_retries_done < MAX_ATTEMPTS {
            self.pot = Pot::build(&self.members);
            self.pot.shuffle(&mut self.rng);

            let ledger = SosDays::new(&self.members, &self.calendar, self.start_after, self.config);
            match fill(ledger, &mut self.pot) {
                Attempt::Complete(ledger) => {
                    info!(
                        attempts = self.number_of_retries_done + 1,
                        days = ledger.len(),
                        "sos days generated"
                    );
                    return Ok(ledger);
                }
                Attempt::Deadlock { day, remaining } => {
                    self.number_of_retries_done += 1;
                    debug!(
                        attempt = self.number_of_retries_done,
                        day, remaining, "deadlock while filling sos days, retrying"
                    );
                }
            }
        }

        warn!(attempts = self.number_of_retries_done, "giving up on sos generation");
        Err(GenerationError::NotPossible {
            attempts: self.number_of_retries_done,
        })
    }
}

/// Runs one attempt: drains the pot into `ledger` day by day.
fn fill<'r>(mut ledger: SosDays<'r>, pot: &mut Pot) -> Attempt<'r> {
    while !pot.is_empty() {
        if ledger.open_day().is_none() && place_sponsor(&mut ledger, pot) {
            continue;
        }
        if !place_next(&mut ledger, pot) {
            return Attempt::Deadlock {
                day: ledger.len(),
                remaining: pot.len(),
            };
        }
    }
    Attempt::Complete(ledger)
}

/// Places the first pending sponsor that fits the (empty) open day.
///
/// Counterparts with more pending obligations are preferred so that forced
/// placements eat into quotas evenly; ties keep roster order.
fn place_sponsor(ledger: &mut SosDays<'_>, pot: &mut Pot) -> bool {
    let mut tried: Vec<MemberId> = Vec::new();

    for position in 0..pot.len() {
        let sponsor = pot.entries()[position];
        if tried.contains(&sponsor) || !ledger.member(sponsor).is_some_and(Member::is_sponsor) {
            continue;
        }
        tried.push(sponsor);

        let mut candidates = ledger.counterparts(sponsor).to_vec();
        candidates.sort_by_key(|&c| Reverse(pot.count(c)));

        for sponsored in candidates {
            if ledger.append_pair(sponsor, sponsored) {
                pot.remove_at(position);
                // quota already spent: the pairing still stands
                pot.take(sponsored);
                return true;
            }
        }
    }

    false
}

/// Places the first pending non-sponsor the ledger accepts.
fn place_next(ledger: &mut SosDays<'_>, pot: &mut Pot) -> bool {
    for position in 0..pot.len() {
        let candidate = pot.entries()[position];
        if ledger.member(candidate).is_some_and(Member::is_sponsor) {
            continue;
        }
        if ledger.append_member(candidate) {
            pot.remove_at(position);
            return true;
        }
    }
    false
}
