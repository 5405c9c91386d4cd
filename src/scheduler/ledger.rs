//! Day ledger ("sos days").
//!
//! Holds the growing schedule and enforces every placement-time rule:
//!
//! 1. A member may not serve on or after their end date (minus grace).
//! 2. A member may not serve twice on the same day.
//! 3. Family cooldown: no two members of one family within
//!    `holy_period_length` SOS days of each other.
//! 4. Sponsor pairing: a sponsor is always placed together with one of the
//!    members they sponsor, on an empty day. The pair is exempt from rule 3
//!    but governed by `sponsor_holy_period_length` instead.
//!
//! # Day lifecycle
//! Members are appended to an open day. The day gets the next calendar
//! date when its first member is placed and moves into the committed list
//! as soon as it reaches [`DAY_CAPACITY`]. Only full days are ever visible
//! through the ledger's views; a partial open day is dropped with it.

use std::collections::HashMap;
use std::ops::Index;

use chrono::{Days, NaiveDate};

use super::GeneratorConfig;
use crate::models::{Calendar, Day, FamilyId, Member, MemberId, DAY_CAPACITY};

/// Sponsor → eligible counterpart lookup, built once per ledger.
///
/// A counterpart of sponsor S is any other member whose `family` equals
/// S's `sponsor_for_family` and whose `sponsored_by_family`, when set,
/// equals S's family.
#[derive(Debug, Clone, Default)]
pub struct Pairings {
    counterparts: HashMap<MemberId, Vec<MemberId>>,
}

impl Pairings {
    /// Builds the table from a roster.
    pub fn build(members: &[Member]) -> Self {
        let mut by_family: HashMap<FamilyId, Vec<MemberId>> = HashMap::new();
        for (idx, m) in members.iter().enumerate() {
            by_family.entry(m.family).or_default().push(MemberId::new(idx));
        }

        let mut counterparts = HashMap::new();
        for (idx, sponsor) in members.iter().enumerate() {
            let Some(target) = sponsor.sponsor_for_family else {
                continue;
            };
            let ids: Vec<MemberId> = by_family
                .get(&target)
                .into_iter()
                .flatten()
                .copied()
                .filter(|id| id.index() != idx)
                .filter(|id| {
                    members[id.index()]
                        .sponsored_by_family
                        .map_or(true, |f| f == sponsor.family)
                })
                .collect();
            counterparts.insert(MemberId::new(idx), ids);
        }

        Self { counterparts }
    }

    /// Counterparts of `sponsor`, in roster order. Empty for non-sponsors.
    pub fn counterparts(&self, sponsor: MemberId) -> &[MemberId] {
        self.counterparts
            .get(&sponsor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Ordered sequence of SOS days under construction.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use sos_schedule::models::{Member, MemberId, WorkDayCalendar};
/// use sos_schedule::scheduler::{GeneratorConfig, SosDays};
///
/// let roster = vec![
///     Member::new("A", "").with_family(1),
///     Member::new("B", "").with_family(2),
/// ];
/// let calendar = WorkDayCalendar::new();
/// let start = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
/// let mut ledger = SosDays::new(&roster, &calendar, start, GeneratorConfig::default());
///
/// assert!(ledger.append_member(MemberId::new(0)));
/// assert!(ledger.append_member(MemberId::new(1)));
/// assert_eq!(ledger.len(), 1);
/// assert_eq!(ledger[0].date, NaiveDate::from_ymd_opt(2017, 1, 3).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SosDays<'r> {
    roster: &'r [Member],
    calendar: &'r dyn Calendar,
    start_after: NaiveDate,
    config: GeneratorConfig,
    pairings: Pairings,
    days: Vec<Day>,
    open: Option<Day>,
}

impl<'r> SosDays<'r> {
    /// Creates an empty ledger whose first day is the first calendar date
    /// after `start_after`.
    pub fn new(
        roster: &'r [Member],
        calendar: &'r dyn Calendar,
        start_after: NaiveDate,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            roster,
            calendar,
            start_after,
            config,
            pairings: Pairings::build(roster),
            days: Vec::new(),
            open: None,
        }
    }

    /// Number of full days.
    #[inline]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day has been completed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Full day at `index`.
    pub fn get(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    /// Full days in chronological order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Iterates over full days.
    pub fn iter(&self) -> std::slice::Iter<'_, Day> {
        self.days.iter()
    }

    /// The partially filled day, if any.
    pub fn open_day(&self) -> Option<&Day> {
        self.open.as_ref()
    }

    /// All members of all full days, in day order then placement order.
    pub fn members(&self) -> Vec<MemberId> {
        self.days
            .iter()
            .flat_map(|d| d.members.iter().copied())
            .collect()
    }

    /// Number of full days `member` serves on.
    pub fn duty_count(&self, member: MemberId) -> usize {
        self.days.iter().filter(|d| d.contains(member)).count()
    }

    /// Roster entry for `member`.
    pub fn member(&self, member: MemberId) -> Option<&'r Member> {
        self.roster.get(member.index())
    }

    /// Placement rules in force.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Members `sponsor` may be paired with.
    pub fn counterparts(&self, sponsor: MemberId) -> &[MemberId] {
        self.pairings.counterparts(sponsor)
    }

    /// Consumes the ledger, returning the full days.
    pub fn into_days(self) -> Vec<Day> {
        self.days
    }

    /// Places `member` on the open day.
    ///
    /// Sponsors are placed together with their first placeable counterpart
    /// (see [`append_pair`](Self::append_pair)). Returns `false`, leaving the
    /// ledger untouched, when any placement rule rejects the member or the
    /// calendar has no more dates.
    pub fn append_member(&mut self, member: MemberId) -> bool {
        let Some(m) = self.member(member) else {
            return false;
        };
        if m.is_sponsor() {
            return self.append_sponsor(member);
        }
        let Some(date) = self.target_date() else {
            return false;
        };

        if self.ends_before(m, date)
            || self.is_on_open_day(member)
            || self.family_blocked(m.family, self.days.len())
        {
            return false;
        }

        self.place(date, &[member]);
        true
    }

    /// Places `sponsor` and `sponsored` together on the open day.
    ///
    /// Requires an empty day, a valid pairing, neither member past their end
    /// date, and the sponsor's cooldown elapsed. The family cooldown is not
    /// applied to either member.
    pub fn append_pair(&mut self, sponsor: MemberId, sponsored: MemberId) -> bool {
        let (Some(s), Some(d)) = (self.member(sponsor), self.member(sponsored)) else {
            return false;
        };
        if !self.pairings.counterparts(sponsor).contains(&sponsored) {
            return false;
        }
        let Some(date) = self.target_date() else {
            return false;
        };

        let free = self.open.as_ref().map_or(DAY_CAPACITY, Day::free_places);
        if free < 2
            || self.is_on_open_day(sponsor)
            || self.is_on_open_day(sponsored)
            || self.ends_before(s, date)
            || self.ends_before(d, date)
            || self.sponsor_blocked(sponsor, self.days.len())
        {
            return false;
        }

        self.place(date, &[sponsor, sponsored]);
        true
    }

    /// Whether a member of `member`'s family sits within the family
    /// cooldown of the open day.
    pub fn is_family_in_holy_period(&self, member: MemberId) -> bool {
        self.member(member)
            .is_some_and(|m| self.family_blocked(m.family, self.days.len()))
    }

    /// Whether `sponsor` served too recently to serve on the open day.
    pub fn is_sponsor_in_holy_period(&self, sponsor: MemberId) -> bool {
        self.sponsor_blocked(sponsor, self.days.len())
    }

    /// Whether `member` is no longer schedulable on `date`.
    pub fn is_in_end_grace(&self, member: MemberId, date: NaiveDate) -> bool {
        self.member(member).is_some_and(|m| self.ends_before(m, date))
    }

    fn append_sponsor(&mut self, sponsor: MemberId) -> bool {
        let candidates = self.pairings.counterparts(sponsor).to_vec();
        candidates
            .into_iter()
            .any(|sponsored| self.append_pair(sponsor, sponsored))
    }

    /// Date of the day the next placement lands on.
    fn target_date(&self) -> Option<NaiveDate> {
        match &self.open {
            Some(day) => Some(day.date),
            None => {
                let last = self.days.last().map_or(self.start_after, |d| d.date);
                self.calendar.next_date_after(last)
            }
        }
    }

    /// Committed days followed by the open day, with their ledger positions.
    fn placed(&self) -> impl DoubleEndedIterator<Item = (usize, &Day)> + '_ {
        let open_index = self.days.len();
        self.days
            .iter()
            .enumerate()
            .chain(self.open.iter().map(move |d| (open_index, d)))
    }

    fn is_on_open_day(&self, member: MemberId) -> bool {
        self.open.as_ref().is_some_and(|d| d.contains(member))
    }

    fn family_blocked(&self, family: FamilyId, index: usize) -> bool {
        let window = self.config.holy_period_length;
        self.placed()
            .rev()
            .take_while(|&(i, _)| index - i < window)
            .any(|(_, day)| {
                day.members
                    .iter()
                    .any(|&m| self.member(m).is_some_and(|m| m.family == family))
            })
    }

    fn sponsor_blocked(&self, sponsor: MemberId, index: usize) -> bool {
        let rest = self.config.sponsor_holy_period_length;
        self.placed()
            .rev()
            .take_while(|&(i, _)| index - i <= rest)
            .any(|(_, day)| day.contains(sponsor))
    }

    fn ends_before(&self, member: &Member, date: NaiveDate) -> bool {
        member.end_date.is_some_and(|end| {
            let grace = Days::new(u64::from(self.config.end_grace_period_days));
            date >= end.checked_sub_days(grace).unwrap_or(NaiveDate::MIN)
        })
    }

    fn place(&mut self, date: NaiveDate, members: &[MemberId]) {
        let day = self.open.get_or_insert_with(|| Day::new(date));
        day.members.extend_from_slice(members);
        if day.is_full() {
            if let Some(full) = self.open.take() {
                self.days.push(full);
            }
        }
    }
}

impl Index<usize> for SosDays<'_> {
    type Output = Day;

    fn index(&self, index: usize) -> &Day {
        &self.days[index]
    }
}

impl<'a> IntoIterator for &'a SosDays<'_> {
    type Item = &'a Day;
    type IntoIter = std::slice::Iter<'a, Day>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkDayCalendar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn start() -> NaiveDate {
        date(2017, 1, 2)
    }

    fn id(index: usize) -> MemberId {
        MemberId::new(index)
    }

    fn family_member(family: u32) -> Member {
        Member::default().with_proportion(50).with_family(family)
    }

    fn sponsor() -> Member {
        Member::new("sponsor", "").with_family(100).sponsoring(200)
    }

    fn sponsored() -> Member {
        Member::new("sponsored", "").with_family(200)
    }

    fn relaxed() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_holy_period_length(0)
            .with_sponsor_holy_period_length(0)
    }

    #[test]
    fn test_day_opens_and_commits() {
        let roster: Vec<Member> = (1..=3).map(family_member).collect();
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(0)));
        assert!(ledger.is_empty());
        assert_eq!(ledger.open_day().map(|d| d.members.len()), Some(1));

        assert!(ledger.append_member(id(1)));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.open_day().is_none());

        assert!(ledger.append_member(id(2)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.members(), vec![id(0), id(1)]);
        assert_eq!(ledger.open_day().map(|d| d.date), Some(date(2017, 1, 4)));
    }

    #[test]
    fn test_same_family_same_day_rejected() {
        let roster = vec![family_member(1), family_member(1)];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), GeneratorConfig::default());

        assert!(ledger.append_member(id(0)));
        assert!(ledger.is_family_in_holy_period(id(1)));
        assert!(!ledger.append_member(id(1)));
    }

    #[test]
    fn test_zero_holy_period_allows_same_family() {
        let roster = vec![family_member(1), family_member(1)];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(0)));
        assert!(!ledger.is_family_in_holy_period(id(1)));
        assert!(ledger.append_member(id(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_member_not_placed_twice_on_one_day() {
        let roster = vec![family_member(1)];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(0)));
        assert!(!ledger.append_member(id(0)));
    }

    #[test]
    fn test_family_not_allowed_in_holy_period() {
        // a, x | y, z | b, w | v, u | c
        let roster = vec![
            family_member(1), // a
            family_member(2), // x
            family_member(3), // y
            family_member(4), // z
            family_member(1), // b
            family_member(5), // w
            family_member(1), // c
            family_member(6), // v
            family_member(7), // u
        ];
        let cal = WorkDayCalendar::new();
        let config = relaxed().with_holy_period_length(2);
        let mut ledger = SosDays::new(&roster, &cal, start(), config);

        for i in 0..4 {
            assert!(ledger.append_member(id(i)));
        }
        // Two days after a: allowed again
        assert!(!ledger.is_family_in_holy_period(id(4)));
        assert!(ledger.append_member(id(4)));
        assert!(ledger.append_member(id(5)));

        // One day after b: blocked
        assert!(ledger.is_family_in_holy_period(id(6)));
        assert!(!ledger.append_member(id(6)));
        assert!(ledger.append_member(id(7)));
        assert!(ledger.append_member(id(8)));

        assert!(ledger.append_member(id(6)));
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_member_not_allowed_in_end_grace_period() {
        let roster = vec![
            family_member(1),
            family_member(2),
            family_member(3).with_end_date(date(2017, 1, 3)),
        ];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(0)));
        assert!(ledger.append_member(id(1)));
        assert!(!ledger.append_member(id(2)));
        assert!(!ledger.members().contains(&id(2)));
        assert!(ledger.open_day().is_none());
        assert!(ledger.is_in_end_grace(id(2), date(2017, 1, 3)));
        assert!(!ledger.is_in_end_grace(id(2), date(2017, 1, 2)));
    }

    #[test]
    fn test_end_grace_period_days() {
        let roster = vec![family_member(1).with_end_date(date(2017, 1, 10))];
        let cal = WorkDayCalendar::new();
        let config = relaxed().with_end_grace_period_days(3);
        let ledger = SosDays::new(&roster, &cal, start(), config);

        assert!(!ledger.is_in_end_grace(id(0), date(2017, 1, 6)));
        assert!(ledger.is_in_end_grace(id(0), date(2017, 1, 7)));
        assert!(ledger.is_in_end_grace(id(0), date(2017, 1, 12)));
    }

    #[test]
    fn test_sponsor_brings_counterpart() {
        let roster = vec![sponsor(), sponsored()];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), GeneratorConfig::default());

        assert!(ledger.append_member(id(0)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].members, vec![id(0), id(1)]);
    }

    #[test]
    fn test_sponsor_needs_empty_day() {
        let roster = vec![sponsor(), sponsored(), family_member(1)];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(2)));
        assert!(!ledger.append_member(id(0)));
        assert!(!ledger.append_pair(id(0), id(1)));
        assert_eq!(ledger.open_day().map(|d| d.members.clone()), Some(vec![id(2)]));
    }

    #[test]
    fn test_sponsor_cooldown() {
        let mut roster = vec![sponsor(), sponsored()];
        roster.extend((1..=6).map(family_member));
        let cal = WorkDayCalendar::new();
        let config = relaxed().with_sponsor_holy_period_length(2);
        let mut ledger = SosDays::new(&roster, &cal, start(), config);

        assert!(ledger.append_member(id(0)));
        for pair in [(2, 3), (4, 5)] {
            assert!(ledger.is_sponsor_in_holy_period(id(0)));
            assert!(!ledger.append_member(id(0)));
            assert!(ledger.append_member(id(pair.0)));
            assert!(ledger.append_member(id(pair.1)));
        }
        assert!(!ledger.is_sponsor_in_holy_period(id(0)));
        assert!(ledger.append_pair(id(0), id(1)));
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.duty_count(id(0)), 2);
        assert_eq!(ledger.duty_count(id(1)), 2);
    }

    #[test]
    fn test_forced_pair_ignores_family_cooldown() {
        let roster = vec![sponsor(), sponsored(), family_member(1)];
        let cal = WorkDayCalendar::new();
        let config = relaxed().with_holy_period_length(5);
        let mut ledger = SosDays::new(&roster, &cal, start(), config);

        assert!(ledger.append_member(id(1)));
        assert!(ledger.append_member(id(2)));
        assert!(ledger.is_family_in_holy_period(id(1)));

        assert!(ledger.append_member(id(0)));
        assert_eq!(ledger[1].members, vec![id(0), id(1)]);
        assert!(!ledger.append_member(id(1)));
    }

    #[test]
    fn test_counterparts_respect_sponsored_by() {
        let roster = vec![
            Member::default().with_family(100).sponsoring(200),
            Member::default().with_family(300).sponsoring(200),
            Member::default().with_family(200).sponsored_by(100),
            Member::default().with_family(200),
            Member::default().with_family(200).sponsored_by(300),
        ];
        let pairings = Pairings::build(&roster);

        assert_eq!(pairings.counterparts(id(0)), &[id(2), id(3)]);
        assert_eq!(pairings.counterparts(id(1)), &[id(3), id(4)]);
        assert!(pairings.counterparts(id(2)).is_empty());
    }

    #[test]
    fn test_invalid_pair_rejected() {
        let roster = vec![sponsor(), sponsored(), family_member(1)];
        let cal = WorkDayCalendar::new();
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(!ledger.append_pair(id(0), id(2)));
        assert!(!ledger.append_pair(id(1), id(0)));
        assert!(!ledger.append_member(id(9)));
        assert!(ledger.open_day().is_none());
    }

    #[test]
    fn test_calendar_exhausted() {
        let roster: Vec<Member> = (1..=3).map(family_member).collect();
        let cal = WorkDayCalendar::new().until(date(2017, 1, 3));
        let mut ledger = SosDays::new(&roster, &cal, start(), relaxed());

        assert!(ledger.append_member(id(0)));
        assert!(ledger.append_member(id(1)));
        assert!(!ledger.append_member(id(2)));
        assert_eq!(ledger.len(), 1);
    }
}
