//! Input validation for rosters.
//!
//! The generator trusts its input. These checks catch rosters that can
//! only ever deadlock or that rely on off-grid proportions:
//! - Proportions above 100 or not a multiple of 50
//! - Sponsors sponsoring their own family
//! - Sponsors with no member they could be paired with
//! - Members claiming a sponsor family that sponsors nobody in theirs

use std::collections::{HashMap, HashSet};

use crate::models::{FamilyId, Member, PROPORTION_PER_DUTY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Proportion is above a full-time load.
    ProportionOutOfRange,
    /// Proportion is not a multiple of 50 and will be rounded.
    UnevenProportion,
    /// A sponsor sponsors their own family.
    SelfSponsorship,
    /// No member can be paired with this sponsor.
    MissingSponsored,
    /// No sponsor from the named family sponsors this member's family.
    MissingSponsor,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster before generation.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(members: &[Member]) -> ValidationResult {
    let mut errors = Vec::new();

    for m in members {
        if m.proportion > 100 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ProportionOutOfRange,
                format!("Member '{}' has proportion {} (max 100)", m.name(), m.proportion),
            ));
        } else if m.proportion % PROPORTION_PER_DUTY != 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnevenProportion,
                format!(
                    "Member '{}' has proportion {}, rounded to {} duty days",
                    m.name(),
                    m.proportion,
                    m.quota()
                ),
            ));
        }
    }

    // Sponsored family → families of its sponsors
    let mut sponsors_of: HashMap<FamilyId, HashSet<FamilyId>> = HashMap::new();
    for m in members {
        if let Some(target) = m.sponsor_for_family {
            sponsors_of.entry(target).or_default().insert(m.family);
        }
    }

    for (idx, sponsor) in members.iter().enumerate() {
        let Some(target) = sponsor.sponsor_for_family else {
            continue;
        };
        if target == sponsor.family {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfSponsorship,
                format!("Sponsor '{}' sponsors own family {}", sponsor.name(), target),
            ));
            continue;
        }
        let has_counterpart = members.iter().enumerate().any(|(other, m)| {
            other != idx
                && m.family == target
                && m.sponsored_by_family.map_or(true, |f| f == sponsor.family)
        });
        if !has_counterpart {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSponsored,
                format!(
                    "Sponsor '{}' has no member of family {} to pair with",
                    sponsor.name(),
                    target
                ),
            ));
        }
    }

    for m in members {
        let Some(by) = m.sponsored_by_family else {
            continue;
        };
        let sponsored = sponsors_of
            .get(&m.family)
            .is_some_and(|families| families.contains(&by));
        if !sponsored {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSponsor,
                format!(
                    "Member '{}' is sponsored by family {} but no sponsor there covers family {}",
                    m.name(),
                    by,
                    m.family
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
