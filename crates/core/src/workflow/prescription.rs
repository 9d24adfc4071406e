//! Prescription lifecycle.
//!
//! ```text
//! DRAFT ──submit──▶ PENDING_REVIEW ──approve──▶ APPROVED ──dispense──▶ DISPENSED
//!   ▲                     │
//!   └──revise── REJECTED ◀┘ reject
//! ```
//!
//! REJECTED loops back to DRAFT for resubmission. There is no edge from DRAFT to REJECTED.

use super::{StatusKind, WorkflowStatus, CLINICIANS};
use crate::role::ParticipantRole;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PHARMACIST: &[ParticipantRole] = &[ParticipantRole::Pharmacist];

/// Status of a medication order produced within a consultation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Draft,
    /// Submitted for pharmacist review.
    PendingReview,
    Approved,
    /// Sent back to the prescriber; editable again once revised.
    Rejected,
    Dispensed,
}

impl PrescriptionStatus {
    pub const ALL: [PrescriptionStatus; 5] = [
        PrescriptionStatus::Draft,
        PrescriptionStatus::PendingReview,
        PrescriptionStatus::Approved,
        PrescriptionStatus::Rejected,
        PrescriptionStatus::Dispensed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PrescriptionStatus::Draft => "DRAFT",
            PrescriptionStatus::PendingReview => "PENDING_REVIEW",
            PrescriptionStatus::Approved => "APPROVED",
            PrescriptionStatus::Rejected => "REJECTED",
            PrescriptionStatus::Dispensed => "DISPENSED",
        }
    }

    /// Looks up a status by wire code. `None` means the code is not a prescription status.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

/// Statuses a prescription may move to from `current`.
pub fn allowed_next_statuses(current: PrescriptionStatus) -> &'static [PrescriptionStatus] {
    use PrescriptionStatus::*;

    match current {
        Draft => &[PendingReview],
        PendingReview => &[Approved, Rejected],
        Approved => &[Dispensed],
        Rejected => &[Draft],
        Dispensed => &[],
    }
}

pub fn can_transition(current: PrescriptionStatus, target: PrescriptionStatus) -> bool {
    allowed_next_statuses(current).contains(&target)
}

pub fn is_terminal(status: PrescriptionStatus) -> bool {
    allowed_next_statuses(status).is_empty()
}

/// Only drafts and rejected prescriptions may have their content edited. Every other status
/// is a snapshot awaiting a workflow action.
pub fn is_editable(status: PrescriptionStatus) -> bool {
    matches!(status, PrescriptionStatus::Draft | PrescriptionStatus::Rejected)
}

/// Roles allowed to trigger `current -> target`.
pub fn allowed_roles(
    current: PrescriptionStatus,
    target: PrescriptionStatus,
) -> &'static [ParticipantRole] {
    use PrescriptionStatus::*;

    match (current, target) {
        (Draft, PendingReview) | (Rejected, Draft) => CLINICIANS,
        (PendingReview, Approved) | (PendingReview, Rejected) => PHARMACIST,
        (Approved, Dispensed) => PHARMACIST,
        _ => &[],
    }
}

impl WorkflowStatus for PrescriptionStatus {
    const KIND: StatusKind = StatusKind::Prescription;
    const INITIAL: Self = PrescriptionStatus::Draft;

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn code(self) -> &'static str {
        PrescriptionStatus::code(self)
    }

    fn description(self) -> &'static str {
        match self {
            PrescriptionStatus::Draft => "draft",
            PrescriptionStatus::PendingReview => "pending pharmacist review",
            PrescriptionStatus::Approved => "approved",
            PrescriptionStatus::Rejected => "rejected",
            PrescriptionStatus::Dispensed => "dispensed",
        }
    }

    fn allowed_next(self) -> &'static [Self] {
        allowed_next_statuses(self)
    }

    fn allowed_roles(self, target: Self) -> &'static [ParticipantRole] {
        allowed_roles(self, target)
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownStatus {
            kind: StatusKind::Prescription,
            code: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrescriptionStatus::*;

    #[test]
    fn editable_only_in_draft_or_rejected() {
        for status in PrescriptionStatus::ALL {
            assert_eq!(is_editable(status), status == Draft || status == Rejected);
        }
    }

    #[test]
    fn no_self_transitions() {
        for status in PrescriptionStatus::ALL {
            assert!(!can_transition(status, status));
        }
    }

    #[test]
    fn dispensed_is_the_only_terminal_state() {
        for status in PrescriptionStatus::ALL {
            assert_eq!(is_terminal(status), status == Dispensed);
        }
        for target in PrescriptionStatus::ALL {
            assert!(!can_transition(Dispensed, target));
        }
    }

    #[test]
    fn transition_table() {
        assert!(can_transition(Draft, PendingReview));
        assert!(can_transition(PendingReview, Approved));
        assert!(can_transition(PendingReview, Rejected));
        assert!(can_transition(Approved, Dispensed));
        assert!(can_transition(Rejected, Draft));

        assert!(!can_transition(Approved, PendingReview));
        assert!(!can_transition(Draft, Approved));
        assert!(!can_transition(PendingReview, Dispensed));
    }

    #[test]
    fn resubmission_cycle_is_one_directional() {
        assert!(can_transition(Rejected, Draft));
        assert!(!can_transition(Draft, Rejected));
    }

    #[test]
    fn pharmacist_reviews_and_dispenses() {
        assert!(PendingReview.is_permitted(Approved, ParticipantRole::Pharmacist));
        assert!(PendingReview.is_permitted(Rejected, ParticipantRole::Pharmacist));
        assert!(Approved.is_permitted(Dispensed, ParticipantRole::Pharmacist));

        assert!(!PendingReview.is_permitted(Approved, ParticipantRole::Doctor));
        assert!(!Approved.is_permitted(Dispensed, ParticipantRole::Patient));
    }

    #[test]
    fn prescriber_submits_and_revises() {
        assert!(Draft.is_permitted(PendingReview, ParticipantRole::Doctor));
        assert!(Rejected.is_permitted(Draft, ParticipantRole::Expert));
        assert!(!Draft.is_permitted(PendingReview, ParticipantRole::Pharmacist));
    }

    #[test]
    fn code_lookup_distinguishes_not_found() {
        assert_eq!(PrescriptionStatus::from_code("PENDING_REVIEW"), Some(PendingReview));
        assert_eq!(PrescriptionStatus::from_code("WAITING"), None);

        let err = "pending_review"
            .parse::<PrescriptionStatus>()
            .expect_err("codes are case-sensitive");
        assert_eq!(
            err.to_string(),
            "unknown prescription status code: 'pending_review'"
        );
    }
}
