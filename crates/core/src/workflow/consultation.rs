//! Consultation lifecycle.
//!
//! ```text
//! WAITING ──accept──▶ IN_PROGRESS ──finish──▶ FINISHED
//!    │                     │
//!    └──────cancel─────────┴──────cancel─────▶ CANCELED
//! ```

use super::{StatusKind, WorkflowStatus, CLINICIANS};
use crate::role::ParticipantRole;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a single patient–doctor consultation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsultationStatus {
    /// Initiated by the patient, not yet accepted.
    Waiting,
    /// Accepted by a doctor or expert.
    InProgress,
    Finished,
    Canceled,
}

impl ConsultationStatus {
    pub const ALL: [ConsultationStatus; 4] = [
        ConsultationStatus::Waiting,
        ConsultationStatus::InProgress,
        ConsultationStatus::Finished,
        ConsultationStatus::Canceled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ConsultationStatus::Waiting => "WAITING",
            ConsultationStatus::InProgress => "IN_PROGRESS",
            ConsultationStatus::Finished => "FINISHED",
            ConsultationStatus::Canceled => "CANCELED",
        }
    }

    /// Looks up a status by wire code. `None` means the code is not a consultation status.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

/// Statuses a consultation may move to from `current`.
pub fn allowed_next_statuses(current: ConsultationStatus) -> &'static [ConsultationStatus] {
    use ConsultationStatus::*;

    match current {
        Waiting => &[InProgress, Canceled],
        InProgress => &[Finished, Canceled],
        Finished | Canceled => &[],
    }
}

pub fn can_transition(current: ConsultationStatus, target: ConsultationStatus) -> bool {
    allowed_next_statuses(current).contains(&target)
}

pub fn is_terminal(status: ConsultationStatus) -> bool {
    allowed_next_statuses(status).is_empty()
}

/// Roles allowed to trigger `current -> target`.
pub fn allowed_roles(
    current: ConsultationStatus,
    target: ConsultationStatus,
) -> &'static [ParticipantRole] {
    use ConsultationStatus::*;

    match (current, target) {
        (Waiting, InProgress) => CLINICIANS,
        (Waiting, Canceled) => &[
            ParticipantRole::Patient,
            ParticipantRole::Doctor,
            ParticipantRole::Expert,
        ],
        (InProgress, Finished) | (InProgress, Canceled) => CLINICIANS,
        _ => &[],
    }
}

impl WorkflowStatus for ConsultationStatus {
    const KIND: StatusKind = StatusKind::Consultation;
    const INITIAL: Self = ConsultationStatus::Waiting;

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn code(self) -> &'static str {
        ConsultationStatus::code(self)
    }

    fn description(self) -> &'static str {
        match self {
            ConsultationStatus::Waiting => "waiting for a doctor",
            ConsultationStatus::InProgress => "in progress",
            ConsultationStatus::Finished => "finished",
            ConsultationStatus::Canceled => "canceled",
        }
    }

    fn allowed_next(self) -> &'static [Self] {
        allowed_next_statuses(self)
    }

    fn allowed_roles(self, target: Self) -> &'static [ParticipantRole] {
        allowed_roles(self, target)
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ConsultationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownStatus {
            kind: StatusKind::Consultation,
            code: s.to_owned(),
        })
    }
}
