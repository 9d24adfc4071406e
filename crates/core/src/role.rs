//! Participant roles.
//!
//! A role is carried inside session credentials and decides which workflow transitions an
//! actor may trigger.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a participant plays in a consultation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    /// The person receiving care; initiates consultations.
    Patient,
    /// Handles consultations and authors prescriptions.
    Doctor,
    /// Specialist consulted with the same clinical rights as a doctor.
    Expert,
    /// Reviews and dispenses prescriptions.
    Pharmacist,
}

impl ParticipantRole {
    pub const ALL: [ParticipantRole; 4] = [
        ParticipantRole::Patient,
        ParticipantRole::Doctor,
        ParticipantRole::Expert,
        ParticipantRole::Pharmacist,
    ];

    /// Stable wire code for this role.
    pub fn code(self) -> &'static str {
        match self {
            ParticipantRole::Patient => "PATIENT",
            ParticipantRole::Doctor => "DOCTOR",
            ParticipantRole::Expert => "EXPERT",
            ParticipantRole::Pharmacist => "PHARMACIST",
        }
    }

    /// Looks up a role by its wire code. Matching is exact.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ParticipantRole {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownRole(s.to_owned()))
    }
}
