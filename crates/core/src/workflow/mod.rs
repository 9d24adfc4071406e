//! Clinical workflow status engine.
//!
//! Each workflow entity has a closed status enumeration paired with a static transition table
//! and a static table of the roles that may trigger each edge. Both tables are plain `match`
//! expressions; nothing about the graph is configurable at runtime.
//!
//! The queries here never fail. A `false` from [`WorkflowStatus::can_transition_to`] is an
//! answer, not an error: callers that mutate persisted state turn it into a domain error, for
//! which [`ensure_transition`] and [`ensure_permitted`] are provided.

pub mod consultation;
pub mod prescription;

pub use consultation::ConsultationStatus;
pub use prescription::PrescriptionStatus;

use crate::role::ParticipantRole;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles with clinical authority (doctor and expert share the same rights).
pub(crate) const CLINICIANS: &[ParticipantRole] =
    &[ParticipantRole::Doctor, ParticipantRole::Expert];

/// Which workflow entity a status belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Consultation,
    Prescription,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Consultation => f.write_str("consultation"),
            StatusKind::Prescription => f.write_str("prescription"),
        }
    }
}

/// Queries shared by every workflow status enumeration.
///
/// Implementations only supply the lookup tables; the derived queries are defined once here so
/// that "terminal" always means "no outbound edges" and "permitted" always implies "legal".
pub trait WorkflowStatus: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    const KIND: StatusKind;

    /// Status every new entity starts in.
    const INITIAL: Self;

    /// Every variant, in declaration order.
    fn variants() -> &'static [Self];

    /// Stable upper-snake wire code.
    fn code(self) -> &'static str;

    /// Short human-readable label.
    fn description(self) -> &'static str;

    /// Statuses reachable from `self` in one step.
    fn allowed_next(self) -> &'static [Self];

    /// Roles allowed to trigger `self -> target`. Empty for illegal edges.
    fn allowed_roles(self, target: Self) -> &'static [ParticipantRole];

    fn can_transition_to(self, target: Self) -> bool {
        self.allowed_next().contains(&target)
    }

    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    fn is_permitted(self, target: Self, role: ParticipantRole) -> bool {
        self.can_transition_to(target) && self.allowed_roles(target).contains(&role)
    }

    /// Looks up a status by wire code, reporting unknown codes as [`CoreError::UnknownStatus`].
    fn parse_code(code: &str) -> CoreResult<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|status| status.code() == code)
            .ok_or_else(|| CoreError::UnknownStatus {
                kind: Self::KIND,
                code: code.to_owned(),
            })
    }
}

/// Converts an illegal transition into a domain error.
///
/// Call this before persisting any status change.
pub fn ensure_transition<S: WorkflowStatus>(current: S, target: S) -> CoreResult<()> {
    if current.can_transition_to(target) {
        return Ok(());
    }

    tracing::debug!(
        kind = %S::KIND,
        from = current.code(),
        to = target.code(),
        "transition rejected: no such edge"
    );
    Err(CoreError::IllegalTransition {
        kind: S::KIND,
        from: current.code(),
        to: target.code(),
    })
}

/// Like [`ensure_transition`], but also requires that `role` may trigger the edge.
///
/// Legality is checked first, so an illegal edge always reports
/// [`CoreError::IllegalTransition`] regardless of the role.
pub fn ensure_permitted<S: WorkflowStatus>(
    role: ParticipantRole,
    current: S,
    target: S,
) -> CoreResult<()> {
    ensure_transition(current, target)?;

    if current.is_permitted(target, role) {
        return Ok(());
    }

    tracing::debug!(
        kind = %S::KIND,
        from = current.code(),
        to = target.code(),
        %role,
        "transition rejected: role not permitted"
    );
    Err(CoreError::TransitionNotPermitted {
        kind: S::KIND,
        from: current.code(),
        to: target.code(),
        role,
    })
}
