use crate::role::ParticipantRole;
use crate::workflow::StatusKind;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown {kind} status code: '{code}'")]
    UnknownStatus { kind: StatusKind, code: String },
    #[error("unknown participant role: '{0}'")]
    UnknownRole(String),

    #[error("{kind} cannot move from {from} to {to}")]
    IllegalTransition {
        kind: StatusKind,
        from: &'static str,
        to: &'static str,
    },
    #[error("{role} may not move {kind} from {from} to {to}")]
    TransitionNotPermitted {
        kind: StatusKind,
        from: &'static str,
        to: &'static str,
        role: ParticipantRole,
    },

    #[error("failed to sign session claims: {0}")]
    TokenEncoding(jsonwebtoken::errors::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
