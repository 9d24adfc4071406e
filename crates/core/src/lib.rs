//! # Telecare Core
//!
//! Correctness rules for the remote-consultation workflow.
//!
//! This crate contains two independent, pure components:
//! - [`workflow`]: the status engine for consultations and prescriptions, answering which
//!   transitions are legal and which roles may trigger them
//! - [`session`]: issuance and validation of short-lived, consultation-scoped credentials for
//!   the real-time channel
//!
//! **No I/O concerns**: persistence, HTTP handlers, and authentication belong to the callers.
//! The only state held here is immutable configuration resolved at startup ([`config`]).

pub mod config;
pub mod constants;
pub mod error;
pub mod role;
pub mod session;
pub mod workflow;

pub use config::{expiry_minutes_from_env_value, SessionConfig, SigningSecret};
pub use error::{CoreError, CoreResult};
pub use role::ParticipantRole;
pub use session::{
    room_id_for, Clock, FixedClock, SessionClaims, SessionCredential, SessionIssuer, SystemClock,
};
pub use workflow::{
    ensure_permitted, ensure_transition, ConsultationStatus, PrescriptionStatus, StatusKind,
    WorkflowStatus,
};

// Re-export validated types so callers need only this crate.
pub use telecare_types::{ConsultationId, NonEmptyText, ParticipantId, TextError};
