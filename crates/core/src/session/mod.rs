//! Session credentials for real-time consultation rooms.
//!
//! A credential binds one participant to one consultation's room for a bounded window. It is
//! self-contained: validation needs only the shared secret and a clock, so there is no session
//! table and no revocation before expiry.
//!
//! Issuance and validation are independent of workflow status. The join handler decides
//! whether a consultation is in a state that should hand out credentials.

mod clock;
mod token;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::config::SessionConfig;
use crate::constants::ROOM_ID_PREFIX;
use crate::role::ParticipantRole;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use telecare_types::{ConsultationId, ParticipantId};
use token::Rejection;

/// Claims carried in a session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Participant the token was issued to.
    pub sub: ParticipantId,
    pub room_id: String,
    pub consultation_id: ConsultationId,
    pub role: ParticipantRole,
    /// Issuing application.
    pub app_id: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds. The token is invalid from this instant on.
    pub exp: i64,
}

/// One participant's authorisation to join one consultation's room.
///
/// Owned by the caller for the duration of its validity window; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionCredential {
    /// Signed compact token to present when joining.
    pub token: String,
    pub room_id: String,
    pub participant_id: ParticipantId,
    pub consultation_id: ConsultationId,
    pub role: ParticipantRole,
    pub app_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionCredential {
    pub fn is_expired_at(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.expires_at
    }
}

/// Derives the real-time room for a consultation.
///
/// Deterministic, so participants converge on the same room without a discovery step.
pub fn room_id_for(consultation_id: &ConsultationId) -> String {
    format!("{ROOM_ID_PREFIX}{consultation_id}")
}

/// Mints and validates session credentials.
///
/// Holds only immutable configuration; share it freely between threads.
#[derive(Clone, Debug)]
pub struct SessionIssuer<C: Clock = SystemClock> {
    config: SessionConfig,
    clock: C,
}

impl SessionIssuer<SystemClock> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SessionIssuer<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Issues a credential for `participant_id` to join the room of `consultation_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if either identifier is missing or blank. No
    /// credential is produced in that case.
    pub fn issue(
        &self,
        consultation_id: &str,
        participant_id: &str,
        role: ParticipantRole,
    ) -> CoreResult<SessionCredential> {
        let consultation_id = ConsultationId::new(consultation_id)
            .map_err(|_| CoreError::InvalidInput("consultation_id is required".into()))?;
        let participant_id = ParticipantId::new(participant_id)
            .map_err(|_| CoreError::InvalidInput("participant_id is required".into()))?;

        // Claims carry whole seconds; the credential must report the same instants.
        let issued_at = self.clock.now().trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.config.expiry())
            .ok_or_else(|| CoreError::InvalidInput("issuance time is out of range".into()))?;
        let room_id = room_id_for(&consultation_id);

        let claims = SessionClaims {
            sub: participant_id.clone(),
            room_id: room_id.clone(),
            consultation_id: consultation_id.clone(),
            role,
            app_id: self.config.app_id().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = token::encode(&claims, self.config.secret().as_bytes())?;

        tracing::info!(
            consultation_id = %consultation_id,
            participant_id = %participant_id,
            %role,
            expires_at = %expires_at,
            "issued session credential"
        );

        Ok(SessionCredential {
            token,
            room_id,
            participant_id,
            consultation_id,
            role,
            app_id: claims.app_id,
            issued_at,
            expires_at,
        })
    }

    /// Checks that `token` is authentic, unexpired, and bound to this consultation and
    /// participant.
    ///
    /// Every failure collapses to `false`; the reason is logged but never returned.
    pub fn validate(&self, token: &str, consultation_id: &str, participant_id: &str) -> bool {
        match self.verify(token, consultation_id, participant_id) {
            Ok(claims) => {
                tracing::debug!(
                    consultation_id = %claims.consultation_id,
                    participant_id = %claims.sub,
                    "session credential accepted"
                );
                true
            }
            Err(rejection) => {
                tracing::warn!(
                    consultation_id,
                    participant_id,
                    reason = %rejection,
                    "session credential rejected"
                );
                false
            }
        }
    }

    fn verify(
        &self,
        token: &str,
        consultation_id: &str,
        participant_id: &str,
    ) -> Result<SessionClaims, Rejection> {
        let claims = token::decode(token, self.config.secret().as_bytes())?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(Rejection::Expired);
        }
        if claims.consultation_id.as_str() != consultation_id.trim() {
            return Err(Rejection::ConsultationMismatch);
        }
        if claims.sub.as_str() != participant_id.trim() {
            return Err(Rejection::ParticipantMismatch);
        }

        Ok(claims)
    }
}
