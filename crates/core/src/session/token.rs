//! Compact HS256 JWS encoding of session claims.
//!
//! Framing, header handling and signature checks are delegated to `jsonwebtoken`. Expiry is
//! not checked here: the issuer compares `exp` against its own [`Clock`](super::Clock).

use super::SessionClaims;
use crate::{CoreError, CoreResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Why a presented token was refused. Only ever logged, never returned to callers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum Rejection {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    #[error("signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token belongs to a different consultation")]
    ConsultationMismatch,
    #[error("token belongs to a different participant")]
    ParticipantMismatch,
}

impl From<jsonwebtoken::errors::Error> for Rejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Rejection::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Rejection::UnsupportedAlgorithm
            }
            _ => Rejection::Malformed(err.to_string()),
        }
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Serializes and signs `claims`.
pub(crate) fn encode(claims: &SessionClaims, key: &[u8]) -> CoreResult<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(key),
    )
    .map_err(CoreError::TokenEncoding)
}

/// Checks structure, algorithm and signature, then returns the embedded claims.
///
/// Expiry and identity binding are checked by the caller against its own clock and inputs.
pub(crate) fn decode(token: &str, key: &[u8]) -> Result<SessionClaims, Rejection> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(key),
        &validation(),
    )?;
    Ok(data.claims)
}
