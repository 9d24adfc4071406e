//! Constants used throughout the telecare core crate.

/// Session credential lifetime applied when no explicit window is configured.
pub const DEFAULT_SESSION_EXPIRY_MINUTES: i64 = 30;

/// Longest accepted session credential lifetime (one day).
pub const MAX_SESSION_EXPIRY_MINUTES: i64 = 24 * 60;

/// Minimum signing secret length in bytes (the HS256 key size).
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Prefix of every real-time room identifier; the consultation id follows it.
pub const ROOM_ID_PREFIX: &str = "consultation-";
