//! Validated primitive types shared across the telecare crates.
//!
//! Identifiers arriving from outside the core (API requests, CLI arguments) are wrapped here
//! once, so the rest of the code can rely on them being present and trimmed.

/// Rejection raised when external text carries no content.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    #[error("value is blank")]
    Empty,
}

/// Trimmed text with at least one visible character.
///
/// Serde goes through [`NonEmptyText::new`], so a blank JSON string fails to deserialize
/// instead of producing an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Declares an identifier newtype over [`NonEmptyText`].
///
/// Identifiers are opaque: the core never interprets them beyond equality, so numeric
/// database keys and UUIDs are carried the same way.
macro_rules! text_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(NonEmptyText);

        impl $name {
            /// Validates and wraps an externally supplied identifier.
            pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
                NonEmptyText::new(input).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::str::FromStr for $name {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

text_identifier!(
    /// Identifier of a single patient–doctor consultation.
    ConsultationId
);

text_identifier!(
    /// Identifier of a consultation participant (patient, doctor, expert or pharmacist).
    ParticipantId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  hello  ").expect("valid text");
        assert_eq!(text.as_str(), "hello");

        let text = NonEmptyText::try_from(String::from("\tward 3\n")).expect("valid text");
        assert_eq!(text.as_str(), "ward 3");
        assert_eq!(String::from(text), "ward 3");
    }

    #[test]
    fn non_empty_text_json_is_validated() {
        let text: NonEmptyText = serde_json::from_str("\" telecare \"").expect("deserialize");
        assert_eq!(text.as_str(), "telecare");
        assert_eq!(serde_json::to_string(&text).expect("serialize"), "\"telecare\"");

        assert!(serde_json::from_str::<NonEmptyText>("\"\"").is_err());
        assert!(serde_json::from_str::<NonEmptyText>("7").is_err());
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn identifiers_reject_blank_input() {
        assert_eq!(ConsultationId::new(" "), Err(TextError::Empty));
        assert_eq!("".parse::<ParticipantId>(), Err(TextError::Empty));
    }

    #[test]
    fn identifiers_serialize_as_plain_strings() {
        let id = ConsultationId::new("42").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"42\"");

        let parsed: ConsultationId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, id);
    }

    #[test]
    fn identifiers_reject_blank_json() {
        let err = serde_json::from_str::<ParticipantId>("\"  \"").expect_err("blank id");
        assert!(err.to_string().contains("value is blank"));
    }
}
