//! Error types for presence-aware encoding and decoding.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors** ([`Error::TagConflict`], [`Error::InsufficientIndirection`],
//!   [`Error::InvalidTag`]) describe a record *type* whose tags cannot be honoured. They are
//!   detected once, when the type is first used, and every later attempt to encode or decode
//!   that type fails with the same error.
//! - **Input errors** ([`Error::MissingNullableField`], [`Error::UnknownField`],
//!   [`Error::TypeMismatch`], ...) describe one particular input and never affect the type.
//!
//! ## Examples
//!
//! ```rust
//! use serde_presence::Error;
//!
//! let err = Error::missing_nullable_field("Patch", "email");
//! assert!(!err.is_config());
//! assert!(err.to_string().contains("email"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// `optional` or `nullable` combined with `omitempty` on one field.
    #[error("{record}: field {field:?} cannot have both omitempty and {flag} tags")]
    TagConflict {
        record: String,
        field: String,
        flag: &'static str,
    },

    /// The declared field type has fewer `Option` layers than its tags require.
    #[error(
        "{record}: {flags} field {field:?} requires {required} {levels} of indirection, type = {declared} (remaining {remaining})",
        levels = level_word(.required)
    )]
    InsufficientIndirection {
        record: String,
        field: String,
        required: usize,
        flags: &'static str,
        declared: String,
        remaining: String,
    },

    /// A tag that is malformed or cannot apply to the field's type.
    #[error("{record}: invalid tag on field {field:?}: {reason}")]
    InvalidTag {
        record: String,
        field: String,
        reason: String,
    },

    /// A nullable field that is not also optional was missing from the input.
    #[error("{record}: missing nullable field {field:?} (use null to clear it, or tag it optional)")]
    MissingNullableField { record: String, field: String },

    /// The input carried a key that matches no field (only with `deny_unknown_fields`).
    #[error("{record}: unknown field {field:?}")]
    UnknownField { record: String, field: String },

    /// The wire value has the wrong kind for the target.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Malformed JSON text.
    #[error("JSON error: {0}")]
    Json(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

fn level_word(required: &usize) -> &'static str {
    if *required == 1 {
        "level"
    } else {
        "levels"
    }
}

impl Error {
    /// Creates a tag conflict error for `flag` (`"optional"` or `"nullable"`) paired with `omitempty`.
    pub fn tag_conflict(record: &str, field: &str, flag: &'static str) -> Self {
        Error::TagConflict {
            record: record.to_string(),
            field: field.to_string(),
            flag,
        }
    }

    /// Creates an insufficient indirection error.
    ///
    /// `flags` names what drove the requirement: `"optional"`, `"nullable"` or
    /// `"optional nullable"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_presence::Error;
    ///
    /// let err = Error::insufficient_indirection("Patch", "x", 2, "optional nullable", "Option<i64>", "i64");
    /// assert!(err.to_string().contains("requires 2 levels"));
    /// ```
    pub fn insufficient_indirection(
        record: &str,
        field: &str,
        required: usize,
        flags: &'static str,
        declared: &str,
        remaining: &str,
    ) -> Self {
        Error::InsufficientIndirection {
            record: record.to_string(),
            field: field.to_string(),
            required,
            flags,
            declared: declared.to_string(),
            remaining: remaining.to_string(),
        }
    }

    /// Creates an invalid tag error.
    pub fn invalid_tag(record: &str, field: &str, reason: &str) -> Self {
        Error::InvalidTag {
            record: record.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a missing nullable field error.
    pub fn missing_nullable_field(record: &str, field: &str) -> Self {
        Error::MissingNullableField {
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(record: &str, field: &str) -> Self {
        Error::UnknownField {
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    /// Creates a type mismatch error when a wire value has an incompatible kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_presence::Error;
    ///
    /// let err = Error::type_mismatch("object", "array");
    /// assert!(err.to_string().contains("expected object"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for types that cannot become a [`crate::Value`].
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors that describe a record type rather than an input.
    ///
    /// These are the errors cached by the registry.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::TagConflict { .. }
                | Error::InsufficientIndirection { .. }
                | Error::InvalidTag { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else {
            Error::Json(err.to_string())
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
