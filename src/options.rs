//! Configuration options for encoding and decoding.
//!
//! [`Options`] controls the JSON text layout on output and how strictly records are
//! matched against their input on decode.
//!
//! ## Examples
//!
//! ```rust
//! use serde_presence::{to_string_with_options, Options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! let compact = to_string_with_options(&data, &Options::new()).unwrap();
//! assert_eq!(compact, r#"{"x":1,"y":2}"#);
//!
//! let pretty = to_string_with_options(&data, &Options::pretty().with_indent(4)).unwrap();
//! assert!(pretty.contains("\n    \"x\": 1"));
//! ```

/// Configuration options for encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_presence::Options;
///
/// // Default compact output, lenient decoding
/// let options = Options::new();
///
/// // Pretty-printed with 2-space indentation
/// let options = Options::pretty();
///
/// // Reject keys that match no record field
/// let options = Options::new().with_deny_unknown_fields(true);
/// assert!(options.deny_unknown_fields);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub indent: usize,
    pub pretty: bool,
    pub deny_unknown_fields: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            indent: 2,
            pretty: false,
            deny_unknown_fields: false,
        }
    }
}

impl Options {
    /// Creates default options (compact output, 2-space indent when pretty, unknown keys ignored).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_presence::Options;
    ///
    /// let options = Options::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        Options {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Rejects input keys that match no record field when decoding records.
    #[must_use]
    pub fn with_deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }
}
