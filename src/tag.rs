//! Field tag parsing.
//!
//! A tag is a comma-separated list. The first element is the wire name (empty means
//! the field's Rust identifier) and the rest are options:
//!
//! | option      | effect                                                  |
//! |-------------|---------------------------------------------------------|
//! | `optional`  | the key may be absent; needs one `Option` layer          |
//! | `nullable`  | the key may be `null`; needs one more `Option` layer     |
//! | `omitempty` | omit the key when the value is empty                     |
//! | `string`    | carry a scalar as JSON text inside a string              |
//! | `inline`    | flatten an embedded record into the parent object        |
//!
//! A tag of exactly `-` skips the field. Unknown options are kept and otherwise ignored.
//!
//! ```rust
//! use serde_presence::FieldTagOptions;
//!
//! let opts = FieldTagOptions::parse("x,optional,nullable");
//! assert_eq!(opts.name.as_deref(), Some("x"));
//! assert!(opts.optional && opts.nullable);
//! assert_eq!(opts.required(), 2);
//! ```

/// Options parsed from one field tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTagOptions {
    /// Wire name override; `None` means the Rust identifier is used.
    pub name: Option<String>,
    /// The whole tag was `-`.
    pub skip: bool,
    pub omit_empty: bool,
    pub optional: bool,
    pub nullable: bool,
    pub string: bool,
    pub inline: bool,
    /// Unrecognized options, verbatim and in order.
    pub extra: Vec<String>,
}

impl FieldTagOptions {
    /// Parses raw tag text. Never fails: bad combinations are rejected later, when the
    /// options are checked against the field's type.
    pub fn parse(tag: &str) -> Self {
        let mut opts = FieldTagOptions::default();
        if tag == "-" {
            opts.skip = true;
            return opts;
        }

        let (name, rest) = match tag.split_once(',') {
            Some((name, rest)) => (name, Some(rest)),
            None => (tag, None),
        };
        if !name.is_empty() {
            opts.name = Some(name.to_string());
        }

        for option in rest.into_iter().flat_map(|rest| rest.split(',')) {
            match option {
                "" => {}
                "omitempty" => opts.omit_empty = true,
                "optional" => opts.optional = true,
                "nullable" => opts.nullable = true,
                "string" => opts.string = true,
                "inline" => opts.inline = true,
                other => {
                    if !opts.extra.iter().any(|seen| seen == other) {
                        opts.extra.push(other.to_string());
                    }
                }
            }
        }
        opts
    }

    /// Number of `Option` layers the declared type must provide.
    #[must_use]
    pub fn required(&self) -> usize {
        usize::from(self.optional) + usize::from(self.nullable)
    }

    /// Returns `true` if the option is present, recognized or not.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        match option {
            "omitempty" => self.omit_empty,
            "optional" => self.optional,
            "nullable" => self.nullable,
            "string" => self.string,
            "inline" => self.inline,
            other => self.extra.iter().any(|seen| seen == other),
        }
    }

    /// The presence flags as they appear in error messages.
    #[must_use]
    pub fn presence_flags(&self) -> &'static str {
        match (self.optional, self.nullable) {
            (true, true) => "optional nullable",
            (true, false) => "optional",
            (false, true) => "nullable",
            (false, false) => "",
        }
    }
}
