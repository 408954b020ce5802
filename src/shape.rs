//! Declared type shapes.
//!
//! A [`Shape`] is the static description of a field's type that the validator works
//! on. The only layer that can hold "nothing" is `Option<T>`, so
//! [`Shape::Optional`] is the only layer that counts towards an optional or nullable
//! requirement. `Box<T>` is recorded as [`Shape::Boxed`] but never counts, because a
//! box always owns a value. It does not hide an `Option` inside it either.
//!
//! ```rust
//! use serde_presence::{Reflect, Shape};
//!
//! let shape = <Option<Option<i64>> as Reflect>::shape();
//! assert_eq!(shape.optional_depth(), 2);
//! assert_eq!(shape.to_string(), "Option<Option<i64>>");
//! ```

use std::fmt;

/// The declared type of one record field.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// `Option<T>`: one optional-ownership layer.
    Optional(Box<Shape>),
    /// `Box<T>`: owned indirection that is never empty.
    Boxed(Box<Shape>),
    /// A leaf type encoded directly by serde (`i64`, `String`, ...).
    Scalar(&'static str),
    /// `Vec<T>`.
    Seq(Box<Shape>),
    /// A string-keyed map.
    Map(Box<Shape>),
    /// A record declared with [`record!`](crate::record).
    Record(RecordShape),
    /// A type whose structure is only known at runtime, such as [`Value`](crate::Value).
    Dynamic(&'static str),
}

impl Shape {
    /// Removes one `Option` layer, looking through any `Box` in front of it.
    #[must_use]
    pub fn strip_optional(&self) -> Option<&Shape> {
        match self {
            Shape::Optional(inner) => Some(inner),
            Shape::Boxed(inner) => inner.strip_optional(),
            _ => None,
        }
    }

    /// Number of leading `Option` layers.
    #[must_use]
    pub fn optional_depth(&self) -> usize {
        let mut depth = 0;
        let mut shape = self;
        while let Some(inner) = shape.strip_optional() {
            depth += 1;
            shape = inner;
        }
        depth
    }

    /// Removes every leading `Option` and `Box` layer.
    ///
    /// Used when stepping through an inlined parent record, and to find the base type
    /// of a field.
    #[must_use]
    pub fn strip_ownership(&self) -> &Shape {
        match self {
            Shape::Optional(inner) | Shape::Boxed(inner) => inner.strip_ownership(),
            other => other,
        }
    }

    /// The record this shape describes, if it is one.
    #[must_use]
    pub fn as_record(&self) -> Option<RecordShape> {
        match self {
            Shape::Record(record) => Some(*record),
            _ => None,
        }
    }

    /// Returns `true` for leaf types encoded directly by serde.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Shape::Scalar(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Optional(inner) => write!(f, "Option<{}>", inner),
            Shape::Boxed(inner) => write!(f, "Box<{}>", inner),
            Shape::Scalar(name) | Shape::Dynamic(name) => f.write_str(name),
            Shape::Seq(inner) => write!(f, "Vec<{}>", inner),
            Shape::Map(inner) => write!(f, "Map<String, {}>", inner),
            Shape::Record(record) => f.write_str(record.name),
        }
    }
}

/// A record type: its name and a lazily evaluated list of field definitions.
///
/// Fields are produced on demand so that self-referential records
/// (`next: Option<Box<Node>>`) have a finite shape.
#[derive(Clone, Copy)]
pub struct RecordShape {
    pub name: &'static str,
    pub fields: fn() -> Vec<FieldDef>,
}

impl RecordShape {
    /// Evaluates the field definitions.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDef> {
        (self.fields)()
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for RecordShape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// One field as written in a record declaration: identifier, raw tag text, shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub ident: &'static str,
    pub tag: &'static str,
    pub shape: Shape,
}

impl FieldDef {
    pub fn new(ident: &'static str, tag: &'static str, shape: Shape) -> Self {
        FieldDef { ident, tag, shape }
    }
}
