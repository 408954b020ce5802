//! Tag and indirection validation.
//!
//! Checks one field's presence tags against its declared type. Only the declared
//! shape is consulted, never a runtime value, so a record type is either valid for
//! every input or for none.
//!
//! ```rust
//! use serde_presence::{record, validate, Error};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     struct Bad {
//!         x: Option<i64> => "x,optional,nullable",
//!     }
//! }
//!
//! let err = validate::<Bad>().unwrap_err();
//! assert!(matches!(err, Error::InsufficientIndirection { required: 2, .. }));
//! ```

use crate::descriptor::FieldSpec;
use crate::shape::{RecordShape, Shape};
use crate::{Error, Result};

/// Validates one field of `root`.
pub fn check_field(root: &RecordShape, spec: &FieldSpec) -> Result<()> {
    let opts = &spec.options;
    let required = opts.required();
    if required == 0 {
        return Ok(());
    }

    if opts.omit_empty {
        let flag = if opts.optional { "optional" } else { "nullable" };
        return Err(Error::tag_conflict(root.name, &spec.name, flag));
    }

    let declared = declared_shape(root, &spec.path)?;
    let mut remaining = &declared;
    let mut missing = required;
    while missing > 0 {
        match remaining.strip_optional() {
            Some(inner) => {
                remaining = inner;
                missing -= 1;
            }
            None => break,
        }
    }

    if missing > 0 {
        return Err(Error::insufficient_indirection(
            root.name,
            &spec.name,
            required,
            opts.presence_flags(),
            &declared.to_string(),
            &remaining.to_string(),
        ));
    }
    Ok(())
}

/// Resolves the declared type at the end of a navigation path. Parent hops through
/// `Option` and `Box` are transparent.
pub fn declared_shape(root: &RecordShape, path: &[usize]) -> Result<Shape> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| Error::custom(format!("{}: empty field path", root.name)))?;

    let mut record = *root;
    for &index in parents {
        record = record
            .fields()
            .get(index)
            .and_then(|def| def.shape.strip_ownership().as_record())
            .ok_or_else(|| bad_path(&record, index))?;
    }

    record
        .fields()
        .into_iter()
        .nth(*last)
        .map(|def| def.shape)
        .ok_or_else(|| bad_path(&record, *last))
}

fn bad_path(record: &RecordShape, index: usize) -> Error {
    Error::custom(format!("{}: no record field at index {}", record.name, index))
}
