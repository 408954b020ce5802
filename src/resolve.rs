//! The presence resolver.
//!
//! Runs per field, per encode or decode call, on a field whose tags have already been
//! validated. The `optional` layer is the outermost `Option`, the `nullable` layer the
//! next one in.
//!
//! Encode:
//!
//! | layer     | `None`         | `Some`            |
//! |-----------|----------------|-------------------|
//! | optional  | omit the key   | step inside       |
//! | nullable  | write `null`   | step inside       |
//!
//! Decode:
//!
//! | optional | nullable | absent              | `null`                        | value                 |
//! |----------|----------|---------------------|-------------------------------|-----------------------|
//! | no       | no       | untouched           | an `Option` becomes `None`    | decode                |
//! | yes      | no       | untouched           | `Some(zero)`                  | `Some(..)`, decode    |
//! | no       | yes      | `MissingNullableField` | `None`                     | `Some(..)`, decode    |
//! | yes      | yes      | untouched           | `Some(None)`                  | `Some(Some(..))`      |
//!
//! Whatever is left after the layers are peeled is handed to the ordinary value codec
//! exactly once.

use crate::descriptor::FieldSpec;
use crate::presence::PresenceState;
use crate::reflect::{Layer, Reflect};
use crate::{Error, Options, Result, Value};
use log::trace;

/// What the encoder writes for one field.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// No key.
    Omit,
    /// The key with this value.
    Write(Value),
}

/// Decides the wire form of one field.
pub fn encode_field(record: &str, spec: &FieldSpec, field: &dyn Reflect) -> Result<Outcome> {
    let opts = &spec.options;
    let mut current = field;

    if opts.optional {
        match peel(record, spec, current)? {
            Some(inner) => current = inner,
            None => {
                trace!("{}.{}: optional layer empty, omitted", record, spec.name);
                return Ok(Outcome::Omit);
            }
        }
    }
    if opts.nullable {
        match peel(record, spec, current)? {
            Some(inner) => current = inner,
            None => {
                trace!("{}.{}: nullable layer empty, null", record, spec.name);
                return Ok(Outcome::Write(Value::Null));
            }
        }
    }

    if opts.omit_empty && current.is_empty_value() {
        trace!("{}.{}: empty, omitted", record, spec.name);
        return Ok(Outcome::Omit);
    }

    let value = current.encode_value()?;
    let value = if spec.quoted() { quote(value)? } else { value };
    trace!("{}.{}: written", record, spec.name);
    Ok(Outcome::Write(value))
}

/// Applies one input state to one field.
pub fn decode_field(
    record: &str,
    spec: &FieldSpec,
    target: &mut dyn Reflect,
    state: PresenceState,
    options: &Options,
) -> Result<()> {
    let opts = &spec.options;
    trace!("{}.{}: {}", record, spec.name, state.kind());

    match state {
        PresenceState::Absent => decode_absent(record, spec),
        PresenceState::Null => {
            match (opts.optional, opts.nullable) {
                (false, false) => {
                    target.clear_layer();
                }
                (true, false) => alloc(record, spec, target)?.reset(),
                (false, true) => clear(record, spec, target)?,
                (true, true) => clear(record, spec, alloc(record, spec, target)?)?,
            }
            Ok(())
        }
        PresenceState::Value(value) => {
            let mut target = target;
            for _ in 0..opts.required() {
                target = alloc(record, spec, target)?;
            }
            let value = if spec.quoted() { unquote(value)? } else { value };
            target.decode_value(value, options)
        }
    }
}

/// The absent case on its own: only a nullable field that is not also optional
/// must be present.
pub fn decode_absent(record: &str, spec: &FieldSpec) -> Result<()> {
    if spec.options.nullable && !spec.options.optional {
        return Err(Error::missing_nullable_field(record, &spec.name));
    }
    Ok(())
}

fn peel<'a>(record: &str, spec: &FieldSpec, current: &'a dyn Reflect) -> Result<Option<&'a dyn Reflect>> {
    match current.layer() {
        Layer::Present(inner) => Ok(Some(inner)),
        Layer::Empty => Ok(None),
        Layer::Base => Err(layer_mismatch(record, spec)),
    }
}

fn alloc<'a>(record: &str, spec: &FieldSpec, target: &'a mut dyn Reflect) -> Result<&'a mut dyn Reflect> {
    target.alloc_layer().ok_or_else(|| layer_mismatch(record, spec))
}

fn clear(record: &str, spec: &FieldSpec, target: &mut dyn Reflect) -> Result<()> {
    if target.clear_layer() {
        Ok(())
    } else {
        Err(layer_mismatch(record, spec))
    }
}

// The validator guarantees the layers exist; reaching this means the field value does
// not match its declared shape.
fn layer_mismatch(record: &str, spec: &FieldSpec) -> Error {
    Error::insufficient_indirection(
        record,
        &spec.name,
        spec.options.required(),
        spec.options.presence_flags(),
        &spec.shape.to_string(),
        &spec.shape.strip_ownership().to_string(),
    )
}

fn quote(value: Value) -> Result<Value> {
    match value {
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Ok(Value::String(serde_json::to_string(&value)?))
        }
        other => Ok(other),
    }
}

fn unquote(value: Value) -> Result<Value> {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text)? {
            scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => {
                Ok(scalar)
            }
            other => Err(Error::type_mismatch("quoted scalar", other.kind())),
        },
        other => Err(Error::type_mismatch("quoted string", other.kind())),
    }
}
