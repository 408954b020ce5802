//! Records: structs whose fields carry tags.
//!
//! A record is normally declared with the [`record!`](crate::record) macro, which
//! implements [`Record`], [`Reflect`], `Serialize` and `Deserialize` for it. Encoding
//! and decoding go through the type's cached [`RecordDescriptor`]: the first use of a
//! record type validates its tags, and a type with bad tags is never encoded or
//! decoded.

use crate::descriptor::RecordDescriptor;
use crate::presence::PresenceState;
use crate::reflect::Reflect;
use crate::resolve::{self, Outcome};
use crate::shape::{FieldDef, RecordShape};
use crate::{registry, Error, Map, Options, Result, Value};

/// Field-level access to a struct declared with [`record!`](crate::record).
pub trait Record: Reflect {
    fn record_name() -> &'static str
    where
        Self: Sized;

    /// Field definitions in declaration order.
    fn field_defs() -> Vec<FieldDef>
    where
        Self: Sized;

    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn record_shape() -> RecordShape
    where
        Self: Sized,
    {
        RecordShape {
            name: Self::record_name(),
            fields: Self::field_defs,
        }
    }
}

/// Encodes a record into a wire object.
pub fn encode_record<T: Record>(record: &T) -> Result<Map> {
    let descriptor = registry::descriptor::<T>()?;
    encode_fields(&descriptor, record)
}

fn encode_fields(descriptor: &RecordDescriptor, root: &dyn Record) -> Result<Map> {
    let mut out = Map::with_capacity(descriptor.fields.len());
    for spec in &descriptor.fields {
        // an inlined parent that is None contributes nothing
        let Some(field) = locate(descriptor, root, &spec.path)? else {
            continue;
        };
        match resolve::encode_field(descriptor.name, spec, field)? {
            Outcome::Omit => {}
            Outcome::Write(value) => {
                out.insert(spec.name.clone(), value);
            }
        }
    }
    Ok(out)
}

/// Decodes a wire value into a fresh record.
pub fn decode_record<T: Record + Default>(value: Value, options: &Options) -> Result<T> {
    let mut record = T::default();
    decode_record_in_place(&mut record, value, options)?;
    Ok(record)
}

/// Decodes a wire value into an existing record. Fields whose keys are absent keep
/// their current values.
///
/// The decode runs on a copy that replaces `record` only on success, so a failed
/// decode leaves `record` unchanged.
pub fn decode_record_into<T: Record + Clone>(
    record: &mut T,
    value: Value,
    options: &Options,
) -> Result<()> {
    let descriptor = registry::descriptor::<T>()?;
    let input = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(()),
        other => return Err(Error::type_mismatch("object", other.kind())),
    };
    check_input(&descriptor, &input, options)?;

    let mut staged = record.clone();
    decode_fields(&descriptor, &mut staged, input, options)?;
    *record = staged;
    Ok(())
}

/// Decodes a wire value straight into `record`. On error the fields decoded before
/// the failing one keep their new values.
#[doc(hidden)]
pub fn decode_record_in_place<T: Record>(
    record: &mut T,
    value: Value,
    options: &Options,
) -> Result<()> {
    let descriptor = registry::descriptor::<T>()?;
    match value {
        Value::Object(map) => {
            check_input(&descriptor, &map, options)?;
            decode_fields(&descriptor, record, map, options)
        }
        Value::Null => Ok(()),
        other => Err(Error::type_mismatch("object", other.kind())),
    }
}

/// Failures that are known from the keys alone, checked before any field is written.
fn check_input(descriptor: &RecordDescriptor, input: &Map, options: &Options) -> Result<()> {
    let mut known = 0;
    for spec in &descriptor.fields {
        if input.contains_key(&spec.name) {
            known += 1;
        } else {
            resolve::decode_absent(descriptor.name, spec)?;
        }
    }

    if options.deny_unknown_fields && known < input.len() {
        if let Some(key) = input.keys().find(|key| descriptor.field(key).is_none()) {
            return Err(Error::unknown_field(descriptor.name, key));
        }
    }
    Ok(())
}

fn decode_fields(
    descriptor: &RecordDescriptor,
    root: &mut dyn Record,
    mut input: Map,
    options: &Options,
) -> Result<()> {
    for spec in &descriptor.fields {
        // absent keys were settled by check_input, and inlined parents stay unallocated
        let Some(value) = input.swap_remove(&spec.name) else {
            continue;
        };
        let state = PresenceState::from_entry(Some(value));
        let target = locate_mut(descriptor, root, &spec.path)?;
        resolve::decode_field(descriptor.name, spec, target, state, options)?;
    }
    Ok(())
}

fn locate<'a>(
    descriptor: &RecordDescriptor,
    root: &'a dyn Record,
    path: &[usize],
) -> Result<Option<&'a dyn Reflect>> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| Error::custom(format!("{}: empty field path", descriptor.name)))?;
    let mut record = root;
    for &index in parents {
        match field_at(descriptor, record, index)?.embedded() {
            Some(inner) => record = inner,
            None => return Ok(None),
        }
    }
    field_at(descriptor, record, *last).map(Some)
}

fn locate_mut<'a>(
    descriptor: &RecordDescriptor,
    root: &'a mut dyn Record,
    path: &[usize],
) -> Result<&'a mut dyn Reflect> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| Error::custom(format!("{}: empty field path", descriptor.name)))?;
    let mut record = root;
    for &index in parents {
        record = record
            .field_mut(index)
            .and_then(|parent| parent.embedded_mut())
            .ok_or_else(|| missing_field(descriptor, index))?;
    }
    record
        .field_mut(*last)
        .ok_or_else(|| missing_field(descriptor, *last))
}

fn field_at<'a>(
    descriptor: &RecordDescriptor,
    record: &'a dyn Record,
    index: usize,
) -> Result<&'a dyn Reflect> {
    record
        .field(index)
        .ok_or_else(|| missing_field(descriptor, index))
}

fn missing_field(descriptor: &RecordDescriptor, index: usize) -> Error {
    Error::custom(format!(
        "{}: no field at index {} on the navigation path",
        descriptor.name, index
    ))
}

#[doc(hidden)]
pub fn serialize_record<T, S>(record: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Record,
    S: serde::Serializer,
{
    use serde::Serialize;

    let map = encode_record(record).map_err(<S::Error as serde::ser::Error>::custom)?;
    Value::Object(map).serialize(serializer)
}

#[doc(hidden)]
pub fn deserialize_record<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Record + Default,
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = Value::deserialize(deserializer)?;
    decode_record(value, &Options::default()).map_err(<D::Error as serde::de::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, value};

    record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Wide {
            a: i64,
            b: i64,
            c: Option<i64> => "c,nullable",
            d: i64,
            e: Option<i64> => "e,optional",
        }
    }

    #[test]
    fn test_input_key_order_is_irrelevant() {
        let input = value!({ "e": 5, "d": 4, "c": null, "b": 2, "a": 1 });
        let wide: Wide = decode_record(input, &Options::default()).unwrap();
        assert_eq!(
            wide,
            Wide {
                a: 1,
                b: 2,
                c: None,
                d: 4,
                e: Some(5),
            }
        );
    }

    #[test]
    fn test_unknown_key_reported_before_writes() {
        let strict = Options::new().with_deny_unknown_fields(true);
        let mut wide = Wide::default();
        let input = value!({ "a": 1, "x": 0, "c": 3, "y": 0 });
        let err = decode_record_in_place(&mut wide, input, &strict).unwrap_err();
        assert_eq!(err, Error::unknown_field("Wide", "x"));
        assert_eq!(wide, Wide::default());
    }

    #[test]
    fn test_missing_nullable_reported_before_writes() {
        let mut wide = Wide::default();
        let err = decode_record_in_place(&mut wide, value!({ "a": 1 }), &Options::default())
            .unwrap_err();
        assert_eq!(err, Error::missing_nullable_field("Wide", "c"));
        assert_eq!(wide.a, 0);
    }
}
