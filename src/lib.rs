//! # serde_presence
//!
//! Three-state field presence for serde: a field can be **absent** from the wire, be
//! explicitly **null**, or hold a **value**, and the three stay distinct through an
//! encode/decode round trip.
//!
//! ## The problem
//!
//! With plain serde an `Option<T>` field cannot tell `{}` from `{"email": null}`.
//! For a PATCH-style API that difference matters: absent means "leave it alone",
//! null means "clear it".
//!
//! ## Tags
//!
//! Records are declared with [`record!`]. Each field may carry a tag with two
//! independent options:
//!
//! - `optional`: the key may be absent. Absence is the outermost `Option` being `None`.
//! - `nullable`: the key may be `null`. Null is the next `Option` in being `None`.
//!
//! A field tagged with both needs `Option<Option<T>>`:
//!
//! ```rust
//! use serde_presence::{decode_str, encode_to_string, record, Options};
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Patch {
//!         pub x: Option<Option<i64>> => "X,optional,nullable",
//!     }
//! }
//!
//! let opts = Options::default();
//! let absent: Patch = decode_str("{}", &opts).unwrap();
//! let null: Patch = decode_str(r#"{"X":null}"#, &opts).unwrap();
//! let zero: Patch = decode_str(r#"{"X":0}"#, &opts).unwrap();
//!
//! assert_eq!(absent.x, None);
//! assert_eq!(null.x, Some(None));
//! assert_eq!(zero.x, Some(Some(0)));
//!
//! assert_eq!(encode_to_string(&absent, &opts).unwrap(), "{}");
//! assert_eq!(encode_to_string(&null, &opts).unwrap(), r#"{"X":null}"#);
//! assert_eq!(encode_to_string(&zero, &opts).unwrap(), r#"{"X":0}"#);
//! ```
//!
//! Tags are checked against the declared field types the first time a record type is
//! used. `omitempty` together with `optional` or `nullable`, or too few `Option`
//! layers for the tags, make the type unusable: every encode and decode of it fails
//! with the same configuration error.
//!
//! ## Typed alternative
//!
//! For structs using `#[derive(Serialize, Deserialize)]`, [`Presence<T>`] carries
//! the same three states in the type itself.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: descriptor registration at `debug`,
//! rejected record types at `warn`, per-field decisions at `trace`.

pub mod de;
pub mod descriptor;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod presence;
pub mod record;
pub mod reflect;
pub mod registry;
pub mod resolve;
pub mod ser;
pub mod shape;
pub mod tag;
pub mod validate;
pub mod value;

pub use de::ValueDeserializer;
pub use descriptor::{FieldSpec, RecordDescriptor};
pub use error::{Error, Result};
pub use map::Map;
pub use options::Options;
pub use presence::{Presence, PresenceState};
pub use record::Record;
pub use reflect::{Layer, Reflect};
pub use ser::ValueSerializer;
pub use shape::{FieldDef, RecordShape, Shape};
pub use tag::FieldTagOptions;
pub use value::{Number, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;

#[doc(hidden)]
pub mod __private {
    pub use crate::record::{
        decode_record_in_place, decode_record_into, deserialize_record, encode_record,
        serialize_record,
    };
    pub use serde;
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_presence::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Serialize any `T: Serialize` to compact JSON text.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &Options::default())
}

/// Serialize any `T: Serialize` to indented JSON text.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &Options::pretty())
}

/// Serialize any `T: Serialize` to JSON text laid out according to `options`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::new();
    to_writer_with_options(&mut buffer, value, options)?;
    String::from_utf8(buffer).map_err(|e| Error::custom(e.to_string()))
}

/// Serialize any `T: Serialize` as compact JSON into a writer.
///
/// # Examples
///
/// ```rust
/// use serde_presence::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2]).unwrap();
/// assert_eq!(buffer, b"[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &Options::default())
}

/// Serialize any `T: Serialize` as JSON into a writer, laid out according to `options`.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: &Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    if options.pretty {
        let indent = " ".repeat(options.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, &value)?;
    }
    Ok(())
}

/// Deserialize an instance of type `T` from JSON text.
///
/// # Examples
///
/// ```rust
/// use serde_presence::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str(r#"{"x":1,"y":2}"#).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or cannot be deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value: Value = serde_json::from_str(s)?;
    from_value(value)
}

/// Deserialize an instance of type `T` from JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or cannot be deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let value: Value = serde_json::from_slice(v)?;
    from_value(value)
}

/// Deserialize an instance of type `T` from an I/O stream of JSON.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid JSON, or the data
/// cannot be deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let value = Value::deserialize(&mut serde_json::Deserializer::from_reader(reader))?;
    from_value(value)
}

/// Encode a record into a [`Value`].
///
/// Unlike going through `Serialize`, errors keep their structured kind.
///
/// # Errors
///
/// Returns the record type's configuration error if its tags are invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<T: Record>(record: &T) -> Result<Value> {
    record::encode_record(record).map(Value::Object)
}

/// Encode a record into JSON text laid out according to `options`.
///
/// # Errors
///
/// Returns the record type's configuration error if its tags are invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_string<T: Record>(record: &T, options: &Options) -> Result<String> {
    to_string_with_options(&encode(record)?, options)
}

/// Decode a record from a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_presence::{decode, record, value, Error, Options};
///
/// record! {
///     #[derive(Debug, Default)]
///     struct Clear {
///         email: Option<String> => ",nullable",
///     }
/// }
///
/// let err = decode::<Clear>(value!({}), &Options::default()).unwrap_err();
/// assert!(matches!(err, Error::MissingNullableField { .. }));
///
/// let cleared: Clear = decode(value!({ "email": null }), &Options::default()).unwrap();
/// assert_eq!(cleared.email, None);
/// ```
///
/// # Errors
///
/// Returns the record type's configuration error, or an input error such as
/// [`Error::MissingNullableField`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode<T: Record + Default>(value: Value, options: &Options) -> Result<T> {
    record::decode_record(value, options)
}

/// Decode a record from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON, or as [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_str<T: Record + Default>(s: &str, options: &Options) -> Result<T> {
    let value: Value = serde_json::from_str(s)?;
    decode(value, options)
}

/// Validate a record type's tags without encoding or decoding anything.
///
/// # Errors
///
/// Returns the configuration error that makes the type unusable.
pub fn validate<T: Record>() -> Result<()> {
    registry::descriptor::<T>().map(|_| ())
}

/// The validated descriptor of a record type.
///
/// # Errors
///
/// Returns the configuration error that makes the type unusable.
pub fn descriptor<T: Record>() -> Result<Arc<RecordDescriptor>> {
    registry::descriptor::<T>()
}
