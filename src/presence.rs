//! Three-state presence.
//!
//! [`PresenceState`] is what the decoder sees for one field of one input object: the
//! key is missing, the key holds `null`, or the key holds a value.
//!
//! [`Presence<T>`] is the same model as a field type, for structs that use plain
//! `#[derive(Serialize, Deserialize)]` instead of [`record!`](crate::record):
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_presence::Presence;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Patch {
//!     #[serde(default, skip_serializing_if = "Presence::is_absent")]
//!     email: Presence<String>,
//! }
//!
//! let absent: Patch = serde_json::from_str("{}").unwrap();
//! let cleared: Patch = serde_json::from_str(r#"{"email":null}"#).unwrap();
//! assert_eq!(absent.email, Presence::Absent);
//! assert_eq!(cleared.email, Presence::Null);
//! assert_eq!(serde_json::to_string(&cleared).unwrap(), r#"{"email":null}"#);
//! assert_eq!(serde_json::to_string(&absent).unwrap(), "{}");
//! ```

use crate::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a field appears in one input object.
#[derive(Clone, Debug, PartialEq)]
pub enum PresenceState {
    Absent,
    Null,
    Value(Value),
}

impl PresenceState {
    /// Classifies the result of looking a key up in an object.
    pub fn from_entry(entry: Option<Value>) -> Self {
        match entry {
            None => PresenceState::Absent,
            Some(Value::Null) => PresenceState::Null,
            Some(value) => PresenceState::Value(value),
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, PresenceState::Absent)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PresenceState::Absent => "absent",
            PresenceState::Null => "null",
            PresenceState::Value(_) => "value",
        }
    }
}

/// A field that can be absent, explicitly null, or present.
///
/// Use it with `#[serde(default, skip_serializing_if = "Presence::is_absent")]`:
/// `default` makes a missing key decode to [`Presence::Absent`], and the skip keeps
/// an absent value off the wire. Serializing an `Absent` value any other way is an
/// error, since there is no wire form for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Presence<T> {
    Absent,
    Null,
    Present(T),
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Presence<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Presence::Null)
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }

    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Presence::Absent => Presence::Absent,
            Presence::Null => Presence::Null,
            Presence::Present(value) => Presence::Present(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Presence<U> {
        match self {
            Presence::Absent => Presence::Absent,
            Presence::Null => Presence::Null,
            Presence::Present(value) => Presence::Present(f(value)),
        }
    }

    /// The present value, if any.
    pub fn present(self) -> Option<T> {
        match self {
            Presence::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// `None` is absent, `Some(None)` is null.
impl<T> From<Option<Option<T>>> for Presence<T> {
    fn from(layers: Option<Option<T>>) -> Self {
        match layers {
            None => Presence::Absent,
            Some(None) => Presence::Null,
            Some(Some(value)) => Presence::Present(value),
        }
    }
}

impl<T> From<Presence<T>> for Option<Option<T>> {
    fn from(presence: Presence<T>) -> Self {
        match presence {
            Presence::Absent => None,
            Presence::Null => Some(None),
            Presence::Present(value) => Some(Some(value)),
        }
    }
}

impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Presence::Absent => Err(serde::ser::Error::custom(
                "absent value must be skipped with skip_serializing_if = \"Presence::is_absent\"",
            )),
            Presence::Null => serializer.serialize_none(),
            Presence::Present(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Presence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Presence::Present(value),
            None => Presence::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Profile {
        name: String,
        #[serde(default, skip_serializing_if = "Presence::is_absent")]
        nickname: Presence<String>,
        #[serde(default, skip_serializing_if = "Presence::is_absent")]
        age: Presence<u32>,
    }

    #[test]
    fn test_state_from_entry() {
        assert_eq!(PresenceState::from_entry(None), PresenceState::Absent);
        assert_eq!(PresenceState::from_entry(Some(Value::Null)), PresenceState::Null);
        assert_eq!(
            PresenceState::from_entry(Some(Value::from(0))),
            PresenceState::Value(Value::from(0))
        );
    }

    #[test]
    fn test_three_states_stay_distinct() {
        let absent: Profile = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        let null: Profile = serde_json::from_str(r#"{"name":"a","age":null}"#).unwrap();
        let zero: Profile = serde_json::from_str(r#"{"name":"a","age":0}"#).unwrap();

        assert_eq!(absent.age, Presence::Absent);
        assert_eq!(null.age, Presence::Null);
        assert_eq!(zero.age, Presence::Present(0));

        assert_eq!(serde_json::to_string(&absent).unwrap(), r#"{"name":"a"}"#);
        assert_eq!(serde_json::to_string(&null).unwrap(), r#"{"name":"a","age":null}"#);
        assert_eq!(serde_json::to_string(&zero).unwrap(), r#"{"name":"a","age":0}"#);
    }

    #[test]
    fn test_works_through_value_codec() {
        let profile = Profile {
            name: "b".to_string(),
            nickname: Presence::Null,
            age: Presence::Absent,
        };
        let value = crate::to_value(&profile).unwrap();
        assert_eq!(value.to_string(), r#"{"name":"b","nickname":null}"#);
        let back: Profile = crate::from_value(value).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_absent_without_skip_is_an_error() {
        assert!(serde_json::to_string(&Presence::<u8>::Absent).is_err());
        assert_eq!(serde_json::to_string(&Presence::Present(1u8)).unwrap(), "1");
    }

    #[test]
    fn test_layer_conversions() {
        let layers: Option<Option<u8>> = Presence::Null.into();
        assert_eq!(layers, Some(None));
        assert_eq!(Presence::from(Some(Some(2u8))), Presence::Present(2));
        assert_eq!(Presence::Present(2u8).map(|n| n * 2).present(), Some(4));
        assert!(Presence::<u8>::default().is_absent());
    }
}
