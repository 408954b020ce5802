/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object values and array elements must be single tokens: literals, `null`, nested
/// `{..}` / `[..]`, or a parenthesized expression such as `(-1)`.
///
/// ```rust
/// use serde_presence::{value, Value};
///
/// let v = value!({ "id": 7, "tags": ["a", "b"], "note": null });
/// assert_eq!(v.as_object().and_then(|m| m.get("note")), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // anything else goes through the value serializer
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}

/// Declares a record: a struct whose fields carry tags.
///
/// Each field may end with `=> "tag"`. The struct must implement `Default`, and every
/// field type must implement [`Reflect`](crate::Reflect). The macro implements
/// [`Record`](crate::Record), [`Reflect`](crate::Reflect), `Serialize` and
/// `Deserialize`.
///
/// ```rust
/// use serde_presence::{decode_str, encode_to_string, record, Options};
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Patch {
///         pub id: u64,
///         /// absent: leave alone, null: clear, value: set
///         pub email: Option<Option<String>> => "email,optional,nullable",
///     }
/// }
///
/// let patch: Patch = decode_str(r#"{"id":1,"email":null}"#, &Options::default()).unwrap();
/// assert_eq!(patch.email, Some(None));
/// assert_eq!(encode_to_string(&patch, &Options::default()).unwrap(), r#"{"id":1,"email":null}"#);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn record_name() -> &'static str {
                stringify!($name)
            }

            fn field_defs() -> ::std::vec::Vec<$crate::FieldDef> {
                vec![
                    $(
                        $crate::FieldDef::new(
                            stringify!($field),
                            $crate::__tag!($($tag)?),
                            <$ty as $crate::Reflect>::shape(),
                        ),
                    )*
                ]
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn $crate::Reflect> {
                let fields: ::std::vec::Vec<&dyn $crate::Reflect> =
                    vec![$(&self.$field as &dyn $crate::Reflect),*];
                fields.get(index).copied()
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn $crate::Reflect> {
                let fields: ::std::vec::Vec<&mut dyn $crate::Reflect> =
                    vec![$(&mut self.$field as &mut dyn $crate::Reflect),*];
                fields.into_iter().nth(index)
            }
        }

        impl $crate::Reflect for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::Record(<Self as $crate::Record>::record_shape())
            }

            fn reset(&mut self) {
                *self = <Self as ::core::default::Default>::default();
            }

            fn is_empty_value(&self) -> bool {
                false
            }

            fn encode_value(&self) -> $crate::Result<$crate::Value> {
                $crate::__private::encode_record(self).map($crate::Value::Object)
            }

            fn decode_value(
                &mut self,
                value: $crate::Value,
                options: &$crate::Options,
            ) -> $crate::Result<()> {
                $crate::__private::decode_record_in_place(self, value, options)
            }

            fn embedded(&self) -> ::core::option::Option<&dyn $crate::Record> {
                ::core::option::Option::Some(self as &dyn $crate::Record)
            }

            fn embedded_mut(&mut self) -> ::core::option::Option<&mut dyn $crate::Record> {
                ::core::option::Option::Some(self as &mut dyn $crate::Record)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serialize_record(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::__private::deserialize_record(deserializer)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tag {
    () => {
        ""
    };
    ($tag:literal) => {
        $tag
    };
}
