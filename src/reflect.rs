//! Runtime access to a field's ownership layers.
//!
//! [`Reflect`] is implemented by every type a record field may have. It exposes the
//! static [`Shape`] used by the validator, and at runtime lets the presence resolver
//! peel, allocate and clear `Option` layers one at a time before handing the innermost
//! value to the ordinary value codec ([`Reflect::encode_value`] /
//! [`Reflect::decode_value`]).
//!
//! Only `Option<T>` reports a layer. `Box<T>` delegates to its contents, so a boxed
//! value is seen exactly as the value it owns.

use crate::de::ValueDeserializer;
use crate::record::Record;
use crate::ser::ValueSerializer;
use crate::shape::Shape;
use crate::{Error, Map, Options, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What sits at the top of a value, as seen by the presence resolver.
pub enum Layer<'a> {
    /// Not an `Option`: there is no layer to peel.
    Base,
    /// An `Option` holding `None`.
    Empty,
    /// An `Option` holding a value.
    Present(&'a dyn Reflect),
}

/// A type that can be a record field.
pub trait Reflect: 'static {
    /// The declared shape of the type.
    fn shape() -> Shape
    where
        Self: Sized;

    /// The outermost ownership layer.
    fn layer(&self) -> Layer<'_> {
        Layer::Base
    }

    /// Makes the outermost layer present (keeping any existing contents) and returns
    /// what it holds. `None` when the type has no layer.
    fn alloc_layer(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    /// Empties the outermost layer. Returns `false` when the type has no layer.
    fn clear_layer(&mut self) -> bool {
        false
    }

    /// Resets to the zero value.
    fn reset(&mut self);

    /// `omitempty` emptiness: `false`, `0`, `""`, empty collections, `None`.
    fn is_empty_value(&self) -> bool;

    fn encode_value(&self) -> Result<Value>;

    /// Decodes a wire value into `self`, nested records honouring `options`.
    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()>;

    /// The record this value is, or holds behind `Option`/`Box` layers.
    fn embedded(&self) -> Option<&dyn Record> {
        None
    }

    /// Like [`Reflect::embedded`], allocating `Option` layers on the way.
    fn embedded_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn shape() -> Shape {
                    Shape::Scalar(stringify!($ty))
                }

                fn reset(&mut self) {
                    *self = <$ty>::default();
                }

                fn is_empty_value(&self) -> bool {
                    *self == <$ty>::default()
                }

                fn encode_value(&self) -> Result<Value> {
                    self.serialize(ValueSerializer)
                }

                fn decode_value(&mut self, value: Value, _options: &Options) -> Result<()> {
                    // null into a plain scalar is a no-op
                    if !value.is_null() {
                        *self = <$ty>::deserialize(ValueDeserializer::new(value))?;
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_reflect_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, String);

impl Reflect for Value {
    fn shape() -> Shape {
        Shape::Dynamic("Value")
    }

    fn reset(&mut self) {
        *self = Value::Null;
    }

    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.is_zero(),
            Value::String(s) => s.is_empty(),
            Value::Array(arr) => arr.is_empty(),
            Value::Object(obj) => obj.is_empty(),
        }
    }

    fn encode_value(&self) -> Result<Value> {
        Ok(self.clone())
    }

    fn decode_value(&mut self, value: Value, _options: &Options) -> Result<()> {
        *self = value;
        Ok(())
    }
}

impl<T: Reflect + Default> Reflect for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn layer(&self) -> Layer<'_> {
        match self {
            Some(inner) => Layer::Present(inner as &dyn Reflect),
            None => Layer::Empty,
        }
    }

    fn alloc_layer(&mut self) -> Option<&mut dyn Reflect> {
        Some(self.get_or_insert_with(T::default) as &mut dyn Reflect)
    }

    fn clear_layer(&mut self) -> bool {
        *self = None;
        true
    }

    fn reset(&mut self) {
        *self = None;
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn encode_value(&self) -> Result<Value> {
        match self {
            Some(inner) => inner.encode_value(),
            None => Ok(Value::Null),
        }
    }

    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default)
            .decode_value(value, options)
    }

    fn embedded(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(|inner| inner.embedded())
    }

    fn embedded_mut(&mut self) -> Option<&mut dyn Record> {
        self.get_or_insert_with(T::default).embedded_mut()
    }
}

impl<T: Reflect + Default> Reflect for Box<T> {
    fn shape() -> Shape {
        Shape::Boxed(Box::new(T::shape()))
    }

    fn layer(&self) -> Layer<'_> {
        (**self).layer()
    }

    fn alloc_layer(&mut self) -> Option<&mut dyn Reflect> {
        (**self).alloc_layer()
    }

    fn clear_layer(&mut self) -> bool {
        (**self).clear_layer()
    }

    fn reset(&mut self) {
        **self = T::default();
    }

    // a box always owns a value, like a non-nil pointer
    fn is_empty_value(&self) -> bool {
        false
    }

    fn encode_value(&self) -> Result<Value> {
        (**self).encode_value()
    }

    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()> {
        (**self).decode_value(value, options)
    }

    fn embedded(&self) -> Option<&dyn Record> {
        (**self).embedded()
    }

    fn embedded_mut(&mut self) -> Option<&mut dyn Record> {
        (**self).embedded_mut()
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn shape() -> Shape {
        Shape::Seq(Box::new(T::shape()))
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn encode_value(&self) -> Result<Value> {
        self.iter()
            .map(Reflect::encode_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()> {
        match value {
            Value::Null => {
                self.clear();
                Ok(())
            }
            Value::Array(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                for item in items {
                    let mut element = T::default();
                    element.decode_value(item, options)?;
                    decoded.push(element);
                }
                *self = decoded;
                Ok(())
            }
            other => Err(Error::type_mismatch("array", other.kind())),
        }
    }
}

fn decode_entries<T: Reflect + Default>(
    value: Value,
    options: &Options,
) -> Result<Option<Vec<(String, T)>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, item) in map {
                let mut element = T::default();
                element.decode_value(item, options)?;
                entries.push((key, element));
            }
            Ok(Some(entries))
        }
        other => Err(Error::type_mismatch("object", other.kind())),
    }
}

impl<T: Reflect + Default> Reflect for BTreeMap<String, T> {
    fn shape() -> Shape {
        Shape::Map(Box::new(T::shape()))
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn encode_value(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.len());
        for (key, item) in self {
            map.insert(key.clone(), item.encode_value()?);
        }
        Ok(Value::Object(map))
    }

    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()> {
        *self = decode_entries(value, options)?
            .unwrap_or_default()
            .into_iter()
            .collect();
        Ok(())
    }
}

impl<T: Reflect + Default> Reflect for HashMap<String, T> {
    fn shape() -> Shape {
        Shape::Map(Box::new(T::shape()))
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    // sorted so the output is deterministic
    fn encode_value(&self) -> Result<Value> {
        let mut keys: Vec<&String> = self.keys().collect();
        keys.sort();
        let mut map = Map::with_capacity(self.len());
        for key in keys {
            if let Some(item) = self.get(key) {
                map.insert(key.clone(), item.encode_value()?);
            }
        }
        Ok(Value::Object(map))
    }

    fn decode_value(&mut self, value: Value, options: &Options) -> Result<()> {
        *self = decode_entries(value, options)?
            .unwrap_or_default()
            .into_iter()
            .collect();
        Ok(())
    }
}
