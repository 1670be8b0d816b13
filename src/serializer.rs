//! Self-describing serializers: an encode closure, a decode closure, and a
//! schema derived from the decode closure itself.

use std::sync::Arc;

use once_cell::race::OnceBox;
use serde_json::Value;
use uuid::Uuid;

use crate::descriptor::SerializerDescriptor;
use crate::error::Result;
use crate::parse::{StringParser, StringParserString, StringParserUuid};
use crate::path::{descriptor_of, new_probe, ElementPath};

/// A bidirectional JSON codec for `T`.
///
/// Cheap to clone and shareable across threads; the descriptor is computed at
/// most once per serializer and cached.
pub struct JsonSerializer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    serialize: Box<dyn Fn(&T) -> Result<Value> + Send + Sync>,
    deserialize: Box<dyn for<'a> Fn(ElementPath<'a>) -> Result<T> + Send + Sync>,
    descriptor: OnceBox<SerializerDescriptor>,
}

impl<T> Clone for JsonSerializer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> JsonSerializer<T> {
    pub fn new(
        serialize: impl Fn(&T) -> Result<Value> + Send + Sync + 'static,
        deserialize: impl for<'a> Fn(ElementPath<'a>) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                serialize: Box::new(serialize),
                deserialize: Box::new(deserialize),
                descriptor: OnceBox::new(),
            }),
        }
    }

    pub fn serialize(&self, value: &T) -> Result<Value> {
        (self.inner.serialize)(value)
    }

    pub fn deserialize(&self, json: &Value) -> Result<T> {
        self.deserialize_path(ElementPath::actual(json))
    }

    pub fn deserialize_path(&self, path: ElementPath<'_>) -> Result<T> {
        (self.inner.deserialize)(path)
    }

    /// The derived schema of this serializer's JSON shape.
    ///
    /// Computed by running the decode closure once against a recording probe.
    /// A decode closure that fails even against placeholders still yields the
    /// shape recorded up to the failure point. Concurrent first calls may race
    /// the computation; recomputing is idempotent, so whichever result is
    /// published first wins and the rest are dropped.
    pub fn descriptor(&self) -> &SerializerDescriptor {
        self.inner.descriptor.get_or_init(|| {
            let root = new_probe(false);
            if let Err(error) = (self.inner.deserialize)(ElementPath::dummy(root.clone())) {
                tracing::warn!(%error, "shape probe failed, descriptor covers the recorded prefix");
            }
            Box::new(descriptor_of(&root))
        })
    }
}

impl<T: 'static> JsonSerializer<T> {
    /// Lift this serializer to `Vec<T>` as a JSON array of its shape.
    pub fn to_list_serializer(&self) -> JsonSerializer<Vec<T>> {
        let encode = self.clone();
        let decode = self.clone();
        JsonSerializer::new(
            move |items: &Vec<T>| {
                let encoded = items
                    .iter()
                    .map(|item| encode.serialize(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(encoded))
            },
            move |path| path.get_as_array_path()?.collect_serialized(&decode),
        )
    }
}

// --------------------------- leaf serializers ------------------------------ //

pub fn string_serializer() -> JsonSerializer<String> {
    JsonSerializer::new(
        |value: &String| Ok(Value::String(value.clone())),
        |path| {
            let leaf = path
                .get_as_primitive_path()?
                .get_as_string_path(&StringParserString)?;
            let value = leaf.get()?.clone();
            Ok(value)
        },
    )
}

pub fn uuid_serializer() -> JsonSerializer<Uuid> {
    JsonSerializer::new(
        |value: &Uuid| Ok(Value::String(value.to_string())),
        |path| {
            let leaf = path
                .get_as_primitive_path()?
                .get_as_string_path(&StringParserUuid)?;
            let value = *leaf.get()?;
            Ok(value)
        },
    )
}

pub fn i64_serializer() -> JsonSerializer<i64> {
    JsonSerializer::new(
        |value: &i64| Ok(Value::from(*value)),
        |path| Ok(path.get_as_primitive_path()?.get_as_number_path()?.get_i64()),
    )
}

pub fn f64_serializer() -> JsonSerializer<f64> {
    JsonSerializer::new(
        |value: &f64| Ok(Value::from(*value)),
        |path| Ok(path.get_as_primitive_path()?.get_as_number_path()?.get_f64()),
    )
}

pub fn bool_serializer() -> JsonSerializer<bool> {
    JsonSerializer::new(
        |value: &bool| Ok(Value::Bool(*value)),
        |path| {
            Ok(path
                .get_as_primitive_path()?
                .get_as_boolean_path()?
                .get())
        },
    )
}

/// Serializer over any `StringParser` output, encoded via `Display`.
pub fn string_parsed_serializer<P>(parser: P) -> JsonSerializer<P::Output>
where
    P: StringParser + Send + Sync + 'static,
    P::Output: ToString + Clone,
{
    JsonSerializer::new(
        |value: &P::Output| Ok(Value::String(value.to_string())),
        move |path| {
            let leaf = path
                .get_as_primitive_path()?
                .get_as_string_path(&parser)?;
            let value = leaf.get()?.clone();
            Ok(value)
        },
    )
}
