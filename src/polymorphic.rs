//! Discriminator-keyed serializer registries for sum types.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::ElementPath;
use crate::serializer::JsonSerializer;

/// One registered variant: encode-side projection plus decode-side injection,
/// both wrapping the variant's own serializer.
pub struct PolymorphicVariant<T> {
    try_serialize: Box<dyn Fn(&T) -> Option<Result<Value>> + Send + Sync>,
    deserialize: Box<dyn for<'a> Fn(ElementPath<'a>) -> Result<T> + Send + Sync>,
}

impl<T> PolymorphicVariant<T> {
    pub fn deserialize_path(&self, path: ElementPath<'_>) -> Result<T> {
        (self.deserialize)(path)
    }
}

/// A registry of variant serializers keyed by discriminator string.
///
/// Registration order is preserved; it decides both the encode probing order
/// and the case order in the derived descriptor.
pub struct PolymorphicSerializer<T> {
    variants: IndexMap<String, PolymorphicVariant<T>>,
}

pub struct PolymorphicSerializerBuilder<T> {
    variants: IndexMap<String, PolymorphicVariant<T>>,
}

impl<T: 'static> PolymorphicSerializerBuilder<T> {
    /// Register a variant under `discriminator`.
    ///
    /// `project` answers "is this value that variant?" on the encode side;
    /// `inject` lifts a decoded variant back into `T`.
    pub fn add<V: 'static>(
        mut self,
        discriminator: impl Into<String>,
        serializer: JsonSerializer<V>,
        project: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        inject: impl Fn(V) -> T + Send + Sync + 'static,
    ) -> Self {
        let encode = serializer.clone();
        let decode = serializer;
        self.variants.insert(
            discriminator.into(),
            PolymorphicVariant {
                try_serialize: Box::new(move |value| {
                    project(value).map(|variant| encode.serialize(variant))
                }),
                deserialize: Box::new(move |path| decode.deserialize_path(path).map(&inject)),
            },
        );
        self
    }

    pub fn build(self) -> PolymorphicSerializer<T> {
        PolymorphicSerializer {
            variants: self.variants,
        }
    }
}

impl<T> PolymorphicSerializer<T> {
    pub fn builder() -> PolymorphicSerializerBuilder<T> {
        PolymorphicSerializerBuilder {
            variants: IndexMap::new(),
        }
    }

    pub fn variants(&self) -> &IndexMap<String, PolymorphicVariant<T>> {
        &self.variants
    }

    /// Encode by probing registered variants in order; a value no variant
    /// claims is an `UnserializableVariant` error.
    pub fn serialize(&self, value: &T) -> Result<Value> {
        self.serialize_tagged(value).map(|(_, json)| json)
    }

    fn serialize_tagged(&self, value: &T) -> Result<(&str, Value)> {
        for (tag, variant) in &self.variants {
            if let Some(encoded) = (variant.try_serialize)(value) {
                return encoded.map(|json| (tag.as_str(), json));
            }
        }
        Err(Error::UnserializableVariant)
    }

    /// Decode by reading `discriminator_member` from the payload object and
    /// dispatching to the matching variant.
    pub fn deserialize_path(&self, path: ElementPath<'_>, discriminator_member: &str) -> Result<T> {
        path.polymorphic(
            &self.variants,
            |element| {
                element
                    .get_as_object_path()?
                    .get_string(discriminator_member)
            },
            |_tag, variant, element| variant.deserialize_path(element),
        )
    }
}

impl<T: 'static> PolymorphicSerializer<T> {
    /// Close the registry into a plain `JsonSerializer<T>` that stamps
    /// `discriminator_member` into each encoded object. A variant that already
    /// wrote the member keeps its own value.
    pub fn into_serializer(self, discriminator_member: impl Into<String>) -> JsonSerializer<T> {
        let member = discriminator_member.into();
        let registry = Arc::new(self);
        let encode_registry = registry.clone();
        let encode_member = member.clone();
        JsonSerializer::new(
            move |value: &T| {
                let (tag, mut json) = {
                    let (tag, json) = encode_registry.serialize_tagged(value)?;
                    (tag.to_string(), json)
                };
                if let Value::Object(map) = &mut json {
                    map.entry(encode_member.clone())
                        .or_insert_with(|| Value::String(tag));
                }
                Ok(json)
            },
            move |path| registry.deserialize_path(path, &member),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorKind;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Notification {
        Text(String),
        Level(i64),
    }

    fn text_serializer() -> JsonSerializer<String> {
        JsonSerializer::new(
            |text: &String| Ok(json!({"text": text})),
            |path| path.get_as_object_path()?.get_string("text"),
        )
    }

    fn level_serializer() -> JsonSerializer<i64> {
        JsonSerializer::new(
            |level: &i64| Ok(json!({"level": level})),
            |path| path.get_as_object_path()?.get_i64("level"),
        )
    }

    fn registry() -> PolymorphicSerializer<Notification> {
        PolymorphicSerializer::builder()
            .add(
                "a",
                text_serializer(),
                |n| match n {
                    Notification::Text(text) => Some(text),
                    _ => None,
                },
                Notification::Text,
            )
            .add(
                "b",
                level_serializer(),
                |n| match n {
                    Notification::Level(level) => Some(level),
                    _ => None,
                },
                Notification::Level,
            )
            .build()
    }

    #[test]
    fn round_trips_both_variants_through_the_discriminator() {
        let serializer = registry().into_serializer("kind");
        let text = Notification::Text("hello".to_string());
        let json = serializer.serialize(&text).unwrap();
        assert_eq!(json, json!({"text": "hello", "kind": "a"}));
        assert_eq!(serializer.deserialize(&json).unwrap(), text);

        let level = Notification::Level(3);
        let json = serializer.serialize(&level).unwrap();
        assert_eq!(json, json!({"level": 3, "kind": "b"}));
        assert_eq!(serializer.deserialize(&json).unwrap(), level);
    }

    #[test]
    fn unknown_discriminator_lists_the_known_tags() {
        let serializer = registry().into_serializer("kind");
        match serializer.deserialize(&json!({"kind": "c"})) {
            Err(Error::UnknownVariant {
                discriminator,
                known,
            }) => {
                assert_eq!(discriminator, "c");
                assert_eq!(known, vec!["a", "b"]);
            }
            other => panic!("expected UnknownVariant, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_discriminator_member_is_an_error() {
        let serializer = registry().into_serializer("kind");
        assert!(matches!(
            serializer.deserialize(&json!({"text": "x"})),
            Err(Error::MissingMember { .. })
        ));
    }

    #[test]
    fn encode_without_matching_variant_fails() {
        let partial = PolymorphicSerializer::<Notification>::builder()
            .add(
                "a",
                text_serializer(),
                |n| match n {
                    Notification::Text(text) => Some(text),
                    _ => None,
                },
                Notification::Text,
            )
            .build();
        assert!(matches!(
            partial.serialize(&Notification::Level(1)),
            Err(Error::UnserializableVariant)
        ));
    }

    #[test]
    fn descriptor_unions_every_registered_variant() {
        let serializer = registry().into_serializer("kind");
        match &serializer.descriptor().kind {
            DescriptorKind::Multiple { valid_types } => {
                assert_eq!(valid_types.len(), 2);
                for case in valid_types {
                    match &case.kind {
                        DescriptorKind::Object { properties } => {
                            assert!(properties.contains_key("kind"));
                        }
                        other => panic!("expected object case, got {other:?}"),
                    }
                }
                match &valid_types[0].kind {
                    DescriptorKind::Object { properties } => {
                        assert!(properties.contains_key("text"));
                    }
                    _ => unreachable!(),
                }
                match &valid_types[1].kind {
                    DescriptorKind::Object { properties } => {
                        assert!(properties.contains_key("level"));
                    }
                    _ => unreachable!(),
                }
            }
            other => panic!("expected multiple, got {other:?}"),
        }
    }

    #[test]
    fn variant_that_writes_the_member_itself_keeps_its_value() {
        let custom = PolymorphicSerializer::<Notification>::builder()
            .add(
                "a",
                JsonSerializer::new(
                    |text: &String| Ok(json!({"kind": "custom", "text": text})),
                    |path| path.get_as_object_path()?.get_string("text"),
                ),
                |n| match n {
                    Notification::Text(text) => Some(text),
                    _ => None,
                },
                Notification::Text,
            )
            .build()
            .into_serializer("kind");
        let json = custom
            .serialize(&Notification::Text("x".to_string()))
            .unwrap();
        assert_eq!(json["kind"], json!("custom"));
    }
}
