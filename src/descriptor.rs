//! The derived schema tree describing a serializer's expected JSON shape.
//!
//! A descriptor is a pure function of the serializer definition, never of any
//! particular input: it is captured by running the deserializer once against a
//! recording probe, so recomputing it always yields a structurally identical
//! tree. Property order follows closure access order (`IndexMap`), which is
//! deterministic for a fixed definition.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One node of the derived schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerDescriptor {
    pub optional: bool,
    pub kind: DescriptorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    Object {
        properties: IndexMap<String, SerializerDescriptor>,
    },
    Array {
        element_type: Box<SerializerDescriptor>,
    },
    /// A primitive that was never narrowed to string/number/boolean.
    Primitive,
    String,
    Number,
    Boolean,
    /// An element that was fetched raw and never cast to a node kind.
    Element,
    /// A union of shapes, produced by `multiple` or `polymorphic`.
    Multiple {
        valid_types: Vec<SerializerDescriptor>,
    },
}

impl DescriptorKind {
    fn type_name(&self) -> &'static str {
        match self {
            DescriptorKind::Object { .. } => "object",
            DescriptorKind::Array { .. } => "array",
            DescriptorKind::Primitive => "primitive",
            DescriptorKind::String => "string",
            DescriptorKind::Number => "number",
            DescriptorKind::Boolean => "boolean",
            DescriptorKind::Element => "element",
            DescriptorKind::Multiple { .. } => "multiple",
        }
    }
}

impl SerializerDescriptor {
    pub fn required(kind: DescriptorKind) -> Self {
        Self {
            optional: false,
            kind,
        }
    }

    /// Wire shape:
    /// `{ "type": ..., "optional": bool, "properties"? | "elementType"? | "validTypes"? }`
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert("type".into(), Value::from(self.kind.type_name()));
        out.insert("optional".into(), Value::from(self.optional));
        match &self.kind {
            DescriptorKind::Object { properties } => {
                let mut props = serde_json::Map::new();
                for (name, child) in properties {
                    props.insert(name.clone(), child.to_json());
                }
                out.insert("properties".into(), Value::Object(props));
            }
            DescriptorKind::Array { element_type } => {
                out.insert("elementType".into(), element_type.to_json());
            }
            DescriptorKind::Multiple { valid_types } => {
                out.insert(
                    "validTypes".into(),
                    Value::Array(valid_types.iter().map(|t| t.to_json()).collect()),
                );
            }
            DescriptorKind::Primitive
            | DescriptorKind::String
            | DescriptorKind::Number
            | DescriptorKind::Boolean
            | DescriptorKind::Element => {}
        }
        Value::Object(out)
    }
}

impl Serialize for SerializerDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.type_name())?;
        map.serialize_entry("optional", &self.optional)?;
        match &self.kind {
            DescriptorKind::Object { properties } => {
                map.serialize_entry("properties", properties)?;
            }
            DescriptorKind::Array { element_type } => {
                map.serialize_entry("elementType", element_type)?;
            }
            DescriptorKind::Multiple { valid_types } => {
                map.serialize_entry("validTypes", valid_types)?;
            }
            _ => {}
        }
        map.end()
    }
}
