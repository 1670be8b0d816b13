//! Navigation cursors over a JSON value tree.
//!
//! Every path role comes in two modes selected at root construction:
//! - **Actual** wraps a real `serde_json::Value` and enforces strict kind
//!   checks on every navigation step.
//! - **Dummy** never touches real data; it hands back placeholders and records
//!   the shape of each navigation call into a probe tree, from which a
//!   [`SerializerDescriptor`] is derived.
//!
//! The same caller closure runs unmodified in both modes; only the root path
//! implementation is swapped. Paths are created per navigation call, live for
//! one (de)serialization, and never cross threads.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::{DescriptorKind, SerializerDescriptor};
use crate::error::{Error, NodeKind, Result};

pub mod array;
pub mod object;
pub mod primitive;
pub mod string;

pub use array::{ArrayPath, ArrayPathNullable};
pub use object::{ObjectPath, ObjectPathNullable};
pub use primitive::{
    BooleanPath, BooleanPathNullable, NumberPath, NumberPathNullable, PrimitivePath,
    PrimitivePathNullable,
};
pub use string::{StringPath, StringPathNullable};

// ------------------------------ probe tree -------------------------------- //

pub(crate) type SharedProbe = Rc<RefCell<ProbeNode>>;

/// One node of the shape recorded by a Dummy traversal.
#[derive(Debug)]
pub(crate) struct ProbeNode {
    pub(crate) optional: bool,
    pub(crate) shape: ProbeShape,
}

#[derive(Debug)]
pub(crate) enum ProbeShape {
    /// Fetched but never cast to a node kind.
    Unset,
    Object {
        members: IndexMap<String, SharedProbe>,
    },
    Array {
        element: SharedProbe,
    },
    Primitive(PrimitiveShape),
    Multiple {
        cases: Vec<SharedProbe>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrimitiveShape {
    Unrefined,
    String,
    Number,
    Boolean,
}

impl ProbeShape {
    fn name(&self) -> &'static str {
        match self {
            ProbeShape::Unset => "element",
            ProbeShape::Object { .. } => "object",
            ProbeShape::Array { .. } => "array",
            ProbeShape::Primitive(PrimitiveShape::Unrefined) => "primitive",
            ProbeShape::Primitive(PrimitiveShape::String) => "string",
            ProbeShape::Primitive(PrimitiveShape::Number) => "number",
            ProbeShape::Primitive(PrimitiveShape::Boolean) => "boolean",
            ProbeShape::Multiple { .. } => "multiple",
        }
    }
}

pub(crate) fn new_probe(optional: bool) -> SharedProbe {
    Rc::new(RefCell::new(ProbeNode {
        optional,
        shape: ProbeShape::Unset,
    }))
}

/// First cast lazily sets the shape; repeating the same cast is a no-op; a
/// different cast on an already-set probe is a `ConflictingShape` error.
fn probe_cast(
    probe: &SharedProbe,
    requested: &'static str,
    make: impl FnOnce() -> ProbeShape,
) -> Result<()> {
    let mut node = probe.borrow_mut();
    match &node.shape {
        ProbeShape::Unset => {
            node.shape = make();
            Ok(())
        }
        current if current.name() == requested => Ok(()),
        current => Err(Error::ConflictingShape {
            current: current.name(),
            requested,
        }),
    }
}

pub(crate) fn probe_cast_object(probe: &SharedProbe) -> Result<()> {
    probe_cast(probe, "object", || ProbeShape::Object {
        members: IndexMap::new(),
    })
}

pub(crate) fn probe_cast_array(probe: &SharedProbe) -> Result<()> {
    probe_cast(probe, "array", || ProbeShape::Array {
        element: new_probe(false),
    })
}

pub(crate) fn probe_cast_primitive(probe: &SharedProbe) -> Result<()> {
    let mut node = probe.borrow_mut();
    match &node.shape {
        ProbeShape::Unset => {
            node.shape = ProbeShape::Primitive(PrimitiveShape::Unrefined);
            Ok(())
        }
        ProbeShape::Primitive(_) => Ok(()),
        current => Err(Error::ConflictingShape {
            current: current.name(),
            requested: "primitive",
        }),
    }
}

pub(crate) fn probe_cast_multiple(probe: &SharedProbe) -> Result<()> {
    probe_cast(probe, "multiple", || ProbeShape::Multiple { cases: Vec::new() })
}

/// Narrow a primitive probe to one concrete leaf kind.
pub(crate) fn probe_refine_primitive(probe: &SharedProbe, leaf: PrimitiveShape) -> Result<()> {
    let mut node = probe.borrow_mut();
    match &node.shape {
        ProbeShape::Unset | ProbeShape::Primitive(PrimitiveShape::Unrefined) => {
            node.shape = ProbeShape::Primitive(leaf);
            Ok(())
        }
        ProbeShape::Primitive(current) if *current == leaf => Ok(()),
        current => Err(Error::ConflictingShape {
            current: current.name(),
            requested: ProbeShape::Primitive(leaf).name(),
        }),
    }
}

/// Remembered child slot for an object member; created on first access.
/// A required access downgrades an earlier nullable one: the member stays
/// optional only while every access to it is nullable.
pub(crate) fn probe_member(
    probe: &SharedProbe,
    member: &str,
    optional: bool,
) -> Result<SharedProbe> {
    let mut node = probe.borrow_mut();
    match &mut node.shape {
        ProbeShape::Object { members } => {
            let child = members
                .entry(member.to_string())
                .or_insert_with(|| new_probe(optional));
            if !optional {
                child.borrow_mut().optional = false;
            }
            Ok(child.clone())
        }
        current => Err(Error::ConflictingShape {
            current: current.name(),
            requested: "object",
        }),
    }
}

pub(crate) fn probe_array_element(probe: &SharedProbe) -> Result<SharedProbe> {
    let node = probe.borrow();
    match &node.shape {
        ProbeShape::Array { element } => Ok(element.clone()),
        current => Err(Error::ConflictingShape {
            current: current.name(),
            requested: "array",
        }),
    }
}

fn probe_push_case(probe: &SharedProbe, case: SharedProbe) {
    if let ProbeShape::Multiple { cases } = &mut probe.borrow_mut().shape {
        cases.push(case);
    }
}

/// Convert the recorded probe tree into an immutable descriptor.
pub(crate) fn descriptor_of(probe: &SharedProbe) -> SerializerDescriptor {
    let node = probe.borrow();
    let kind = match &node.shape {
        ProbeShape::Unset => DescriptorKind::Element,
        ProbeShape::Object { members } => DescriptorKind::Object {
            properties: members
                .iter()
                .map(|(name, child)| (name.clone(), descriptor_of(child)))
                .collect(),
        },
        ProbeShape::Array { element } => DescriptorKind::Array {
            element_type: Box::new(descriptor_of(element)),
        },
        ProbeShape::Primitive(PrimitiveShape::Unrefined) => DescriptorKind::Primitive,
        ProbeShape::Primitive(PrimitiveShape::String) => DescriptorKind::String,
        ProbeShape::Primitive(PrimitiveShape::Number) => DescriptorKind::Number,
        ProbeShape::Primitive(PrimitiveShape::Boolean) => DescriptorKind::Boolean,
        ProbeShape::Multiple { cases } => DescriptorKind::Multiple {
            valid_types: cases.iter().map(descriptor_of).collect(),
        },
    };
    SerializerDescriptor {
        optional: node.optional,
        kind,
    }
}

// ------------------------------ element path ------------------------------ //

/// The root navigation cursor: a JSON value of any kind.
#[derive(Clone)]
pub struct ElementPath<'a> {
    repr: ElementRepr<'a>,
}

#[derive(Clone)]
enum ElementRepr<'a> {
    Actual(&'a Value),
    Dummy(SharedProbe),
}

/// Predicates available to [`ElementPath::multiple`] cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePredicate {
    IsObject,
    IsPrimitive,
    IsNumber,
}

impl CasePredicate {
    fn matches(&self, value: &Value) -> bool {
        match self {
            CasePredicate::IsObject => value.is_object(),
            CasePredicate::IsPrimitive => {
                matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
            }
            CasePredicate::IsNumber => value.is_number(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CasePredicate::IsObject => "object",
            CasePredicate::IsPrimitive => "primitive",
            CasePredicate::IsNumber => "number",
        }
    }
}

/// One `(predicate, mapper)` case for [`ElementPath::multiple`].
pub type Case<'c, 'a, T> = (CasePredicate, Box<dyn Fn(ElementPath<'a>) -> Result<T> + 'c>);

impl<'a> ElementPath<'a> {
    /// Root over a real JSON value.
    pub fn actual(value: &'a Value) -> Self {
        Self {
            repr: ElementRepr::Actual(value),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: ElementRepr::Dummy(probe),
        }
    }

    /// The raw JSON value (Actual), or a placeholder null (Dummy).
    pub fn get(&self) -> Cow<'a, Value> {
        match &self.repr {
            ElementRepr::Actual(value) => Cow::Borrowed(*value),
            ElementRepr::Dummy(_) => Cow::Owned(Value::Null),
        }
    }

    pub fn get_as_object_path(&self) -> Result<ObjectPath<'a>> {
        match &self.repr {
            ElementRepr::Actual(value) => match value {
                Value::Object(map) => Ok(ObjectPath::actual(map)),
                other => Err(shape_mismatch(NodeKind::Object, other)),
            },
            ElementRepr::Dummy(probe) => {
                probe_cast_object(probe)?;
                Ok(ObjectPath::dummy(probe.clone()))
            }
        }
    }

    pub fn get_as_array_path(&self) -> Result<ArrayPath<'a>> {
        match &self.repr {
            ElementRepr::Actual(value) => match value {
                Value::Array(items) => Ok(ArrayPath::actual(items)),
                other => Err(shape_mismatch(NodeKind::Array, other)),
            },
            ElementRepr::Dummy(probe) => {
                probe_cast_array(probe)?;
                Ok(ArrayPath::dummy(probe.clone()))
            }
        }
    }

    pub fn get_as_primitive_path(&self) -> Result<PrimitivePath<'a>> {
        match &self.repr {
            ElementRepr::Actual(value) => match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                    Ok(PrimitivePath::actual(value))
                }
                other => Err(Error::ShapeMismatch {
                    expected: "primitive".to_string(),
                    found: NodeKind::of(other),
                }),
            },
            ElementRepr::Dummy(probe) => {
                probe_cast_primitive(probe)?;
                Ok(PrimitivePath::dummy(probe.clone()))
            }
        }
    }

    /// Dispatch over an ordered list of `(predicate, mapper)` cases.
    ///
    /// Actual mode runs the first mapper whose predicate matches the real
    /// value. Dummy mode runs *every* mapper against an independent probe (so
    /// each possible shape is captured as one of the `multiple` cases) and
    /// returns the first mapper result that succeeded.
    pub fn multiple<T>(&self, cases: Vec<Case<'_, 'a, T>>) -> Result<T> {
        match &self.repr {
            ElementRepr::Actual(value) => {
                for (predicate, map) in &cases {
                    if predicate.matches(value) {
                        return map(ElementPath::actual(value));
                    }
                }
                Err(Error::ShapeMismatch {
                    expected: cases
                        .iter()
                        .map(|(p, _)| p.name())
                        .collect::<Vec<_>>()
                        .join(" | "),
                    found: NodeKind::of(value),
                })
            }
            ElementRepr::Dummy(probe) => {
                probe_cast_multiple(probe)?;
                let mut first_ok = None;
                let mut last_err = None;
                for (_, map) in &cases {
                    let case_probe = new_probe(false);
                    let outcome = map(ElementPath::dummy(case_probe.clone()));
                    // the case shape is kept even when the mapper failed
                    probe_push_case(probe, case_probe);
                    match outcome {
                        Ok(value) if first_ok.is_none() => first_ok = Some(value),
                        Ok(_) => {}
                        Err(error) => last_err = Some(error),
                    }
                }
                first_ok.ok_or_else(|| {
                    last_err.unwrap_or(Error::ShapeMismatch {
                        expected: "at least one case".to_string(),
                        found: NodeKind::Null,
                    })
                })
            }
        }
    }

    /// Sum-type decode keyed by a discriminator string embedded in the payload.
    ///
    /// `discriminator` navigates from this element to the discriminator string;
    /// `mapper` decodes the payload for the matching item. Dummy mode
    /// synthesizes one sub-path per known discriminator and unions the shapes
    /// the same way `multiple` does.
    pub fn polymorphic<I, T>(
        &self,
        items: &IndexMap<String, I>,
        discriminator: impl Fn(ElementPath<'a>) -> Result<String>,
        mapper: impl Fn(&str, &I, ElementPath<'a>) -> Result<T>,
    ) -> Result<T> {
        match &self.repr {
            ElementRepr::Actual(_) => {
                let tag = discriminator(self.clone())?;
                let item = items.get(&tag).ok_or_else(|| Error::UnknownVariant {
                    discriminator: tag.clone(),
                    known: items.keys().cloned().collect(),
                })?;
                mapper(&tag, item, self.clone())
            }
            ElementRepr::Dummy(probe) => {
                probe_cast_multiple(probe)?;
                let mut first_ok = None;
                let mut last_err = None;
                for (tag, item) in items {
                    let case_probe = new_probe(false);
                    let case_path = ElementPath::dummy(case_probe.clone());
                    let outcome = discriminator(case_path.clone())
                        .and_then(|_| mapper(tag, item, case_path));
                    probe_push_case(probe, case_probe);
                    match outcome {
                        Ok(value) if first_ok.is_none() => first_ok = Some(value),
                        Ok(_) => {}
                        Err(error) => last_err = Some(error),
                    }
                }
                first_ok.ok_or_else(|| {
                    last_err.unwrap_or(Error::UnknownVariant {
                        discriminator: String::new(),
                        known: Vec::new(),
                    })
                })
            }
        }
    }
}

fn shape_mismatch(expected: NodeKind, found: &Value) -> Error {
    Error::ShapeMismatch {
        expected: expected.to_string(),
        found: NodeKind::of(found),
    }
}

// -------------------------- nullable element path -------------------------- //

/// An element that may be absent; JSON `null` and absence collapse to the same
/// "not present" state (the two are deliberately not distinguished).
#[derive(Clone)]
pub struct ElementPathNullable<'a> {
    repr: NullableRepr<'a>,
}

#[derive(Clone)]
enum NullableRepr<'a> {
    Actual(Option<&'a Value>),
    Dummy(SharedProbe),
}

impl<'a> ElementPathNullable<'a> {
    pub(crate) fn actual(value: Option<&'a Value>) -> Self {
        Self {
            repr: NullableRepr::Actual(value.filter(|v| !v.is_null())),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: NullableRepr::Dummy(probe),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self.repr, NullableRepr::Actual(Some(_)))
    }

    /// Run `f` against the element if present.
    ///
    /// Dummy mode runs `f` once to record the shape but reports "not present",
    /// so value-dependent caller logic sees the absent branch.
    pub fn map<T>(&self, f: impl FnOnce(ElementPath<'a>) -> Result<T>) -> Result<Option<T>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => f(ElementPath::actual(value)).map(Some),
            NullableRepr::Actual(None) => Ok(None),
            NullableRepr::Dummy(probe) => {
                f(ElementPath::dummy(probe.clone()))?;
                Ok(None)
            }
        }
    }

    pub fn get_as_object_path_nullable(&self) -> Result<ObjectPathNullable<'a>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::Object(map) => Ok(ObjectPathNullable::actual(Some(map))),
                other => Err(shape_mismatch(NodeKind::Object, other)),
            },
            NullableRepr::Actual(None) => Ok(ObjectPathNullable::actual(None)),
            NullableRepr::Dummy(probe) => {
                probe_cast_object(probe)?;
                Ok(ObjectPathNullable::dummy(probe.clone()))
            }
        }
    }

    pub fn get_as_array_path_nullable(&self) -> Result<ArrayPathNullable<'a>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::Array(items) => Ok(ArrayPathNullable::actual(Some(items))),
                other => Err(shape_mismatch(NodeKind::Array, other)),
            },
            NullableRepr::Actual(None) => Ok(ArrayPathNullable::actual(None)),
            NullableRepr::Dummy(probe) => {
                probe_cast_array(probe)?;
                Ok(ArrayPathNullable::dummy(probe.clone()))
            }
        }
    }

    pub fn get_as_primitive_path_nullable(&self) -> Result<PrimitivePathNullable<'a>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                    Ok(PrimitivePathNullable::actual(Some(value)))
                }
                other => Err(Error::ShapeMismatch {
                    expected: "primitive".to_string(),
                    found: NodeKind::of(other),
                }),
            },
            NullableRepr::Actual(None) => Ok(PrimitivePathNullable::actual(None)),
            NullableRepr::Dummy(probe) => {
                probe_cast_primitive(probe)?;
                Ok(PrimitivePathNullable::dummy(probe.clone()))
            }
        }
    }
}

// --------------------------------- tests ---------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actual_casts_enforce_node_kind() {
        let value = json!({"a": 1});
        let path = ElementPath::actual(&value);
        assert!(path.get_as_object_path().is_ok());
        assert!(matches!(
            path.get_as_array_path(),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            path.get_as_primitive_path(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn dummy_repeated_same_cast_is_allowed() {
        let root = new_probe(false);
        let path = ElementPath::dummy(root.clone());
        path.get_as_object_path().unwrap();
        path.get_as_object_path().unwrap();
        assert!(matches!(
            descriptor_of(&root).kind,
            DescriptorKind::Object { .. }
        ));
    }

    #[test]
    fn dummy_conflicting_cast_is_an_error() {
        let root = new_probe(false);
        let path = ElementPath::dummy(root);
        path.get_as_object_path().unwrap();
        assert!(matches!(
            path.get_as_array_path(),
            Err(Error::ConflictingShape {
                current: "object",
                requested: "array"
            })
        ));
    }

    #[test]
    fn multiple_actual_runs_first_matching_case() {
        let value = json!(42);
        let path = ElementPath::actual(&value);
        let got: i64 = path
            .multiple(vec![
                (
                    CasePredicate::IsObject,
                    Box::new(|p| p.get_as_object_path()?.get_i64("n")),
                ),
                (
                    CasePredicate::IsNumber,
                    Box::new(|p| {
                        Ok(p.get_as_primitive_path()?.get_as_number_path()?.get_i64())
                    }),
                ),
            ])
            .unwrap();
        assert_eq!(got, 42);
    }

    #[test]
    fn multiple_actual_with_no_matching_case_fails() {
        let value = json!([1, 2]);
        let path = ElementPath::actual(&value);
        let got: Result<i64> = path.multiple(vec![(
            CasePredicate::IsNumber,
            Box::new(|p| Ok(p.get_as_primitive_path()?.get_as_number_path()?.get_i64())),
        )]);
        assert!(matches!(got, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn multiple_dummy_records_every_case() {
        let root = new_probe(false);
        let path = ElementPath::dummy(root.clone());
        let _: i64 = path
            .multiple(vec![
                (
                    CasePredicate::IsObject,
                    Box::new(|p| p.get_as_object_path()?.get_i64("n")),
                ),
                (
                    CasePredicate::IsNumber,
                    Box::new(|p| {
                        Ok(p.get_as_primitive_path()?.get_as_number_path()?.get_i64())
                    }),
                ),
            ])
            .unwrap();
        let descriptor = descriptor_of(&root);
        match descriptor.kind {
            DescriptorKind::Multiple { valid_types } => {
                assert_eq!(valid_types.len(), 2);
                assert!(matches!(valid_types[0].kind, DescriptorKind::Object { .. }));
                assert!(matches!(valid_types[1].kind, DescriptorKind::Number));
            }
            other => panic!("expected multiple, got {other:?}"),
        }
    }

    #[test]
    fn nullable_collapses_null_and_absent() {
        let value = json!(null);
        assert!(!ElementPathNullable::actual(Some(&value)).is_present());
        assert!(!ElementPathNullable::actual(None).is_present());
        let real = json!("x");
        assert!(ElementPathNullable::actual(Some(&real)).is_present());
    }
}
