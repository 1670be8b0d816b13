//! Primitive paths: a string/number/boolean leaf and its narrowing accessors.

use serde_json::Value;

use crate::error::{Error, NodeKind, Result};
use crate::parse::{StringParser, StringParserString};
use crate::path::{
    probe_refine_primitive, PrimitiveShape, SharedProbe, StringPath, StringPathNullable,
};

/// A JSON primitive not yet narrowed to a concrete leaf kind.
#[derive(Clone)]
pub struct PrimitivePath<'a> {
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Actual(&'a Value),
    Dummy(SharedProbe),
}

impl<'a> PrimitivePath<'a> {
    pub(crate) fn actual(value: &'a Value) -> Self {
        Self {
            repr: Repr::Actual(value),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: Repr::Dummy(probe),
        }
    }

    /// Narrow to a string leaf bound to `parser`.
    ///
    /// Strict: a number or boolean found where a string is requested is a
    /// `TypeCoercion` error, never stringified.
    pub fn get_as_string_path<'p, P: StringParser>(
        &self,
        parser: &'p P,
    ) -> Result<StringPath<'p, P>> {
        match &self.repr {
            Repr::Actual(value) => match value {
                Value::String(raw) => Ok(StringPath::new(raw.clone(), parser)),
                other => Err(coercion(NodeKind::String, other)),
            },
            Repr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::String)?;
                Ok(StringPath::new(parser.example().raw, parser))
            }
        }
    }

    pub fn get_as_number_path(&self) -> Result<NumberPath<'a>> {
        match &self.repr {
            Repr::Actual(value) => match value {
                Value::Number(number) => Ok(NumberPath {
                    repr: NumberRepr::Actual(number),
                }),
                other => Err(coercion(NodeKind::Number, other)),
            },
            Repr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::Number)?;
                Ok(NumberPath {
                    repr: NumberRepr::Dummy,
                })
            }
        }
    }

    pub fn get_as_boolean_path(&self) -> Result<BooleanPath> {
        match &self.repr {
            Repr::Actual(value) => match value {
                Value::Bool(b) => Ok(BooleanPath {
                    repr: BooleanRepr::Actual(*b),
                }),
                other => Err(coercion(NodeKind::Boolean, other)),
            },
            Repr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::Boolean)?;
                Ok(BooleanPath {
                    repr: BooleanRepr::Dummy,
                })
            }
        }
    }

    pub fn get_as_string(&self) -> Result<String> {
        let path = self.get_as_string_path(&StringParserString)?;
        Ok(path.get()?.clone())
    }
}

fn coercion(expected: NodeKind, found: &Value) -> Error {
    Error::TypeCoercion {
        expected,
        found: NodeKind::of(found),
    }
}

// -------------------------------- number ---------------------------------- //

/// A numeric leaf. Infallible accessors per host-numeric width; fractional
/// values narrow by truncation when read through an integer accessor.
#[derive(Clone)]
pub struct NumberPath<'a> {
    repr: NumberRepr<'a>,
}

#[derive(Clone)]
enum NumberRepr<'a> {
    Actual(&'a serde_json::Number),
    Dummy,
}

impl NumberPath<'_> {
    pub fn get_f64(&self) -> f64 {
        match &self.repr {
            NumberRepr::Actual(number) => number.as_f64().unwrap_or_default(),
            NumberRepr::Dummy => 0.0,
        }
    }

    pub fn get_f32(&self) -> f32 {
        self.get_f64() as f32
    }

    pub fn get_i64(&self) -> i64 {
        match &self.repr {
            NumberRepr::Actual(number) => match number.as_i64() {
                Some(i) => i,
                None => number.as_f64().unwrap_or_default() as i64,
            },
            NumberRepr::Dummy => 0,
        }
    }

    pub fn get_i32(&self) -> i32 {
        self.get_i64() as i32
    }

    pub fn get_i16(&self) -> i16 {
        self.get_i64() as i16
    }

    pub fn get_i8(&self) -> i8 {
        self.get_i64() as i8
    }
}

// -------------------------------- boolean --------------------------------- //

#[derive(Clone)]
pub struct BooleanPath {
    repr: BooleanRepr,
}

#[derive(Clone)]
enum BooleanRepr {
    Actual(bool),
    Dummy,
}

impl BooleanPath {
    /// Placeholder in probe mode is `false`.
    pub fn get(&self) -> bool {
        match self.repr {
            BooleanRepr::Actual(b) => b,
            BooleanRepr::Dummy => false,
        }
    }
}

// ------------------------------- nullables -------------------------------- //

/// A primitive that may be absent. A *present* value of the wrong leaf kind is
/// still an error; only absence and JSON null fall through to the default.
#[derive(Clone)]
pub struct PrimitivePathNullable<'a> {
    repr: NullableRepr<'a>,
}

#[derive(Clone)]
enum NullableRepr<'a> {
    Actual(Option<&'a Value>),
    Dummy(SharedProbe),
}

impl<'a> PrimitivePathNullable<'a> {
    pub(crate) fn actual(value: Option<&'a Value>) -> Self {
        Self {
            repr: NullableRepr::Actual(value),
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

    pub fn get_as_string_path_nullable<'p, P: StringParser>(
        &self,
        parser: &'p P,
    ) -> Result<StringPathNullable<'p, P>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::String(raw) => Ok(StringPathNullable::new(Some(StringPath::new(
                    raw.clone(),
                    parser,
                )))),
                other => Err(coercion(NodeKind::String, other)),
            },
            NullableRepr::Actual(None) => Ok(StringPathNullable::new(None)),
            NullableRepr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::String)?;
                Ok(StringPathNullable::new(None))
            }
        }
    }

    pub fn get_as_number_path_nullable(&self) -> Result<NumberPathNullable<'a>> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::Number(number) => Ok(NumberPathNullable {
                    repr: NullableNumberRepr::Actual(Some(number)),
                }),
                other => Err(coercion(NodeKind::Number, other)),
            },
            NullableRepr::Actual(None) => Ok(NumberPathNullable {
                repr: NullableNumberRepr::Actual(None),
            }),
            NullableRepr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::Number)?;
                Ok(NumberPathNullable {
                    repr: NullableNumberRepr::Dummy,
                })
            }
        }
    }

    pub fn get_as_boolean_path_nullable(&self) -> Result<BooleanPathNullable> {
        match &self.repr {
            NullableRepr::Actual(Some(value)) => match value {
                Value::Bool(b) => Ok(BooleanPathNullable { inner: Some(*b) }),
                other => Err(coercion(NodeKind::Boolean, other)),
            },
            NullableRepr::Actual(None) => Ok(BooleanPathNullable { inner: None }),
            NullableRepr::Dummy(probe) => {
                probe_refine_primitive(probe, PrimitiveShape::Boolean)?;
                Ok(BooleanPathNullable { inner: None })
            }
        }
    }
}

/// A numeric leaf that may be absent; accessors substitute the caller-supplied
/// default (probe mode always reports absent).
#[derive(Clone)]
pub struct NumberPathNullable<'a> {
    repr: NullableNumberRepr<'a>,
}

#[derive(Clone)]
enum NullableNumberRepr<'a> {
    Actual(Option<&'a serde_json::Number>),
    Dummy,
}

impl NumberPathNullable<'_> {
    fn present(&self) -> Option<NumberPath<'_>> {
        match &self.repr {
            NullableNumberRepr::Actual(Some(number)) => Some(NumberPath {
                repr: NumberRepr::Actual(*number),
            }),
            NullableNumberRepr::Actual(None) | NullableNumberRepr::Dummy => None,
        }
    }

    pub fn get_f64_or_default(&self, default: f64) -> f64 {
        self.present().map_or(default, |n| n.get_f64())
    }

    pub fn get_f32_or_default(&self, default: f32) -> f32 {
        self.present().map_or(default, |n| n.get_f32())
    }

    pub fn get_i64_or_default(&self, default: i64) -> i64 {
        self.present().map_or(default, |n| n.get_i64())
    }

    pub fn get_i32_or_default(&self, default: i32) -> i32 {
        self.present().map_or(default, |n| n.get_i32())
    }

    pub fn get_i16_or_default(&self, default: i16) -> i16 {
        self.present().map_or(default, |n| n.get_i16())
    }

    pub fn get_i8_or_default(&self, default: i8) -> i8 {
        self.present().map_or(default, |n| n.get_i8())
    }

    pub fn get_f64_or_none(&self) -> Option<f64> {
        self.present().map(|n| n.get_f64())
    }

    pub fn get_i64_or_none(&self) -> Option<i64> {
        self.present().map(|n| n.get_i64())
    }

    pub fn get_i32_or_none(&self) -> Option<i32> {
        self.present().map(|n| n.get_i32())
    }
}

/// A boolean leaf that may be absent (probe mode always reports absent).
#[derive(Clone)]
pub struct BooleanPathNullable {
    inner: Option<bool>,
}

impl BooleanPathNullable {
    pub fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get_or_default(&self, default: bool) -> bool {
        self.inner.unwrap_or(default)
    }

    pub fn get_or_none(&self) -> Option<bool> {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{descriptor_of, new_probe, ElementPath};
    use crate::descriptor::DescriptorKind;
    use serde_json::json;

    #[test]
    fn string_through_number_accessor_is_a_coercion_error() {
        let value = json!("12");
        let path = ElementPath::actual(&value);
        let primitive = path.get_as_primitive_path().unwrap();
        assert!(matches!(
            primitive.get_as_number_path(),
            Err(Error::TypeCoercion {
                expected: NodeKind::Number,
                found: NodeKind::String,
            })
        ));
    }

    #[test]
    fn number_through_string_accessor_is_a_coercion_error() {
        let value = json!(12);
        let path = ElementPath::actual(&value);
        let primitive = path.get_as_primitive_path().unwrap();
        assert!(matches!(
            primitive.get_as_string(),
            Err(Error::TypeCoercion { .. })
        ));
    }

    #[test]
    fn integer_narrowing_truncates_fractions() {
        let value = json!(3.9);
        let path = ElementPath::actual(&value);
        let number = path
            .get_as_primitive_path()
            .unwrap()
            .get_as_number_path()
            .unwrap();
        assert_eq!(number.get_i64(), 3);
        assert_eq!(number.get_i32(), 3);
        assert!((number.get_f64() - 3.9).abs() < f64::EPSILON);
    }

    #[test]
    fn dummy_number_leaf_reads_zero_and_records_number() {
        let root = new_probe(false);
        let path = ElementPath::dummy(root.clone());
        let number = path
            .get_as_primitive_path()
            .unwrap()
            .get_as_number_path()
            .unwrap();
        assert_eq!(number.get_i64(), 0);
        assert!((number.get_f64()).abs() < f64::EPSILON);
        assert!(matches!(descriptor_of(&root).kind, DescriptorKind::Number));
    }

    #[test]
    fn dummy_leaf_conflict_between_string_and_number() {
        let root = new_probe(false);
        let path = ElementPath::dummy(root);
        let primitive = path.get_as_primitive_path().unwrap();
        primitive.get_as_number_path().unwrap();
        assert!(matches!(
            primitive.get_as_string(),
            Err(Error::ConflictingShape {
                current: "number",
                requested: "string",
            })
        ));
    }

    #[test]
    fn boolean_leaf_reads_value_and_dummy_reads_false() {
        let value = json!(true);
        let path = ElementPath::actual(&value);
        assert!(path
            .get_as_primitive_path()
            .unwrap()
            .get_as_boolean_path()
            .unwrap()
            .get());

        let root = new_probe(false);
        let dummy = ElementPath::dummy(root);
        assert!(!dummy
            .get_as_primitive_path()
            .unwrap()
            .get_as_boolean_path()
            .unwrap()
            .get());
    }
}
