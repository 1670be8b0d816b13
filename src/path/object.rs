//! Object paths: member lookup, typed convenience getters, and map collection.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::parse::{
    ChannelAddress, EnumNames, SemanticVersion, StringParser, StringParserChannelAddress,
    StringParserDateTime, StringParserEnum, StringParserLocalDate, StringParserLocalTime,
    StringParserSemanticVersion, StringParserString, StringParserUuid,
};
use crate::path::{
    probe_member, ArrayPath, ArrayPathNullable, BooleanPathNullable, ElementPath,
    ElementPathNullable, NumberPath, NumberPathNullable, PrimitivePath, PrimitivePathNullable,
    SharedProbe, StringPath,
};
use crate::serializer::JsonSerializer;

/// A JSON object. Every member read is either strict (`get*`, missing member
/// is an error) or nullable (`get_nullable*` and the `*_or_default`/`*_or_none`
/// families, absence and JSON null fall through).
#[derive(Clone)]
pub struct ObjectPath<'a> {
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Actual(&'a serde_json::Map<String, Value>),
    /// Probe whose shape is already `Object`.
    Dummy(SharedProbe),
}

impl<'a> ObjectPath<'a> {
    pub(crate) fn actual(map: &'a serde_json::Map<String, Value>) -> Self {
        Self {
            repr: Repr::Actual(map),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: Repr::Dummy(probe),
        }
    }

    // ---------------------------- raw members ----------------------------- //

    /// Strict member access; absence is a `MissingMember` error carrying the
    /// sibling keys.
    pub fn get(&self, member: &str) -> Result<ElementPath<'a>> {
        match &self.repr {
            Repr::Actual(map) => map.get(member).map(ElementPath::actual).ok_or_else(|| {
                Error::MissingMember {
                    member: member.to_string(),
                    available: map.keys().cloned().collect(),
                }
            }),
            Repr::Dummy(probe) => Ok(ElementPath::dummy(probe_member(probe, member, false)?)),
        }
    }

    /// Nullable member access; absence and JSON null both read as not present.
    pub fn get_nullable(&self, member: &str) -> Result<ElementPathNullable<'a>> {
        match &self.repr {
            Repr::Actual(map) => Ok(ElementPathNullable::actual(map.get(member))),
            Repr::Dummy(probe) => Ok(ElementPathNullable::dummy(probe_member(
                probe, member, true,
            )?)),
        }
    }

    // ------------------------ structural shortcuts ------------------------ //

    pub fn get_object_path(&self, member: &str) -> Result<ObjectPath<'a>> {
        self.get(member)?.get_as_object_path()
    }

    pub fn get_array_path(&self, member: &str) -> Result<ArrayPath<'a>> {
        self.get(member)?.get_as_array_path()
    }

    pub fn get_primitive_path(&self, member: &str) -> Result<PrimitivePath<'a>> {
        self.get(member)?.get_as_primitive_path()
    }

    pub fn get_nullable_object_path(&self, member: &str) -> Result<ObjectPathNullable<'a>> {
        self.get_nullable(member)?.get_as_object_path_nullable()
    }

    pub fn get_nullable_array_path(&self, member: &str) -> Result<ArrayPathNullable<'a>> {
        self.get_nullable(member)?.get_as_array_path_nullable()
    }

    pub fn get_nullable_primitive_path(&self, member: &str) -> Result<PrimitivePathNullable<'a>> {
        self.get_nullable(member)?.get_as_primitive_path_nullable()
    }

    // -------------------------- string members ---------------------------- //

    pub fn get_string_path<'p, P: StringParser>(
        &self,
        member: &str,
        parser: &'p P,
    ) -> Result<StringPath<'p, P>> {
        self.get_primitive_path(member)?.get_as_string_path(parser)
    }

    pub fn get_string_parsed<P>(&self, member: &str, parser: &P) -> Result<P::Output>
    where
        P: StringParser,
        P::Output: Clone,
    {
        let path = self.get_string_path(member, parser)?;
        let value = path.get()?.clone();
        Ok(value)
    }

    pub fn get_string_parsed_or_none<P>(&self, member: &str, parser: &P) -> Result<Option<P::Output>>
    where
        P: StringParser,
        P::Output: Clone,
    {
        let path = self
            .get_nullable_primitive_path(member)?
            .get_as_string_path_nullable(parser)?;
        let value = path.get_or_none()?.cloned();
        Ok(value)
    }

    pub fn get_string(&self, member: &str) -> Result<String> {
        self.get_string_parsed(member, &StringParserString)
    }

    pub fn get_string_or_none(&self, member: &str) -> Result<Option<String>> {
        self.get_string_parsed_or_none(member, &StringParserString)
    }

    pub fn get_uuid(&self, member: &str) -> Result<Uuid> {
        self.get_string_parsed(member, &StringParserUuid)
    }

    pub fn get_uuid_or_none(&self, member: &str) -> Result<Option<Uuid>> {
        self.get_string_parsed_or_none(member, &StringParserUuid)
    }

    pub fn get_enum<E: EnumNames>(&self, member: &str) -> Result<E> {
        self.get_string_parsed(member, &StringParserEnum::<E>::new())
    }

    pub fn get_enum_or_none<E: EnumNames>(&self, member: &str) -> Result<Option<E>> {
        self.get_string_parsed_or_none(member, &StringParserEnum::<E>::new())
    }

    pub fn get_semantic_version(&self, member: &str) -> Result<SemanticVersion> {
        self.get_string_parsed(member, &StringParserSemanticVersion)
    }

    pub fn get_semantic_version_or_none(&self, member: &str) -> Result<Option<SemanticVersion>> {
        self.get_string_parsed_or_none(member, &StringParserSemanticVersion)
    }

    pub fn get_channel_address(&self, member: &str) -> Result<ChannelAddress> {
        self.get_string_parsed(member, &StringParserChannelAddress)
    }

    pub fn get_channel_address_or_none(&self, member: &str) -> Result<Option<ChannelAddress>> {
        self.get_string_parsed_or_none(member, &StringParserChannelAddress)
    }

    pub fn get_date_time(&self, member: &str) -> Result<DateTime<FixedOffset>> {
        self.get_string_parsed(member, &StringParserDateTime::new())
    }

    pub fn get_date_time_with_format(
        &self,
        member: &str,
        format: &str,
    ) -> Result<DateTime<FixedOffset>> {
        self.get_string_parsed(member, &StringParserDateTime::with_format(format))
    }

    pub fn get_date_time_or_none(&self, member: &str) -> Result<Option<DateTime<FixedOffset>>> {
        self.get_string_parsed_or_none(member, &StringParserDateTime::new())
    }

    pub fn get_local_date(&self, member: &str) -> Result<NaiveDate> {
        self.get_string_parsed(member, &StringParserLocalDate::new())
    }

    pub fn get_local_date_with_format(&self, member: &str, format: &str) -> Result<NaiveDate> {
        self.get_string_parsed(member, &StringParserLocalDate::with_format(format))
    }

    pub fn get_local_time(&self, member: &str) -> Result<NaiveTime> {
        self.get_string_parsed(member, &StringParserLocalTime::new())
    }

    pub fn get_local_time_with_format(&self, member: &str, format: &str) -> Result<NaiveTime> {
        self.get_string_parsed(member, &StringParserLocalTime::with_format(format))
    }

    // -------------------------- number members ---------------------------- //

    pub fn get_number_path(&self, member: &str) -> Result<NumberPath<'a>> {
        self.get_primitive_path(member)?.get_as_number_path()
    }

    pub fn get_nullable_number_path(&self, member: &str) -> Result<NumberPathNullable<'a>> {
        self.get_nullable_primitive_path(member)?
            .get_as_number_path_nullable()
    }

    pub fn get_f64(&self, member: &str) -> Result<f64> {
        Ok(self.get_number_path(member)?.get_f64())
    }

    pub fn get_f32(&self, member: &str) -> Result<f32> {
        Ok(self.get_number_path(member)?.get_f32())
    }

    pub fn get_i64(&self, member: &str) -> Result<i64> {
        Ok(self.get_number_path(member)?.get_i64())
    }

    pub fn get_i32(&self, member: &str) -> Result<i32> {
        Ok(self.get_number_path(member)?.get_i32())
    }

    pub fn get_i16(&self, member: &str) -> Result<i16> {
        Ok(self.get_number_path(member)?.get_i16())
    }

    pub fn get_i8(&self, member: &str) -> Result<i8> {
        Ok(self.get_number_path(member)?.get_i8())
    }

    pub fn get_f64_or_default(&self, member: &str, default: f64) -> Result<f64> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_f64_or_default(default))
    }

    pub fn get_f32_or_default(&self, member: &str, default: f32) -> Result<f32> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_f32_or_default(default))
    }

    pub fn get_i64_or_default(&self, member: &str, default: i64) -> Result<i64> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_i64_or_default(default))
    }

    pub fn get_i32_or_default(&self, member: &str, default: i32) -> Result<i32> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_i32_or_default(default))
    }

    pub fn get_i16_or_default(&self, member: &str, default: i16) -> Result<i16> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_i16_or_default(default))
    }

    pub fn get_i8_or_default(&self, member: &str, default: i8) -> Result<i8> {
        Ok(self
            .get_nullable_number_path(member)?
            .get_i8_or_default(default))
    }

    // -------------------------- boolean members --------------------------- //

    pub fn get_bool(&self, member: &str) -> Result<bool> {
        Ok(self
            .get_primitive_path(member)?
            .get_as_boolean_path()?
            .get())
    }

    pub fn get_nullable_boolean_path(&self, member: &str) -> Result<BooleanPathNullable> {
        self.get_nullable_primitive_path(member)?
            .get_as_boolean_path_nullable()
    }

    pub fn get_bool_or_default(&self, member: &str, default: bool) -> Result<bool> {
        Ok(self
            .get_nullable_boolean_path(member)?
            .get_or_default(default))
    }

    // ---------------------------- aggregates ------------------------------ //

    /// Visit every member as a `(key, value)` pair, with keys run through
    /// `key_parser`. Probe mode records nothing per-member (member names are
    /// data, not shape) and yields an empty collection.
    pub fn collect<P, V>(
        &self,
        key_parser: &P,
        mut each: impl FnMut(StringPath<'_, P>, ElementPath<'a>) -> Result<V>,
    ) -> Result<Vec<V>>
    where
        P: StringParser,
    {
        match &self.repr {
            Repr::Actual(map) => {
                let mut out = Vec::with_capacity(map.len());
                for (key, value) in map.iter() {
                    out.push(each(
                        StringPath::new(key.clone(), key_parser),
                        ElementPath::actual(value),
                    )?);
                }
                Ok(out)
            }
            Repr::Dummy(_) => Ok(Vec::new()),
        }
    }

    /// Decode a member through another serializer, nesting its shape here.
    pub fn get_serialized<T>(&self, member: &str, serializer: &JsonSerializer<T>) -> Result<T> {
        serializer.deserialize_path(self.get(member)?)
    }
}

/// An object that may be absent.
#[derive(Clone)]
pub struct ObjectPathNullable<'a> {
    repr: NullableRepr<'a>,
}

#[derive(Clone)]
enum NullableRepr<'a> {
    Actual(Option<&'a serde_json::Map<String, Value>>),
    Dummy(SharedProbe),
}

impl<'a> ObjectPathNullable<'a> {
    pub(crate) fn actual(map: Option<&'a serde_json::Map<String, Value>>) -> Self {
        Self {
            repr: NullableRepr::Actual(map),
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

    /// Run `f` against the object if present. Probe mode records the shape of
    /// `f` but reports "not present".
    pub fn map<T>(&self, f: impl FnOnce(ObjectPath<'a>) -> Result<T>) -> Result<Option<T>> {
        match &self.repr {
            NullableRepr::Actual(Some(map)) => f(ObjectPath::actual(map)).map(Some),
            NullableRepr::Actual(None) => Ok(None),
            NullableRepr::Dummy(probe) => {
                f(ObjectPath::dummy(probe.clone()))?;
                Ok(None)
            }
        }
    }
}
