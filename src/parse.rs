//! String parsers: raw string → typed value, plus one realistic example pair.
//!
//! The example pair exists for probe mode: a recording path must hand back
//! *something* usable as a raw string so that caller logic after the parse does
//! not trip over a synthetic value. The computed result is never surfaced in
//! probe mode, only the recorded shape.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::error::ParseError;

/// A non-null `(raw, value)` pair where `parse(raw) == value`.
#[derive(Debug, Clone)]
pub struct ExampleValues<T> {
    pub raw: String,
    pub value: T,
}

pub trait StringParser {
    type Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError>;

    fn example(&self) -> ExampleValues<Self::Output>;
}

// ------------------------------ identity --------------------------------- //

/// Keeps the raw string as the parsed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParserString;

impl StringParser for StringParserString {
    type Output = String;

    fn parse(&self, raw: &str) -> Result<String, ParseError> {
        Ok(raw.to_string())
    }

    fn example(&self) -> ExampleValues<String> {
        ExampleValues {
            raw: "text".to_string(),
            value: "text".to_string(),
        }
    }
}

// -------------------------------- uuid ----------------------------------- //

#[derive(Debug, Clone, Copy, Default)]
pub struct StringParserUuid;

impl StringParser for StringParserUuid {
    type Output = Uuid;

    fn parse(&self, raw: &str) -> Result<Uuid, ParseError> {
        Uuid::parse_str(raw).map_err(|e| ParseError::with_cause(raw, "Uuid", e))
    }

    fn example(&self) -> ExampleValues<Uuid> {
        ExampleValues {
            raw: "00000000-0000-0000-0000-000000000000".to_string(),
            value: Uuid::nil(),
        }
    }
}

// -------------------------------- enums ---------------------------------- //

/// Declared constant names of an enum, for parsing by name.
///
/// Names are matched case-insensitively, so `"read_only"` and `"READ_ONLY"`
/// both resolve to the same constant.
pub trait EnumNames: Sized + Clone + 'static {
    const NAMES: &'static [(&'static str, Self)];
}

pub struct StringParserEnum<E> {
    _marker: PhantomData<E>,
}

impl<E> StringParserEnum<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for StringParserEnum<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnumNames> StringParser for StringParserEnum<E> {
    type Output = E;

    fn parse(&self, raw: &str) -> Result<E, ParseError> {
        E::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(raw))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ParseError::new(raw, "enum constant"))
    }

    fn example(&self) -> ExampleValues<E> {
        // Every enum with zero constants is unparseable anyway; the first
        // declared constant is the canonical example.
        let (name, value) = &E::NAMES[0];
        ExampleValues {
            raw: (*name).to_string(),
            value: value.clone(),
        }
    }
}

// --------------------------- semantic version ----------------------------- //

/// A plain `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemanticVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, ParseError> {
        let mut parts = raw.split('.');
        let (a, b, c) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => return Err(ParseError::new(raw, "SemanticVersion")),
        };
        let parse_part = |p: &str| {
            p.parse::<u32>()
                .map_err(|e| ParseError::with_cause(raw, "SemanticVersion", e))
        };
        Ok(Self::new(parse_part(a)?, parse_part(b)?, parse_part(c)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringParserSemanticVersion;

impl StringParser for StringParserSemanticVersion {
    type Output = SemanticVersion;

    fn parse(&self, raw: &str) -> Result<SemanticVersion, ParseError> {
        raw.parse()
    }

    fn example(&self) -> ExampleValues<SemanticVersion> {
        ExampleValues {
            raw: "2024.1.1".to_string(),
            value: SemanticVersion::new(2024, 1, 1),
        }
    }
}

// --------------------------- channel address ------------------------------ //

/// A `component/channel` address, exactly two `/`-separated parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelAddress {
    pub component_id: String,
    pub channel_id: String,
}

impl ChannelAddress {
    pub fn new(component_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component_id, self.channel_id)
    }
}

impl FromStr for ChannelAddress {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, ParseError> {
        let mut parts = raw.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(component), Some(channel), None) if !component.is_empty() && !channel.is_empty() => {
                Ok(Self::new(component, channel))
            }
            _ => Err(ParseError::new(raw, "ChannelAddress")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringParserChannelAddress;

impl StringParser for StringParserChannelAddress {
    type Output = ChannelAddress;

    fn parse(&self, raw: &str) -> Result<ChannelAddress, ParseError> {
        raw.parse()
    }

    fn example(&self) -> ExampleValues<ChannelAddress> {
        ExampleValues {
            raw: "component0/ActivePower".to_string(),
            value: ChannelAddress::new("component0", "ActivePower"),
        }
    }
}

// ------------------------------ date/time -------------------------------- //

/// Zoned date-time; RFC 3339 by default, or a caller-supplied `%`-format.
#[derive(Debug, Clone, Default)]
pub struct StringParserDateTime {
    format: Option<String>,
}

impl StringParserDateTime {
    pub fn new() -> Self {
        Self { format: None }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }
}

impl StringParser for StringParserDateTime {
    type Output = DateTime<FixedOffset>;

    fn parse(&self, raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
        let parsed = match &self.format {
            None => DateTime::parse_from_rfc3339(raw),
            Some(fmt) => DateTime::parse_from_str(raw, fmt),
        };
        parsed.map_err(|e| ParseError::with_cause(raw, "DateTime", e))
    }

    fn example(&self) -> ExampleValues<DateTime<FixedOffset>> {
        let value = DateTime::parse_from_rfc3339("2024-01-15T10:30:00+00:00")
            .unwrap_or_default();
        let raw = match &self.format {
            None => value.to_rfc3339(),
            Some(fmt) => value.format(fmt).to_string(),
        };
        ExampleValues { raw, value }
    }
}

/// Calendar date; ISO `%Y-%m-%d` by default.
#[derive(Debug, Clone, Default)]
pub struct StringParserLocalDate {
    format: Option<String>,
}

impl StringParserLocalDate {
    pub fn new() -> Self {
        Self { format: None }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    fn format_str(&self) -> &str {
        self.format.as_deref().unwrap_or("%Y-%m-%d")
    }
}

impl StringParser for StringParserLocalDate {
    type Output = NaiveDate;

    fn parse(&self, raw: &str) -> Result<NaiveDate, ParseError> {
        NaiveDate::parse_from_str(raw, self.format_str())
            .map_err(|e| ParseError::with_cause(raw, "NaiveDate", e))
    }

    fn example(&self) -> ExampleValues<NaiveDate> {
        let value = NaiveDate::default(); // 1970-01-01
        ExampleValues {
            raw: value.format(self.format_str()).to_string(),
            value,
        }
    }
}

/// Wall-clock time; ISO `%H:%M:%S` by default.
#[derive(Debug, Clone, Default)]
pub struct StringParserLocalTime {
    format: Option<String>,
}

impl StringParserLocalTime {
    pub fn new() -> Self {
        Self { format: None }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    fn format_str(&self) -> &str {
        self.format.as_deref().unwrap_or("%H:%M:%S")
    }
}

impl StringParser for StringParserLocalTime {
    type Output = NaiveTime;

    fn parse(&self, raw: &str) -> Result<NaiveTime, ParseError> {
        NaiveTime::parse_from_str(raw, self.format_str())
            .map_err(|e| ParseError::with_cause(raw, "NaiveTime", e))
    }

    fn example(&self) -> ExampleValues<NaiveTime> {
        let value = NaiveTime::default(); // midnight
        ExampleValues {
            raw: value.format(self.format_str()).to_string(),
            value,
        }
    }
}

// -------------------------------- tests ---------------------------------- //
