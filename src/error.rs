//! Error taxonomy for path navigation and (de)serialization.
//!
//! Every failure surfaces synchronously as a typed `Error`; nothing is silently
//! defaulted except where a nullable accessor explicitly takes a default value.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The five JSON node kinds plus null, as seen by navigation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Boolean,
            Value::Null => NodeKind::Null,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Navigation expected one node kind, found another (object vs array vs primitive).
    #[error("expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: NodeKind },

    /// A required object member is absent. Carries the sibling keys for context.
    #[error("missing member {member:?} (available members: {available:?})")]
    MissingMember {
        member: String,
        available: Vec<String>,
    },

    /// A primitive was accessed through the wrong leaf accessor.
    #[error("expected {expected} primitive, found {found}")]
    TypeCoercion { expected: NodeKind, found: NodeKind },

    /// A `StringParser` rejected its raw input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Polymorphic decode found no serializer for the discriminator value.
    #[error("unknown discriminator {discriminator:?} (known: {known:?})")]
    UnknownVariant {
        discriminator: String,
        known: Vec<String>,
    },

    /// Polymorphic encode found no registered serializer for the value.
    #[error("no serializer registered for the given variant")]
    UnserializableVariant,

    /// A probe path was cast to one kind and then re-cast to a different one.
    /// A descriptor is the shape of one consistent code path; express genuine
    /// ambiguity through `multiple` or `polymorphic` instead.
    #[error("path already set to {current}, cannot re-cast to {requested}")]
    ConflictingShape {
        current: &'static str,
        requested: &'static str,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Raw input that a `StringParser` could not turn into its target type.
///
/// Hand-implemented (not derived) so the optional `anyhow::Error` cause can be
/// exposed through `std::error::Error::source`.
#[derive(Debug)]
pub struct ParseError {
    raw: String,
    target: &'static str,
    cause: Option<anyhow::Error>,
}

impl ParseError {
    pub fn new(raw: impl Into<String>, target: &'static str) -> Self {
        Self {
            raw: raw.into(),
            target,
            cause: None,
        }
    }

    pub fn with_cause(
        raw: impl Into<String>,
        target: &'static str,
        cause: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            raw: raw.into(),
            target,
            cause: Some(cause.into()),
        }
    }

    /// The offending raw string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Name of the type the parser was trying to produce.
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse {:?} as {}", self.raw, self.target)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_of_covers_all_shapes() {
        assert_eq!(NodeKind::of(&serde_json::json!({})), NodeKind::Object);
        assert_eq!(NodeKind::of(&serde_json::json!([])), NodeKind::Array);
        assert_eq!(NodeKind::of(&serde_json::json!("x")), NodeKind::String);
        assert_eq!(NodeKind::of(&serde_json::json!(1)), NodeKind::Number);
        assert_eq!(NodeKind::of(&serde_json::json!(true)), NodeKind::Boolean);
        assert_eq!(NodeKind::of(&serde_json::json!(null)), NodeKind::Null);
    }

    #[test]
    fn parse_error_carries_raw_and_cause() {
        let err = ParseError::with_cause("nope", "Uuid", anyhow::anyhow!("bad length"));
        assert_eq!(err.raw(), "nope");
        assert_eq!(err.target(), "Uuid");
        let msg = err.to_string();
        assert!(msg.contains("nope") && msg.contains("bad length"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
