//! Self-describing JSON serialization combinators.
//!
//! A [`JsonSerializer`] pairs an encode closure with a decode closure written
//! against typed path cursors ([`ElementPath`], [`ObjectPath`], [`ArrayPath`],
//! and friends). The same decode closure serves two masters: run against a
//! real document it produces the typed value with strict kind checks at every
//! step, and run against a recording probe it yields a
//! [`SerializerDescriptor`] describing the JSON shape the closure expects. No
//! separate schema is ever written by hand, so the schema cannot drift from
//! the decode logic.
//!
//! ```
//! use json_probe::JsonSerializer;
//! use serde_json::json;
//!
//! #[derive(Debug, PartialEq)]
//! struct Request {
//!     app_id: String,
//!     limit: i32,
//! }
//!
//! let serializer = JsonSerializer::new(
//!     |r: &Request| Ok(json!({"appId": r.app_id, "limit": r.limit})),
//!     |path| {
//!         let obj = path.get_as_object_path()?;
//!         Ok(Request {
//!             app_id: obj.get_string("appId")?,
//!             limit: obj.get_i32_or_default("limit", 20)?,
//!         })
//!     },
//! );
//!
//! let decoded = serializer.deserialize(&json!({"appId": "timedata"})).unwrap();
//! assert_eq!(decoded, Request { app_id: "timedata".into(), limit: 20 });
//!
//! assert_eq!(serializer.descriptor().to_json(), json!({
//!     "type": "object",
//!     "optional": false,
//!     "properties": {
//!         "appId": { "type": "string", "optional": false },
//!         "limit": { "type": "number", "optional": true },
//!     },
//! }));
//! ```

pub mod descriptor;
pub mod error;
pub mod parse;
pub mod path;
pub mod polymorphic;
pub mod serializer;

pub use descriptor::{DescriptorKind, SerializerDescriptor};
pub use error::{Error, NodeKind, ParseError, Result};
pub use parse::{
    ChannelAddress, EnumNames, ExampleValues, SemanticVersion, StringParser,
    StringParserChannelAddress, StringParserDateTime, StringParserEnum, StringParserLocalDate,
    StringParserLocalTime, StringParserSemanticVersion, StringParserString, StringParserUuid,
};
pub use path::{
    ArrayPath, ArrayPathNullable, BooleanPath, BooleanPathNullable, Case, CasePredicate,
    ElementPath, ElementPathNullable, NumberPath, NumberPathNullable, ObjectPath,
    ObjectPathNullable, PrimitivePath, PrimitivePathNullable, StringPath, StringPathNullable,
};
pub use polymorphic::{PolymorphicSerializer, PolymorphicSerializerBuilder, PolymorphicVariant};
pub use serializer::{
    bool_serializer, f64_serializer, i64_serializer, string_parsed_serializer, string_serializer,
    uuid_serializer, JsonSerializer,
};
