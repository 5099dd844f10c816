//! Deterministic schema-driven fixture generation.
//!
//! This crate walks a schema tree depth-first and produces a mock value for
//! every node. Custom generators can override any node they match, chosen by
//! structural kind, custom type identity, and the path from the root. Nodes
//! no generator claims fall back to built-in producers driven by a seeded
//! RNG, so the same seed, generators, and schema always yield the same
//! fixture.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Closed schema trees of strings, numbers, booleans, dates, objects,
//!   arrays, optionals, enums, literals, and opaque custom types
//! - Generators registered in order, with later registrations taking
//!   precedence
//! - Path-aware filters that match a field name at any depth
//! - Configurable default ranges loaded from JSON
//!
//! # Example
//!
//! ```
//! use schema_fixture::{Fixture, Generator, SchemaKind, SchemaNode, Value};
//!
//! let schema = SchemaNode::object([
//!     ("name", SchemaNode::string()),
//!     ("nested", SchemaNode::object([("totalVisits", SchemaNode::int())])),
//! ]);
//! let visits = Generator::for_kind(SchemaKind::Number)
//!     .filter(|ctx| ctx.path().ends_with_field("totalVisits"))
//!     .output(|ctx| Ok(Value::from(ctx.rng().next_int(0, 25))));
//!
//! let fixture = Fixture::with_seed(38).extend([visits]);
//! let value = fixture.generate(&schema).expect("generation succeeds");
//!
//! assert_eq!(value.keys(), ["name", "nested"]);
//! assert_eq!(value, fixture.generate(&schema).expect("generation succeeds"));
//! ```

pub mod demo;
mod engine;
mod error;
mod generator;
mod path;
mod policy;
mod rng;
mod schema;
mod value;

pub use engine::{Fixture, ProduceContext, Session};
pub use error::{ConfigError, GenerationError};
pub use generator::{Generator, GeneratorBuilder, GeneratorRegistry, MatchContext};
pub use path::{Path, PathSegment};
pub use policy::{DEFAULT_MAX_DEPTH, DefaultPolicy, FixtureConfig, StringStyle};
pub use rng::FixtureRng;
pub use schema::{
    ArraySchema, CustomSchema, NumberSchema, ObjectSchema, SchemaKind, SchemaNode, StringFormat,
    StringSchema,
};
pub use value::Value;
