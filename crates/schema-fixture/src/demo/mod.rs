//! Demonstration fixtures printed by the `fixture-demo` binary.
//!
//! Two schemas are generated: a *person* whose `address` and `totalVisits`
//! fields are overridden by custom generators, and a *developer* whose
//! `resolution` uses an opaque pixel type that only a registered generator
//! can fill. The binary delegates to [`render`] so the output is testable
//! without spawning a process.

mod config;

use thiserror::Error;

pub use config::{DemoSettings, load_settings};

use crate::error::{ConfigError, GenerationError};
use crate::{
    CustomSchema, Fixture, FixtureConfig, Generator, NumberSchema, SchemaKind, SchemaNode,
    StringSchema, Value,
};

/// Highest value produced by [`total_visits_generator`].
pub const MAX_TOTAL_VISITS: i64 = 25;

/// Errors surfaced while rendering the demo fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemoError {
    /// Settings could not be loaded from arguments, environment, or files.
    #[error("failed to load demo settings: {message}")]
    Settings {
        /// Loader error message.
        message: String,
    },
    /// The policy file could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// Underlying configuration error.
        #[from]
        #[source]
        source: ConfigError,
    },
    /// A fixture could not be generated.
    #[error("generation error: {source}")]
    Generation {
        /// Underlying generation error.
        #[from]
        #[source]
        source: GenerationError,
    },
    /// The fixtures could not be serialised.
    #[error("failed to serialise fixtures: {message}")]
    Serialize {
        /// Serialiser error message.
        message: String,
    },
}

/// Schema of the person fixture.
#[must_use]
pub fn person_schema() -> SchemaNode {
    SchemaNode::object([
        ("name", SchemaNode::string()),
        ("birthday", SchemaNode::date()),
        (
            "address",
            SchemaNode::object([
                ("street", SchemaNode::string()),
                ("city", SchemaNode::string()),
                ("state", SchemaNode::string()),
            ]),
        ),
        (
            "pets",
            SchemaNode::array(SchemaNode::object([
                ("name", SchemaNode::string()),
                ("breed", SchemaNode::string()),
            ])),
        ),
        (
            "totalVisits",
            SchemaNode::from(NumberSchema::new().int().positive()),
        ),
    ])
}

/// Opaque `"<digits>px"` type with no structural default.
#[must_use]
pub fn pixel_schema() -> CustomSchema {
    CustomSchema::new("px", |value| value.as_str().is_some_and(is_pixel_length))
}

/// Schema of the developer fixture, using `px` for both dimensions.
#[must_use]
pub fn developer_schema(px: &CustomSchema) -> SchemaNode {
    SchemaNode::object([
        ("name", SchemaNode::from(StringSchema::new().max_len(10))),
        (
            "resolution",
            SchemaNode::object([
                ("height", SchemaNode::from(px.clone())),
                ("width", SchemaNode::from(px.clone())),
            ]),
        ),
    ])
}

/// Replaces any number whose field is named `totalVisits` with a realistic
/// visit count, at any depth.
#[must_use]
pub fn total_visits_generator() -> Generator {
    Generator::for_kind(SchemaKind::Number)
        .named("total-visits")
        .filter(|ctx| ctx.path().ends_with_field("totalVisits"))
        .output(|ctx| Ok(Value::from(ctx.rng().next_int(0, MAX_TOTAL_VISITS))))
}

/// Replaces any object whose field is named `address` with a fixed address.
#[must_use]
pub fn address_generator() -> Generator {
    Generator::for_kind(SchemaKind::Object)
        .named("address")
        .filter(|ctx| ctx.path().ends_with_field("address"))
        .output(|_| {
            Ok(Value::object([
                ("street", Value::from("My Street")),
                ("city", Value::from("My City")),
                ("state", Value::from("My State")),
            ]))
        })
}

/// Fills every string with the same name.
#[must_use]
pub fn string_generator() -> Generator {
    Generator::for_kind(SchemaKind::String)
        .named("john-doe")
        .output(|_| Ok(Value::from("John Doe")))
}

/// Fills the pixel type with a fixed length.
#[must_use]
pub fn pixel_generator(px: &CustomSchema) -> Generator {
    Generator::for_custom(px)
        .named("pixels")
        .output(|_| Ok(Value::from("100px")))
}

/// Renders `[person, developer]` as JSON.
///
/// A `config_path` file supplies the policy and depth limit only; the seeds
/// always come from `person_seed` and `developer_seed`.
///
/// # Errors
///
/// Returns [`DemoError`] if the policy file cannot be loaded, generation
/// fails, or serialisation fails.
///
/// # Example
///
/// ```
/// use schema_fixture::demo::{DemoSettings, render};
///
/// let settings = DemoSettings {
///     person_seed: 38,
///     developer_seed: 7,
///     compact: true,
///     config_path: None,
/// };
///
/// let json = render(&settings).expect("render succeeds");
/// assert!(json.contains(r#""height":"100px""#));
/// ```
pub fn render(settings: &DemoSettings) -> Result<String, DemoError> {
    let base = match &settings.config_path {
        Some(path) => FixtureConfig::from_file(path)?,
        None => FixtureConfig::with_seed(settings.person_seed),
    };

    let person_fixture = Fixture::new(FixtureConfig {
        seed: settings.person_seed,
        ..base.clone()
    })
    .extend([address_generator(), total_visits_generator()]);
    let person = person_fixture.generate(&person_schema())?;

    let px = pixel_schema();
    let developer_fixture = Fixture::new(FixtureConfig {
        seed: settings.developer_seed,
        ..base
    })
    .extend([pixel_generator(&px), string_generator()]);
    let developer = developer_fixture.generate(&developer_schema(&px))?;

    let fixtures = Value::Array(vec![person, developer]);
    let rendered = if settings.compact {
        serde_json::to_string(&fixtures)
    } else {
        serde_json::to_string_pretty(&fixtures)
    };
    rendered.map_err(|e| DemoError::Serialize {
        message: e.to_string(),
    })
}

fn is_pixel_length(text: &str) -> bool {
    text.strip_suffix("px")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
