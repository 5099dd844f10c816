//! Schema traversal and built-in default producers.
//!
//! A [`Fixture`] holds the immutable configuration: seed, registered
//! generators, default policy, and depth limit. Every call to
//! [`Fixture::generate`] opens a fresh [`Session`] that owns the live RNG and
//! the path stack, so repeated calls with the same inputs produce identical
//! values.

use chrono::DateTime;
use fake::Fake;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Word;
use fake::locales::EN;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{debug, trace};
use uuid::Builder;

use crate::error::{ConfigError, GenerationError};
use crate::generator::{Generator, GeneratorRegistry};
use crate::path::{Path, PathSegment};
use crate::policy::{DefaultPolicy, FixtureConfig, StringStyle};
use crate::rng::FixtureRng;
use crate::schema::{ArraySchema, NumberSchema, SchemaNode, StringFormat, StringSchema};
use crate::value::Value;

/// Formatted strings drawn before a length mismatch is reported.
const FORMAT_ATTEMPTS: usize = 16;

/// Configured fixture generator.
///
/// # Example
///
/// ```
/// use schema_fixture::{Fixture, Generator, SchemaKind, SchemaNode, Value};
///
/// let schema = SchemaNode::object([
///     ("name", SchemaNode::string()),
///     ("totalVisits", SchemaNode::int()),
/// ]);
/// let fixture = Fixture::with_seed(38).extend([Generator::for_kind(SchemaKind::Number)
///     .filter(|ctx| ctx.path().ends_with_field("totalVisits"))
///     .output(|ctx| Ok(Value::from(ctx.rng().next_int(0, 25))))]);
///
/// let first = fixture.generate(&schema).expect("generated");
/// let second = fixture.generate(&schema).expect("generated");
///
/// assert_eq!(first, second);
/// let visits = first.get("totalVisits").and_then(Value::as_i64).expect("integer");
/// assert!((0..=25).contains(&visits));
/// ```
#[derive(Debug, Clone)]
pub struct Fixture {
    config: FixtureConfig,
    registry: GeneratorRegistry,
}

impl Fixture {
    /// Creates a fixture with no custom generators.
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        Self {
            config,
            registry: GeneratorRegistry::new(),
        }
    }

    /// Creates a fixture with the default policy and depth limit.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(FixtureConfig::with_seed(seed))
    }

    /// Registers generators in order; later ones take precedence over
    /// earlier ones and over anything registered before.
    #[must_use]
    pub fn extend<I>(mut self, generators: I) -> Self
    where
        I: IntoIterator<Item = Generator>,
    {
        self.registry.extend(generators);
        self
    }

    /// Replaces the default policy after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a range is inverted or the optional
    /// presence probability lies outside `[0, 1]`.
    pub fn with_policy(mut self, policy: DefaultPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        self.config.policy = policy;
        Ok(self)
    }

    /// Replaces the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Registered generators.
    #[must_use]
    pub const fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Generates one value for `schema` from a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if a custom schema has no generator, a
    /// filter or producer fails, a declared range is empty, or the schema
    /// nests deeper than the configured limit.
    pub fn generate(&self, schema: &SchemaNode) -> Result<Value, GenerationError> {
        self.session().generate(schema)
    }

    /// Opens a session seeded from the configuration.
    ///
    /// Values generated from one session continue the same RNG stream.
    #[must_use]
    pub fn session(&self) -> Session<'_> {
        Session {
            registry: &self.registry,
            policy: &self.config.policy,
            max_depth: self.config.max_depth,
            rng: FixtureRng::seed(self.config.seed),
            path: Path::root(),
        }
    }
}

/// Live state of one generation run.
#[derive(Debug)]
pub struct Session<'r> {
    registry: &'r GeneratorRegistry,
    policy: &'r DefaultPolicy,
    max_depth: usize,
    rng: FixtureRng,
    path: Path,
}

impl Session<'_> {
    /// Generates a value, continuing this session's RNG stream.
    ///
    /// # Errors
    ///
    /// See [`Fixture::generate`].
    pub fn generate(&mut self, schema: &SchemaNode) -> Result<Value, GenerationError> {
        self.visit(schema)
    }

    /// RNG state, including the number of draws taken.
    #[must_use]
    pub const fn rng(&self) -> &FixtureRng {
        &self.rng
    }

    /// Current traversal location; empty between calls.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    fn visit(&mut self, node: &SchemaNode) -> Result<Value, GenerationError> {
        if self.path.len() > self.max_depth {
            return Err(GenerationError::SchemaTooDeep {
                path: self.path.clone(),
                max_depth: self.max_depth,
            });
        }
        trace!(path = %self.path, kind = %node.kind(), "visiting schema node");

        let registry = self.registry;
        if let Some(generator) = registry.find(node, &self.path)? {
            debug!(generator = generator.label(), path = %self.path, "custom generator applied");
            let mut ctx = ProduceContext {
                session: self,
                node,
            };
            return generator.produce(&mut ctx);
        }
        self.default_value(node)
    }

    /// Visits a child with its segment pushed; the segment is popped on
    /// every exit, including errors.
    fn visit_child(
        &mut self,
        segment: PathSegment,
        node: &SchemaNode,
    ) -> Result<Value, GenerationError> {
        self.path.push(segment);
        let result = self.visit(node);
        self.path.pop();
        result
    }

    fn default_value(&mut self, node: &SchemaNode) -> Result<Value, GenerationError> {
        match node {
            SchemaNode::String(schema) => self.default_string(schema),
            SchemaNode::Number(schema) => self.default_number(schema),
            SchemaNode::Boolean => Ok(Value::Bool(self.rng.next_bool())),
            SchemaNode::Date => self.default_date(),
            SchemaNode::Object(schema) => {
                let mut fields = Vec::with_capacity(schema.fields().len());
                for (name, child) in schema.fields() {
                    let value = self.visit_child(PathSegment::Field(name.clone()), child)?;
                    fields.push((name.clone(), value));
                }
                Ok(Value::Object(fields))
            }
            SchemaNode::Array(schema) => self.default_array(schema),
            SchemaNode::Optional(inner) => {
                if self.rng.next_ratio(self.policy.optional_presence) {
                    self.visit(inner)
                } else {
                    Ok(Value::Null)
                }
            }
            SchemaNode::Enum(variants) => self
                .rng
                .pick(variants)
                .map(|variant| Value::String(variant.clone()))
                .ok_or_else(|| GenerationError::UnsupportedSchema {
                    path: self.path.clone(),
                    schema: "empty enum".to_owned(),
                }),
            SchemaNode::Literal(value) => Ok(value.clone()),
            SchemaNode::Custom(custom) => Err(GenerationError::UnsupportedSchema {
                path: self.path.clone(),
                schema: custom.name().to_owned(),
            }),
        }
    }

    fn default_string(&mut self, schema: &StringSchema) -> Result<Value, GenerationError> {
        let (min, max) = length_bounds(
            schema.declared_min_len(),
            schema.declared_max_len(),
            self.policy.string_min_len,
            self.policy.string_max_len,
        )
        .ok_or_else(|| self.invalid_bounds(schema.declared_min_len(), schema.declared_max_len()))?;

        // Formatted strings honour declared lengths only; policy lengths
        // describe plain text.
        let declared_min = schema.declared_min_len();
        let declared_max = schema.declared_max_len();
        let fits = |text: &str| {
            let len = text.chars().count();
            declared_min.is_none_or(|low| len >= low) && declared_max.is_none_or(|high| len <= high)
        };

        let mut leaf = self.rng.fork();
        let text = match schema.format() {
            StringFormat::Uuid => {
                let formatted = Builder::from_random_bytes(leaf.random())
                    .into_uuid()
                    .to_string();
                fits(&formatted).then_some(formatted)
            }
            StringFormat::Email => (0..FORMAT_ATTEMPTS).find_map(|_| {
                let formatted: String = SafeEmail(EN).fake_with_rng(&mut leaf);
                fits(&formatted).then_some(formatted)
            }),
            StringFormat::Plain => {
                let target = leaf.random_range(min..=max);
                Some(match self.policy.string_style {
                    StringStyle::Lorem => lorem_text(&mut leaf, target),
                    StringStyle::Alphanumeric => alphanumeric_text(&mut leaf, target),
                })
            }
        };
        text.map(Value::String)
            .ok_or_else(|| self.invalid_bounds(declared_min, declared_max))
    }

    fn default_number(&mut self, schema: &NumberSchema) -> Result<Value, GenerationError> {
        let (mut low, high) = int_bounds(
            schema.declared_min(),
            schema.declared_max(),
            self.policy.number_min,
            self.policy.number_max,
        )
        .ok_or_else(|| self.invalid_bounds(schema.declared_min(), schema.declared_max()))?;

        if schema.is_integer() {
            if schema.is_positive() {
                low = low.max(1);
            }
            if low > high {
                return Err(self.invalid_bounds(Some(low), Some(high)));
            }
            return Ok(Value::Int(self.rng.next_int(low, high)));
        }

        let (float_low, float_high) = float_bounds(low, high, schema.is_positive());
        if float_low > float_high {
            return Err(self.invalid_bounds(Some(float_low), Some(float_high)));
        }
        let mut leaf = self.rng.fork();
        Ok(Value::Float(leaf.random_range(float_low..=float_high)))
    }

    fn default_date(&mut self) -> Result<Value, GenerationError> {
        let low = self.policy.date_min.timestamp_millis();
        let high = self.policy.date_max.timestamp_millis();
        if low > high {
            return Err(self.invalid_bounds(
                Some(self.policy.date_min.to_rfc3339()),
                Some(self.policy.date_max.to_rfc3339()),
            ));
        }
        let millis = self.rng.next_int(low, high);
        DateTime::from_timestamp_millis(millis)
            .map(Value::Date)
            .ok_or_else(|| self.invalid_bounds(Some(low), Some(high)))
    }

    fn default_array(&mut self, schema: &ArraySchema) -> Result<Value, GenerationError> {
        let (min, max) = length_bounds(
            schema.declared_min_len(),
            schema.declared_max_len(),
            self.policy.array_min_len,
            self.policy.array_max_len,
        )
        .ok_or_else(|| self.invalid_bounds(schema.declared_min_len(), schema.declared_max_len()))?;

        let len = self.rng.next_usize(min, max);
        let mut items = Vec::with_capacity(len);
        for index in 0..len {
            items.push(self.visit_child(PathSegment::Index(index), schema.element())?);
        }
        Ok(Value::Array(items))
    }

    fn invalid_bounds<T: ToString>(&self, min: Option<T>, max: Option<T>) -> GenerationError {
        let describe = |bound: Option<T>| bound.map_or_else(|| "unset".to_owned(), |b| b.to_string());
        GenerationError::InvalidBounds {
            path: self.path.clone(),
            min: describe(min),
            max: describe(max),
        }
    }
}

/// Capabilities handed to a custom producer.
pub struct ProduceContext<'s, 'r> {
    session: &'s mut Session<'r>,
    node: &'s SchemaNode,
}

impl ProduceContext<'_, '_> {
    /// Location of the node being produced.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.session.path
    }

    /// Node being produced.
    #[must_use]
    pub const fn node(&self) -> &SchemaNode {
        self.node
    }

    /// Session RNG; every call advances the shared stream.
    pub fn rng(&mut self) -> &mut FixtureRng {
        &mut self.session.rng
    }

    /// Runs the built-in default for this node.
    ///
    /// Children are still visited through the registry, so a producer can
    /// post-process the default structure without re-implementing it.
    ///
    /// # Errors
    ///
    /// Propagates any [`GenerationError`] from the default producer.
    pub fn recurse(&mut self) -> Result<Value, GenerationError> {
        self.session.default_value(self.node)
    }

    /// Generates `schema` as a child of this node at `segment`.
    ///
    /// # Errors
    ///
    /// Propagates any [`GenerationError`] from the child.
    pub fn recurse_into(
        &mut self,
        segment: impl Into<PathSegment>,
        schema: &SchemaNode,
    ) -> Result<Value, GenerationError> {
        self.session.visit_child(segment.into(), schema)
    }

    /// Builds a [`GenerationError::Producer`] located at this node.
    #[must_use]
    pub fn reject(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::Producer {
            path: self.session.path.clone(),
            message: message.into(),
        }
    }
}

/// Resolves an inclusive length range from declared and default bounds.
///
/// When only one side is declared and it falls outside the defaults, the
/// other side moves to keep the default width. Returns `None` for an
/// inverted declared range.
fn length_bounds(
    declared_min: Option<usize>,
    declared_max: Option<usize>,
    default_min: usize,
    default_max: usize,
) -> Option<(usize, usize)> {
    let width = default_max.saturating_sub(default_min);
    let (min, max) = match (declared_min, declared_max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) if min > default_max => (min, min.saturating_add(width)),
        (Some(min), None) => (min, default_max),
        (None, Some(max)) if max < default_min => (max.saturating_sub(width), max),
        (None, Some(max)) => (default_min, max),
        (None, None) => (default_min, default_max),
    };
    (min <= max).then_some((min, max))
}

/// Integer counterpart of [`length_bounds`].
fn int_bounds(
    declared_min: Option<i64>,
    declared_max: Option<i64>,
    default_min: i64,
    default_max: i64,
) -> Option<(i64, i64)> {
    let width = default_max.saturating_sub(default_min);
    let (min, max) = match (declared_min, declared_max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) if min > default_max => (min, min.saturating_add(width)),
        (Some(min), None) => (min, default_max),
        (None, Some(max)) if max < default_min => (max.saturating_sub(width), max),
        (None, Some(max)) => (default_min, max),
        (None, None) => (default_min, default_max),
    };
    (min <= max).then_some((min, max))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "fixture bounds stay well inside the exactly representable range"
)]
fn float_bounds(low: i64, high: i64, positive: bool) -> (f64, f64) {
    let float_low = low as f64;
    if positive && float_low <= 0.0 {
        (f64::MIN_POSITIVE, high as f64)
    } else {
        (float_low, high as f64)
    }
}

/// Joins lorem words and cuts the result to exactly `target` characters.
fn lorem_text(rng: &mut FixtureRng, target: usize) -> String {
    let mut text = String::new();
    while text.chars().count() < target {
        if !text.is_empty() {
            text.push(' ');
        }
        let word: String = Word(EN).fake_with_rng(rng);
        text.push_str(&word);
    }
    let mut cut: String = text.chars().take(target).collect();
    if cut.ends_with(' ') {
        cut.pop();
        cut.push(char::from(rng.sample(Alphanumeric)).to_ascii_lowercase());
    }
    cut
}

fn alphanumeric_text(rng: &mut FixtureRng, target: usize) -> String {
    (0..target)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::schema::CustomSchema;

    #[rstest]
    #[case::defaults(None, None, (4, 24))]
    #[case::declared_both(Some(2), Some(3), (2, 3))]
    #[case::max_below_defaults(None, Some(2), (0, 2))]
    #[case::max_inside_defaults(None, Some(10), (4, 10))]
    #[case::min_above_defaults(Some(40), None, (40, 60))]
    #[case::min_inside_defaults(Some(6), None, (6, 24))]
    fn resolves_length_bounds(
        #[case] min: Option<usize>,
        #[case] max: Option<usize>,
        #[case] expected: (usize, usize),
    ) {
        assert_eq!(length_bounds(min, max, 4, 24), Some(expected));
    }

    #[test]
    fn inverted_declared_lengths_are_rejected() {
        assert_eq!(length_bounds(Some(5), Some(2), 4, 24), None);
    }

    #[rstest]
    #[case::defaults(None, None, (0, 1000))]
    #[case::negative_max(None, Some(-10), (-1010, -10))]
    #[case::large_min(Some(5000), None, (5000, 6000))]
    #[case::declared_both(Some(0), Some(25), (0, 25))]
    fn resolves_int_bounds(
        #[case] min: Option<i64>,
        #[case] max: Option<i64>,
        #[case] expected: (i64, i64),
    ) {
        assert_eq!(int_bounds(min, max, 0, 1000), Some(expected));
    }

    #[test]
    fn positive_float_bounds_exclude_zero() {
        let (low, high) = float_bounds(0, 10, true);

        assert!(low > 0.0);
        assert!((10.0..=10.0).contains(&high));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(7)]
    #[case(24)]
    fn lorem_text_has_exact_length(#[case] target: usize) {
        let mut rng = FixtureRng::seed(5);

        for _ in 0..20 {
            let text = lorem_text(&mut rng, target);
            assert_eq!(text.chars().count(), target, "unexpected length: {text:?}");
            assert!(!text.ends_with(' '));
        }
    }

    #[test]
    fn alphanumeric_text_uses_ascii_alphanumerics() {
        let mut rng = FixtureRng::seed(5);

        let text = alphanumeric_text(&mut rng, 32);

        assert_eq!(text.len(), 32);
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn path_is_restored_after_failure() {
        let fixture = Fixture::with_seed(1);
        let schema = SchemaNode::object([(
            "outer",
            SchemaNode::object([("px", SchemaNode::from(CustomSchema::new("px", |_| true)))]),
        )]);
        let mut session = fixture.session();

        let result = session.generate(&schema);

        assert!(matches!(
            result,
            Err(GenerationError::UnsupportedSchema { .. })
        ));
        assert!(session.path().is_empty());
    }

    #[test]
    fn inverted_policy_dates_report_bounds() {
        let defaults = DefaultPolicy::default();
        let policy = DefaultPolicy {
            date_min: defaults.date_max,
            date_max: defaults.date_min,
            ..defaults
        };
        let fixture = Fixture::new(FixtureConfig {
            policy,
            ..FixtureConfig::with_seed(1)
        });

        let result = fixture.generate(&SchemaNode::date());

        assert!(matches!(
            result,
            Err(GenerationError::InvalidBounds { ref min, .. }) if min.starts_with("2030")
        ));
    }

    #[test]
    fn fixture_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Fixture>();
    }

    #[test]
    fn session_continues_rng_stream() {
        let fixture = Fixture::with_seed(3);
        let mut session = fixture.session();

        let first = session.generate(&SchemaNode::int()).expect("generated");
        let second = session.generate(&SchemaNode::int()).expect("generated");

        assert_eq!(session.rng().draws(), 2);
        assert_eq!(first, fixture.generate(&SchemaNode::int()).expect("generated"));
        assert!(second.as_i64().is_some());
    }
}
