//! Custom generators and the registry that orders them.
//!
//! A [`Generator`] pairs a matcher with a producer. The matcher is made of a
//! scope (a structural kind, one specific custom type, or anything) and an
//! optional filter over the node and its path. The [`GeneratorRegistry`]
//! consults generators from the most recently registered to the oldest, so
//! later registrations override earlier ones.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::engine::ProduceContext;
use crate::error::GenerationError;
use crate::path::Path;
use crate::schema::{CustomSchema, SchemaKind, SchemaNode};
use crate::value::Value;

type Filter = dyn Fn(&MatchContext<'_>) -> Result<bool, String> + Send + Sync;

type Producer =
    dyn Fn(&mut ProduceContext<'_, '_>) -> Result<Value, GenerationError> + Send + Sync;

/// What a filter can inspect when deciding whether a generator applies.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    node: &'a SchemaNode,
    path: &'a Path,
}

impl<'a> MatchContext<'a> {
    pub(crate) const fn new(node: &'a SchemaNode, path: &'a Path) -> Self {
        Self { node, path }
    }

    /// Node being generated.
    #[must_use]
    pub const fn node(&self) -> &'a SchemaNode {
        self.node
    }

    /// Structural kind of the node.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        self.node.kind()
    }

    /// Location of the node.
    #[must_use]
    pub const fn path(&self) -> &'a Path {
        self.path
    }
}

fn shared_filter<F>(filter: F) -> Arc<Filter>
where
    F: Fn(&MatchContext<'_>) -> Result<bool, String> + Send + Sync + 'static,
{
    Arc::new(filter)
}

#[derive(Debug, Clone)]
enum Scope {
    Any,
    Kind(SchemaKind),
    Custom(CustomSchema),
}

impl Scope {
    fn admits(&self, node: &SchemaNode) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(kind) => node.kind() == *kind,
            Self::Custom(custom) => node
                .as_custom()
                .is_some_and(|candidate| candidate.same_as(custom)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Any => "any".to_owned(),
            Self::Kind(kind) => kind.to_string(),
            Self::Custom(custom) => format!("custom:{}", custom.name()),
        }
    }
}

/// Partially built generator; finish it with [`GeneratorBuilder::output`].
#[derive(Clone)]
pub struct GeneratorBuilder {
    label: Option<String>,
    scope: Scope,
    filter: Option<Arc<Filter>>,
}

impl GeneratorBuilder {
    const fn new(scope: Scope) -> Self {
        Self {
            label: None,
            scope,
            filter: None,
        }
    }

    /// Sets the label reported in logs and errors.
    #[must_use]
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Narrows the generator with an infallible predicate.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&MatchContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(shared_filter(move |ctx| Ok(filter(ctx))));
        self
    }

    /// Narrows the generator with a predicate that may fail.
    ///
    /// A failure aborts generation with [`GenerationError::GeneratorMatch`].
    #[must_use]
    pub fn try_filter<F, E>(mut self, filter: F) -> Self
    where
        F: Fn(&MatchContext<'_>) -> Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.filter = Some(shared_filter(move |ctx| {
            filter(ctx).map_err(|err| err.to_string())
        }));
        self
    }

    /// Supplies the producer and finishes the generator.
    #[must_use]
    pub fn output<F>(self, producer: F) -> Generator
    where
        F: Fn(&mut ProduceContext<'_, '_>) -> Result<Value, GenerationError>
            + Send
            + Sync
            + 'static,
    {
        let label = self.label.unwrap_or_else(|| self.scope.describe());
        Generator {
            label,
            scope: self.scope,
            filter: self.filter,
            producer: Arc::new(producer),
        }
    }
}

/// A matcher and producer pair that overrides default generation.
///
/// # Example
///
/// ```
/// use schema_fixture::{Generator, SchemaKind, Value};
///
/// let visits = Generator::for_kind(SchemaKind::Number)
///     .named("total-visits")
///     .filter(|ctx| ctx.path().ends_with_field("totalVisits"))
///     .output(|ctx| Ok(Value::from(ctx.rng().next_int(0, 25))));
///
/// assert_eq!(visits.label(), "total-visits");
/// ```
#[derive(Clone)]
pub struct Generator {
    label: String,
    scope: Scope,
    filter: Option<Arc<Filter>>,
    producer: Arc<Producer>,
}

impl Generator {
    /// Starts a generator considered only for nodes of `kind`.
    #[must_use]
    pub const fn for_kind(kind: SchemaKind) -> GeneratorBuilder {
        GeneratorBuilder::new(Scope::Kind(kind))
    }

    /// Starts a generator considered only for this custom type.
    #[must_use]
    pub fn for_custom(schema: &CustomSchema) -> GeneratorBuilder {
        GeneratorBuilder::new(Scope::Custom(schema.clone()))
    }

    /// Starts a generator considered for every node; its filter decides.
    #[must_use]
    pub const fn any() -> GeneratorBuilder {
        GeneratorBuilder::new(Scope::Any)
    }

    /// Label reported in logs and errors.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether this generator applies to `node` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GeneratorMatch`] if the filter fails.
    pub fn matches(&self, node: &SchemaNode, path: &Path) -> Result<bool, GenerationError> {
        if !self.scope.admits(node) {
            return Ok(false);
        }
        let Some(filter) = &self.filter else {
            return Ok(true);
        };
        filter(&MatchContext::new(node, path)).map_err(|message| GenerationError::GeneratorMatch {
            path: path.clone(),
            generator: self.label.clone(),
            message,
        })
    }

    pub(crate) fn produce(
        &self,
        ctx: &mut ProduceContext<'_, '_>,
    ) -> Result<Value, GenerationError> {
        (self.producer)(ctx)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("label", &self.label)
            .field("scope", &self.scope)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

/// Ordered collection of generators; newer registrations take precedence.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Generator>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Adds a generator ahead of every existing one.
    pub fn register(&mut self, generator: Generator) {
        self.generators.push(generator);
    }

    /// Registers each generator in order; the last one has top precedence.
    pub fn extend<I>(&mut self, generators: I)
    where
        I: IntoIterator<Item = Generator>,
    {
        self.generators.extend(generators);
    }

    /// Number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Finds the most recently registered generator matching the node.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GeneratorMatch`] as soon as a filter fails;
    /// older generators are not consulted.
    pub fn find(
        &self,
        node: &SchemaNode,
        path: &Path,
    ) -> Result<Option<&Generator>, GenerationError> {
        for generator in self.generators.iter().rev() {
            if generator.matches(node, path)? {
                trace!(generator = %generator.label, %path, "generator matched");
                return Ok(Some(generator));
            }
        }
        Ok(None)
    }
}
