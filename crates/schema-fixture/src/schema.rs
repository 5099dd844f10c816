//! Schema descriptors consumed by the engine.
//!
//! A [`SchemaNode`] is a closed tree describing the shape of a value. The
//! engine reads it but never changes it. Opaque, predicate-only types are
//! modelled by [`CustomSchema`]; they have no structural decomposition, so a
//! generator must be registered for them.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Structural kind of a schema node, exposed to generator filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Text values.
    String,
    /// Integer or floating point values.
    Number,
    /// Boolean values.
    Boolean,
    /// Timestamps.
    Date,
    /// Ordered field mappings.
    Object,
    /// Homogeneous sequences.
    Array,
    /// A value that may be absent.
    Optional,
    /// One of a fixed set of strings.
    Enum,
    /// A single fixed value.
    Literal,
    /// A predicate-only type.
    Custom,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
            Self::Array => "array",
            Self::Optional => "optional",
            Self::Enum => "enum",
            Self::Literal => "literal",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Shape of a generated string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringFormat {
    /// Free text.
    #[default]
    Plain,
    /// A hyphenated UUID.
    Uuid,
    /// An email address.
    Email,
}

/// String constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSchema {
    min_len: Option<usize>,
    max_len: Option<usize>,
    format: StringFormat,
}

impl StringSchema {
    /// Creates an unconstrained string schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_len: None,
            max_len: None,
            format: StringFormat::Plain,
        }
    }

    /// Requires at least `len` characters.
    #[must_use]
    pub const fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Allows at most `len` characters.
    #[must_use]
    pub const fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Generates UUID strings.
    #[must_use]
    pub const fn uuid(mut self) -> Self {
        self.format = StringFormat::Uuid;
        self
    }

    /// Generates email addresses.
    #[must_use]
    pub const fn email(mut self) -> Self {
        self.format = StringFormat::Email;
        self
    }

    /// Declared minimum length.
    #[must_use]
    pub const fn declared_min_len(&self) -> Option<usize> {
        self.min_len
    }

    /// Declared maximum length.
    #[must_use]
    pub const fn declared_max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Declared format.
    #[must_use]
    pub const fn format(&self) -> StringFormat {
        self.format
    }
}

/// Numeric constraints.
///
/// Bounds are inclusive. `positive` excludes zero and negatives on top of
/// any declared minimum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberSchema {
    integer: bool,
    positive: bool,
    min: Option<i64>,
    max: Option<i64>,
}

impl NumberSchema {
    /// Creates an unconstrained floating point schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            integer: false,
            positive: false,
            min: None,
            max: None,
        }
    }

    /// Restricts values to integers.
    #[must_use]
    pub const fn int(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Restricts values to strictly positive numbers.
    #[must_use]
    pub const fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Returns `true` for integer schemas.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.integer
    }

    /// Returns `true` when zero and negatives are excluded.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// Declared lower bound.
    #[must_use]
    pub const fn declared_min(&self) -> Option<i64> {
        self.min
    }

    /// Declared upper bound.
    #[must_use]
    pub const fn declared_max(&self) -> Option<i64> {
        self.max
    }
}

/// Ordered object fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, SchemaNode)>,
}

impl ObjectSchema {
    /// Creates an object with no fields.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field; declaration order is generation order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.fields.push((name.into(), schema.into()));
        self
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &[(String, SchemaNode)] {
        &self.fields
    }
}

/// Array element schema and length bounds.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Box<SchemaNode>,
    min_len: Option<usize>,
    max_len: Option<usize>,
}

impl ArraySchema {
    /// Creates an array of `element` with policy-driven length.
    #[must_use]
    pub fn of(element: impl Into<SchemaNode>) -> Self {
        Self {
            element: Box::new(element.into()),
            min_len: None,
            max_len: None,
        }
    }

    /// Requires at least `len` elements.
    #[must_use]
    pub const fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Allows at most `len` elements.
    #[must_use]
    pub const fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Element schema.
    #[must_use]
    pub fn element(&self) -> &SchemaNode {
        &self.element
    }

    /// Declared minimum length.
    #[must_use]
    pub const fn declared_min_len(&self) -> Option<usize> {
        self.min_len
    }

    /// Declared maximum length.
    #[must_use]
    pub const fn declared_max_len(&self) -> Option<usize> {
        self.max_len
    }
}

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A predicate-only type with no structural decomposition.
///
/// Clones share identity: a generator registered for one handle matches
/// every clone of it, and nothing else.
///
/// # Example
///
/// ```
/// use schema_fixture::{CustomSchema, Value};
///
/// let px = CustomSchema::new("px", |value| {
///     value
///         .as_str()
///         .and_then(|text| text.strip_suffix("px"))
///         .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
/// });
///
/// assert!(px.check(&Value::from("100px")));
/// assert!(!px.check(&Value::from("100em")));
/// assert!(px.same_as(&px.clone()));
/// ```
#[derive(Clone)]
pub struct CustomSchema {
    name: String,
    predicate: Arc<Predicate>,
}

impl CustomSchema {
    /// Creates a custom type with a descriptive name and validation predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Descriptive name used in errors and logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the validation predicate.
    #[must_use]
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Returns `true` when both handles refer to the same custom type.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl fmt::Debug for CustomSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A node in a schema tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Text leaf.
    String(StringSchema),
    /// Numeric leaf.
    Number(NumberSchema),
    /// Boolean leaf.
    Boolean,
    /// Timestamp leaf.
    Date,
    /// Ordered field mapping.
    Object(ObjectSchema),
    /// Homogeneous sequence.
    Array(ArraySchema),
    /// Possibly absent value.
    Optional(Box<SchemaNode>),
    /// One of a fixed set of strings.
    Enum(Vec<String>),
    /// A single fixed value.
    Literal(Value),
    /// Predicate-only type.
    Custom(CustomSchema),
}

impl SchemaNode {
    /// Unconstrained string.
    #[must_use]
    pub const fn string() -> Self {
        Self::String(StringSchema::new())
    }

    /// Unconstrained floating point number.
    #[must_use]
    pub const fn number() -> Self {
        Self::Number(NumberSchema::new())
    }

    /// Unconstrained integer.
    #[must_use]
    pub const fn int() -> Self {
        Self::Number(NumberSchema::new().int())
    }

    /// Boolean.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::Boolean
    }

    /// Timestamp.
    #[must_use]
    pub const fn date() -> Self {
        Self::Date
    }

    /// Object built from `(name, schema)` pairs in order.
    ///
    /// # Example
    ///
    /// ```
    /// use schema_fixture::{SchemaKind, SchemaNode};
    ///
    /// let person = SchemaNode::object([
    ///     ("name", SchemaNode::string()),
    ///     ("age", SchemaNode::int()),
    /// ]);
    ///
    /// assert_eq!(person.kind(), SchemaKind::Object);
    /// ```
    #[must_use]
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        let schema = fields
            .into_iter()
            .fold(ObjectSchema::new(), |schema, (name, node)| {
                schema.field(name, node)
            });
        Self::Object(schema)
    }

    /// Array of `element` with policy-driven length.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array(ArraySchema::of(element))
    }

    /// Optional wrapper.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Enumeration of string variants.
    #[must_use]
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(variants.into_iter().map(Into::into).collect())
    }

    /// Fixed value.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Structural kind of this node.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        match self {
            Self::String(_) => SchemaKind::String,
            Self::Number(_) => SchemaKind::Number,
            Self::Boolean => SchemaKind::Boolean,
            Self::Date => SchemaKind::Date,
            Self::Object(_) => SchemaKind::Object,
            Self::Array(_) => SchemaKind::Array,
            Self::Optional(_) => SchemaKind::Optional,
            Self::Enum(_) => SchemaKind::Enum,
            Self::Literal(_) => SchemaKind::Literal,
            Self::Custom(_) => SchemaKind::Custom,
        }
    }

    /// Returns the custom type handle for [`SchemaNode::Custom`].
    #[must_use]
    pub const fn as_custom(&self) -> Option<&CustomSchema> {
        match self {
            Self::Custom(custom) => Some(custom),
            _ => None,
        }
    }
}

impl From<StringSchema> for SchemaNode {
    fn from(schema: StringSchema) -> Self {
        Self::String(schema)
    }
}

impl From<NumberSchema> for SchemaNode {
    fn from(schema: NumberSchema) -> Self {
        Self::Number(schema)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(schema: ArraySchema) -> Self {
        Self::Array(schema)
    }
}

impl From<CustomSchema> for SchemaNode {
    fn from(schema: CustomSchema) -> Self {
        Self::Custom(schema)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SchemaNode::string(), SchemaKind::String)]
    #[case(SchemaNode::int(), SchemaKind::Number)]
    #[case(SchemaNode::boolean(), SchemaKind::Boolean)]
    #[case(SchemaNode::date(), SchemaKind::Date)]
    #[case(SchemaNode::object([("a", SchemaNode::string())]), SchemaKind::Object)]
    #[case(SchemaNode::array(SchemaNode::string()), SchemaKind::Array)]
    #[case(SchemaNode::optional(SchemaNode::string()), SchemaKind::Optional)]
    #[case(SchemaNode::enumeration(["a", "b"]), SchemaKind::Enum)]
    #[case(SchemaNode::literal("fixed"), SchemaKind::Literal)]
    #[case(SchemaNode::from(CustomSchema::new("any", |_| true)), SchemaKind::Custom)]
    fn reports_structural_kind(#[case] node: SchemaNode, #[case] expected: SchemaKind) {
        assert_eq!(node.kind(), expected);
    }

    #[test]
    fn object_keeps_declaration_order() {
        let schema = ObjectSchema::new()
            .field("zeta", SchemaNode::string())
            .field("alpha", SchemaNode::int())
            .field("mid", SchemaNode::boolean());

        let names: Vec<_> = schema.fields().iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn custom_identity_is_by_handle_not_name() {
        let first = CustomSchema::new("px", |_| true);
        let twin = CustomSchema::new("px", |_| true);

        assert!(first.same_as(&first.clone()));
        assert!(!first.same_as(&twin));
    }

    #[test]
    fn number_builders_record_constraints() {
        let schema = NumberSchema::new().int().positive().max(25);

        assert!(schema.is_integer());
        assert!(schema.is_positive());
        assert_eq!(schema.declared_min(), None);
        assert_eq!(schema.declared_max(), Some(25));
    }

    #[test]
    fn kind_displays_lowercase() {
        assert_eq!(SchemaKind::Optional.to_string(), "optional");
    }
}
