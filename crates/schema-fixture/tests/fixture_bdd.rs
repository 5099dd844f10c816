//! Behavioural tests for schema-fixture.
//!
//! These tests validate deterministic generation, generator precedence, and
//! opaque-type handling against Gherkin scenarios.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use schema_fixture::demo::{developer_schema, pixel_generator, pixel_schema, string_generator};
use schema_fixture::{
    CustomSchema, Fixture, GenerationError, Generator, NumberSchema, SchemaKind, SchemaNode, Value,
};

/// Test world holding the schema, the configured fixture, and its output.
#[derive(Default, ScenarioState)]
struct World {
    schema: Slot<SchemaNode>,
    fixture: Slot<Fixture>,
    result: Slot<Result<Value, GenerationError>>,
    second: Slot<Value>,
}

impl World {
    fn schema(&self) -> SchemaNode {
        self.schema.get().expect("schema should be set")
    }

    fn fixture(&self) -> Fixture {
        self.fixture.get().expect("fixture should be set")
    }

    fn value(&self) -> Value {
        self.result
            .get()
            .expect("generation should have run")
            .expect("generation should succeed")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn visits_generator() -> Generator {
    Generator::for_kind(SchemaKind::Number)
        .named("total-visits")
        .filter(|ctx| ctx.path().ends_with_field("totalVisits"))
        .output(|ctx| Ok(Value::from(ctx.rng().next_int(0, 25))))
}

fn visits_field() -> SchemaNode {
    SchemaNode::from(NumberSchema::new().int().positive().min(100))
}

fn assert_visits(value: Option<&Value>) {
    let visits = value.and_then(Value::as_i64).expect("integer visits");
    assert!((0..=25).contains(&visits), "visits out of range: {visits}");
}

// ============================================================================
// Given steps
// ============================================================================

#[given("the visitor schema")]
fn the_visitor_schema(world: &World) {
    world.schema.set(SchemaNode::object([
        ("name", SchemaNode::string()),
        ("totalVisits", visits_field()),
    ]));
}

#[given("the nested visitor schema")]
fn the_nested_visitor_schema(world: &World) {
    world.schema.set(SchemaNode::object([(
        "nested",
        SchemaNode::object([("totalVisits", visits_field())]),
    )]));
}

#[given("the developer schema")]
fn the_developer_schema(world: &World) {
    world.schema.set(developer_schema(&pixel_schema()));
}

#[given("a fixture seeded with {seed:u64} and the visits generator")]
fn a_fixture_with_visits_generator(world: &World, seed: u64) {
    world
        .fixture
        .set(Fixture::with_seed(seed).extend([visits_generator()]));
}

#[given("a fixture seeded with {seed:u64} and two competing name generators")]
fn a_fixture_with_competing_generators(world: &World, seed: u64) {
    let older = Generator::for_kind(SchemaKind::String).output(|_| Ok(Value::from("older")));
    let newer = Generator::for_kind(SchemaKind::String).output(|_| Ok(Value::from("newer")));
    world
        .fixture
        .set(Fixture::with_seed(seed).extend([older, newer]));
}

#[given("a fixture seeded with {seed:u64} without a pixel generator")]
fn a_fixture_without_pixel_generator(world: &World, seed: u64) {
    world
        .fixture
        .set(Fixture::with_seed(seed).extend([string_generator()]));
}

#[given("a fixture seeded with {seed:u64} with a pixel generator")]
fn a_fixture_with_pixel_generator(world: &World, seed: u64) {
    let schema = world.schema();
    let px = find_pixel_type(&schema).expect("developer schema uses the pixel type");
    world
        .fixture
        .set(Fixture::with_seed(seed).extend([pixel_generator(&px), string_generator()]));
}

/// Finds the pixel type instance used by the developer schema.
fn find_pixel_type(schema: &SchemaNode) -> Option<CustomSchema> {
    match schema {
        SchemaNode::Object(object) => object
            .fields()
            .iter()
            .find_map(|(_, child)| find_pixel_type(child)),
        other => other.as_custom().cloned(),
    }
}

// ============================================================================
// When steps
// ============================================================================

#[when("the fixture is generated")]
fn the_fixture_is_generated(world: &World) {
    let result = world.fixture().generate(&world.schema());
    world.result.set(result);
}

#[when("the fixture is generated twice")]
fn the_fixture_is_generated_twice(world: &World) {
    let fixture = world.fixture();
    let schema = world.schema();

    let first = fixture.generate(&schema);
    let second = fixture.generate(&schema).expect("second generation");

    world.result.set(first);
    world.second.set(second);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("both fixtures are identical")]
fn both_fixtures_are_identical(world: &World) {
    let second = world.second.get().expect("second generation should be set");

    assert_eq!(world.value(), second, "generation should be deterministic");
}

#[then("total visits lie between 0 and 25")]
fn total_visits_lie_in_range(world: &World) {
    assert_visits(world.value().get("totalVisits"));
}

#[then("the nested total visits lie between 0 and 25")]
fn nested_total_visits_lie_in_range(world: &World) {
    let value = world.value();
    assert_visits(value.get("nested").and_then(|nested| nested.get("totalVisits")));
}

#[then("the name is \"{name}\"")]
fn the_name_is(world: &World, name: String) {
    assert_eq!(
        world.value().get("name").and_then(Value::as_str),
        Some(name.as_str())
    );
}

#[then("generation fails as unsupported at \"{location}\"")]
fn generation_fails_as_unsupported(world: &World, location: String) {
    match world.result.get().expect("generation should have run") {
        Err(GenerationError::UnsupportedSchema { path, schema }) => {
            assert_eq!(path.to_string(), location);
            assert_eq!(schema, "px");
        }
        other => panic!("Expected UnsupportedSchema, got: {other:?}"),
    }
}

#[then("the resolution is \"{height}\" by \"{width}\"")]
fn the_resolution_is(world: &World, height: String, width: String) {
    let value = world.value();
    let resolution = value.get("resolution").expect("resolution");

    assert_eq!(
        resolution.get("height").and_then(Value::as_str),
        Some(height.as_str())
    );
    assert_eq!(
        resolution.get("width").and_then(Value::as_str),
        Some(width.as_str())
    );
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/fixture_generation.feature",
    name = "Same seed yields identical fixtures"
)]
fn same_seed_yields_identical_fixtures(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fixture_generation.feature",
    name = "Visits generator matches nested fields"
)]
fn visits_generator_matches_nested_fields(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fixture_generation.feature",
    name = "Later generators take precedence"
)]
fn later_generators_take_precedence(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fixture_generation.feature",
    name = "Unclaimed opaque types fail with their location"
)]
fn unclaimed_opaque_types_fail(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fixture_generation.feature",
    name = "Registered pixel generator fills opaque types"
)]
fn registered_pixel_generator_fills_opaque_types(world: World) {
    let _ = world;
}
