//! Behaviour-driven tests for command construction and the wire codec.

use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

use crate::construct::TaggedCommand;
use crate::error::CmdError;
use crate::protocol::Request;
use crate::registry::{CommandRegistry, RegistryBuilder, UsageFlags};
use crate::value::Value;

use super::fixtures::{self, BlockAtHeight, RequiredAfterOptional};

// ---------------------------------------------------------------------------
// Step argument types
// ---------------------------------------------------------------------------

/// A step argument with its surrounding quotes removed.
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    registry: Option<CommandRegistry>,
    command: Option<TaggedCommand>,
    bytes: Option<Vec<u8>>,
    error: Option<CmdError>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn registry(world: &TestWorld) -> &CommandRegistry {
    world.registry.as_ref().expect("registry not configured")
}

fn constructed(world: &TestWorld) -> &TaggedCommand {
    world.command.as_ref().expect("no command constructed")
}

fn construct(world: &mut TestWorld, method: &str, args: Vec<Value>) {
    match registry(world).new_cmd(method, args) {
        Ok(command) => world.command = Some(command),
        Err(error) => world.error = Some(error),
    }
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("the fixture command registry")]
fn given_registry(world: &mut TestWorld) {
    world.registry = Some(fixtures::registry());
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("command {method} is constructed with height {height}")]
fn when_constructed_with_height(world: &mut TestWorld, method: QuotedString, height: i32) {
    construct(world, method.as_str(), vec![Value::I32(height)]);
}

#[when("command {method} is constructed with text {text}")]
fn when_constructed_with_text(world: &mut TestWorld, method: QuotedString, text: QuotedString) {
    construct(world, method.as_str(), vec![Value::from(text.as_str())]);
}

#[when("command {method} is constructed without arguments")]
fn when_constructed_without_arguments(world: &mut TestWorld, method: QuotedString) {
    construct(world, method.as_str(), Vec::new());
}

#[when("the command is marshaled with id {id}")]
fn when_marshaled(world: &mut TestWorld, id: i64) {
    let bytes = registry(world)
        .marshal_cmd(&json!(id), constructed(world).command())
        .expect("marshal command");
    world.bytes = Some(bytes);
}

#[when("a command declaring a required field after an optional field is registered")]
fn when_register_required_after_optional(world: &mut TestWorld) {
    let mut builder = RegistryBuilder::new();
    if let Err(error) = builder.register::<RequiredAfterOptional>("bad", UsageFlags::empty()) {
        world.error = Some(error);
    }
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the constructed command has height {height} and no verbose flag")]
fn then_height_without_verbose(world: &mut TestWorld, height: i32) {
    let block = constructed(world)
        .downcast_ref::<BlockAtHeight>()
        .expect("BlockAtHeight command");
    assert_eq!(block.height, height);
    assert_eq!(block.verbose, None);
}

#[then("the request params are {params}")]
fn then_request_params(world: &mut TestWorld, params: QuotedString) {
    let bytes = world.bytes.as_ref().expect("no request marshaled");
    let request: Request = serde_json::from_slice(bytes).expect("request envelope");
    let expected: Vec<serde_json::Value> =
        serde_json::from_str(params.as_str()).expect("expected params document");
    assert_eq!(request.params(), expected.as_slice());
}

#[then("unmarshaling the request reproduces the command")]
fn then_round_trip(world: &mut TestWorld) {
    let bytes = world.bytes.as_ref().expect("no request marshaled");
    let decoded = registry(world).unmarshal_slice(bytes).expect("unmarshal");
    let original = constructed(world);
    assert_eq!(decoded.method(), original.method());
    assert_eq!(
        decoded.downcast_ref::<BlockAtHeight>(),
        original.downcast_ref::<BlockAtHeight>()
    );
}

#[then("the operation fails with {code}")]
fn then_fails_with(world: &mut TestWorld, code: QuotedString) {
    let error = world.error.as_ref().expect("expected a failure");
    assert_eq!(
        error.code().as_str(),
        code.as_str(),
        "unexpected error: {error}"
    );
    assert!(world.command.is_none(), "no command should be produced");
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/command_codec.feature", index = 0)]
fn positional_binding_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/command_codec.feature", index = 1)]
fn trailing_omission_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/command_codec.feature", index = 2)]
fn unknown_method_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/command_codec.feature", index = 3)]
fn missing_arguments_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/command_codec.feature", index = 4)]
fn text_overflow_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/command_codec.feature", index = 5)]
fn registration_rule_behaviour(world: TestWorld) {
    let _ = world;
}
