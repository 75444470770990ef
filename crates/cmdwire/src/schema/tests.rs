//! Unit tests for schema validation.

use rstest::rstest;

use super::*;

fn one_required_one_optional() -> CommandSchema {
    CommandSchema::new()
        .field("hash", FieldType::String)
        .optional("verbose", FieldType::Bool)
}

#[test]
fn descriptor_caches_parameter_bounds() {
    let descriptor = TypeDescriptor::from_schema(&one_required_one_optional()).expect("valid");
    assert_eq!(descriptor.min_params(), 1);
    assert_eq!(descriptor.max_params(), 2);
    let names: Vec<_> = descriptor.fields().iter().map(FieldDescriptor::name).collect();
    assert_eq!(names, ["hash", "verbose"]);
}

#[test]
fn empty_schema_takes_no_params() {
    let descriptor = TypeDescriptor::from_schema(&CommandSchema::new()).expect("valid");
    assert_eq!((descriptor.min_params(), descriptor.max_params()), (0, 0));
    assert!(descriptor.check_num_params(0).is_ok());
    assert!(descriptor.check_num_params(1).is_err());
}

#[test]
fn default_is_recorded_on_its_field() {
    let schema = one_required_one_optional().with_default("verbose", true);
    let descriptor = TypeDescriptor::from_schema(&schema).expect("valid");
    let verbose = descriptor.fields().get(1).expect("second field");
    assert_eq!(verbose.default_value(), Some(&Value::Bool(true)));
}

#[rstest]
#[case::embedded(
    CommandSchema::new().member(FieldSpec::new("Base", FieldType::I32).embedded()),
    ErrorCode::EmbeddedType
)]
#[case::private(
    CommandSchema::new().member(FieldSpec::new("secret", FieldType::String).private()),
    ErrorCode::UnexportedField
)]
#[case::duplicate(
    CommandSchema::new().field("a", FieldType::Bool).field("a", FieldType::Bool),
    ErrorCode::DuplicateField
)]
#[case::required_after_optional(
    CommandSchema::new()
        .optional("verbose", FieldType::Bool)
        .field("height", FieldType::I32),
    ErrorCode::NonOptionalField
)]
#[case::default_on_required(
    CommandSchema::new().field("height", FieldType::I32).with_default("height", 1_i32),
    ErrorCode::NonOptionalDefault
)]
#[case::mismatched_default(
    CommandSchema::new()
        .optional("count", FieldType::I32)
        .with_default("count", 1_i64),
    ErrorCode::MismatchedDefault
)]
#[case::unused_default(
    CommandSchema::new()
        .optional("count", FieldType::I32)
        .with_default("other", 1_i32),
    ErrorCode::UnusedDefault
)]
fn invalid_schemas_are_rejected(#[case] schema: CommandSchema, #[case] code: ErrorCode) {
    let error = TypeDescriptor::from_schema(&schema).expect_err("schema should be rejected");
    assert_eq!(error.code(), code, "unexpected error: {error}");
    assert!(error.code().is_schema_error());
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(2, true)]
#[case(3, false)]
fn parameter_count_is_bounded(#[case] received: usize, #[case] accepted: bool) {
    let descriptor = TypeDescriptor::from_schema(&one_required_one_optional()).expect("valid");
    let result = descriptor.check_num_params(received);
    assert_eq!(result.is_ok(), accepted, "{received} params: {result:?}");
    if let Err(error) = result {
        assert_eq!(error.code(), ErrorCode::NumParams);
        assert!(
            error.message().contains("expected 1 to 2"),
            "unexpected message: {}",
            error.message()
        );
    }
}
