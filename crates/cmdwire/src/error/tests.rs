//! Unit tests for error types.

use rstest::rstest;

use super::*;

#[test]
fn display_includes_code_and_message() {
    let error = CmdError::new(ErrorCode::NumParams, "wrong number of params (expected 1, received 3)");
    let message = error.to_string();
    assert!(
        message.starts_with("ErrNumParams: "),
        "expected code prefix in message: {message}"
    );
    assert!(
        message.contains("received 3"),
        "expected detail in message: {message}"
    );
}

#[test]
fn unregistered_names_the_method() {
    let error = CmdError::unregistered("boguscommand");
    assert_eq!(error.code(), ErrorCode::UnregisteredMethod);
    assert!(error.message().contains("boguscommand"));
}

#[rstest]
#[case::duplicate_method(ErrorCode::DuplicateMethod, true)]
#[case::duplicate_field(ErrorCode::DuplicateField, true)]
#[case::embedded(ErrorCode::EmbeddedType, true)]
#[case::unexported(ErrorCode::UnexportedField, true)]
#[case::unused_default(ErrorCode::UnusedDefault, true)]
#[case::non_optional_field(ErrorCode::NonOptionalField, true)]
#[case::non_optional_default(ErrorCode::NonOptionalDefault, true)]
#[case::mismatched_default(ErrorCode::MismatchedDefault, true)]
#[case::unregistered(ErrorCode::UnregisteredMethod, false)]
#[case::num_params(ErrorCode::NumParams, false)]
#[case::invalid_type(ErrorCode::InvalidType, false)]
fn schema_errors_are_classified(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(code.is_schema_error(), expected, "classification of {code}");
}

#[test]
fn error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CmdError>();
}
