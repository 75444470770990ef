//! Unit tests for the envelope types.

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case::null(json!(null), true)]
#[case::number(json!(1), true)]
#[case::float(json!(1.5), true)]
#[case::string(json!("abc"), true)]
#[case::bool(json!(true), false)]
#[case::array(json!([1]), false)]
#[case::object(json!({"id": 1}), false)]
fn valid_ids_are_null_numbers_or_strings(#[case] id: Json, #[case] expected: bool) {
    assert_eq!(is_valid_id(&id), expected, "{id}");
}

#[test]
fn request_rejects_invalid_id() {
    let error = Request::new("1.0", json!([]), "getblockcount", Vec::new())
        .expect_err("array id");
    assert_eq!(error.code(), ErrorCode::InvalidType);
}

#[test]
fn request_serialises_in_envelope_order() {
    let request = Request::new("1.0", json!("a"), "getblock", vec![json!("00ab"), json!(true)])
        .expect("valid");
    let text = serde_json::to_string(&request).expect("serialise");
    assert_eq!(
        text,
        r#"{"jsonrpc":"1.0","method":"getblock","params":["00ab",true],"id":"a"}"#
    );
}

#[rstest]
#[case::null_params(r#"{"jsonrpc":"1.0","method":"m","params":null,"id":1}"#)]
#[case::missing_params(r#"{"jsonrpc":"1.0","method":"m","id":1}"#)]
fn absent_params_decode_as_empty(#[case] text: &str) {
    let request: Request = serde_json::from_str(text).expect("deserialise");
    assert!(request.params().is_empty());
    assert_eq!(request.method(), "m");
    assert_eq!(request.id(), &json!(1));
}

#[test]
fn missing_id_decodes_as_null() {
    let request: Request =
        serde_json::from_str(r#"{"jsonrpc":"1.0","method":"m","params":[]}"#).expect("deserialise");
    assert_eq!(request.id(), &Json::Null);
    assert_eq!(request.jsonrpc(), "1.0");
}

#[rstest]
#[case(ErrorCode::UnregisteredMethod, error_codes::METHOD_NOT_FOUND)]
#[case(ErrorCode::NumParams, error_codes::INVALID_PARAMS)]
#[case(ErrorCode::InvalidType, error_codes::INVALID_PARAMS)]
#[case(ErrorCode::NonOptionalField, error_codes::INTERNAL_ERROR)]
fn command_errors_map_to_rpc_codes(#[case] code: ErrorCode, #[case] expected: i32) {
    let rpc = RpcError::from(CmdError::new(code, "detail"));
    assert_eq!(rpc.code, expected);
    assert_eq!(rpc.message, "detail");
}

#[test]
fn response_keeps_null_members() {
    let response = Response::new(json!(1), Json::Null, Some(RpcError::new(-1, "boom")))
        .expect("valid id");
    let text = serde_json::to_string(&response).expect("serialise");
    assert_eq!(
        text,
        r#"{"result":null,"error":{"code":-1,"message":"boom"},"id":1}"#
    );
    let decoded: Response = serde_json::from_str(&text).expect("deserialise");
    assert_eq!(decoded, response);
}

#[test]
fn rpc_error_displays_code_and_message() {
    assert_eq!(RpcError::new(-32601, "missing").to_string(), "-32601: missing");
}
