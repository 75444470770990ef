//! Unit tests for JSON document decoding.

use rstest::rstest;
use serde_json::json;

use super::*;

#[test]
fn document_decodes_nested_record() {
    let ty = FieldType::record([
        ("height", FieldType::I32),
        ("verbose", FieldType::optional(FieldType::Bool)),
        ("tags", FieldType::seq(FieldType::String)),
    ]);
    let value = decode_document(&json!({"tags": ["a"], "height": 7, "extra": 1}), &ty)
        .expect("decodes");
    assert_eq!(
        value,
        Value::Record(vec![
            ("height".into(), Value::I32(7)),
            ("verbose".into(), Value::Nil),
            ("tags".into(), Value::Seq(vec![Value::from("a")])),
        ])
    );
    assert!(ty.admits(&value));
}

#[rstest]
#[case::short_array(json!([1, 2]), FieldType::array(FieldType::U8, 3))]
#[case::fractional_int(json!(1.5), FieldType::I64)]
#[case::int_overflow(json!(300), FieldType::U8)]
#[case::negative_unsigned(json!(-1), FieldType::U32)]
#[case::f32_overflow(json!(1e300), FieldType::F32)]
#[case::null_for_required(json!(null), FieldType::String)]
#[case::object_for_seq(json!({}), FieldType::seq(FieldType::Bool))]
#[case::bad_member(json!({"n": "x"}), FieldType::record([("n", FieldType::I8)]))]
fn document_rejects_structural_mismatches(#[case] json: Json, #[case] ty: FieldType) {
    let result = decode_document(&json, &ty);
    assert!(result.is_err(), "{json} should not decode as {ty}: {result:?}");
}

#[test]
fn document_keeps_map_keys() {
    let ty = FieldType::map(FieldType::F64);
    let value = decode_document(&json!({"addr": 1.25}), &ty).expect("decodes");
    assert_eq!(
        value,
        Value::Map(BTreeMap::from([(String::from("addr"), Value::F64(1.25))]))
    );
}

#[rstest]
#[case::null(json!(null), FieldType::optional(FieldType::I32), Value::Nil)]
#[case::bool(json!(true), FieldType::Bool, Value::Bool(true))]
#[case::text(json!("x"), FieldType::I32, Value::from("x"))]
#[case::signed(json!(-4), FieldType::I8, Value::I64(-4))]
#[case::unsigned(json!(u64::MAX), FieldType::U64, Value::U64(u64::MAX))]
#[case::float_destination(json!(2), FieldType::F32, Value::F64(2.0))]
#[case::fractional(json!(2.5), FieldType::I32, Value::F64(2.5))]
fn param_decodes_natural_scalars(#[case] json: Json, #[case] ty: FieldType, #[case] expected: Value) {
    assert_eq!(decode_param(&json, &ty), Ok(expected));
}

#[test]
fn param_decodes_composites_structurally() {
    let ty = FieldType::optional(FieldType::seq(FieldType::U16));
    let value = decode_param(&json!([1, 2]), &ty).expect("decodes");
    assert_eq!(value, Value::Seq(vec![Value::U16(1), Value::U16(2)]));
}

#[test]
fn param_rejects_containers_for_scalars() {
    assert!(decode_param(&json!([1]), &FieldType::I32).is_err());
    assert!(decode_param(&json!({"a": 1}), &FieldType::String).is_err());
}

#[test]
fn narrowing_accepts_infinity_but_not_overflow() {
    assert_eq!(narrow_to_f32(f64::INFINITY), Some(f32::INFINITY));
    assert_eq!(narrow_to_f32(f64::MAX), None);
    assert_eq!(narrow_to_f32(0.5), Some(0.5));
}
