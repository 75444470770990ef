//! Crate-level integration and BDD tests.

use std::thread;

use serde_json::json;

use crate::error::ErrorCode;
use crate::value::Value;

mod behaviour;

use self::fixtures::{BlockAtHeight, GetBlock};

#[test]
fn end_to_end_construct_marshal_unmarshal() {
    let registry = fixtures::registry();
    let cmd = registry
        .new_cmd("getblockatheight", [Value::I32(5)])
        .expect("construct");
    assert_eq!(
        cmd.downcast_ref::<BlockAtHeight>(),
        Some(&BlockAtHeight {
            height: 5,
            verbose: None,
        })
    );

    let request = registry
        .build_request(&json!(1), cmd.command())
        .expect("build request");
    assert_eq!(request.params(), [json!(5)]);

    let bytes = registry
        .marshal_cmd(&json!(1), cmd.command())
        .expect("marshal");
    let decoded = registry.unmarshal_slice(&bytes).expect("unmarshal");
    assert_eq!(decoded.method(), "getblockatheight");
    assert_eq!(
        decoded.downcast_ref::<BlockAtHeight>(),
        cmd.downcast_ref::<BlockAtHeight>()
    );
}

#[test]
fn sealed_registry_serves_concurrent_callers() {
    let registry = fixtures::registry();
    thread::scope(|scope| {
        for height in 0..4_i32 {
            let shared = &registry;
            scope.spawn(move || {
                let cmd = shared
                    .new_cmd("getblockatheight", [Value::I32(height)])
                    .expect("construct");
                let bytes = shared
                    .marshal_cmd(&json!(height), cmd.command())
                    .expect("marshal");
                let decoded = shared.unmarshal_slice(&bytes).expect("unmarshal");
                assert_eq!(
                    decoded.downcast_ref::<BlockAtHeight>().map(|block| block.height),
                    Some(height)
                );
            });
        }
    });
}

#[test]
fn zero_arguments_for_required_field_is_num_params() {
    let registry = fixtures::registry();
    let error = registry
        .new_cmd("getblock", Vec::new())
        .expect_err("missing hash");
    assert_eq!(error.code(), ErrorCode::NumParams);
    assert!(registry.cmd_method(&GetBlock {
        hash: String::new(),
        verbose: None,
    })
    .is_ok_and(|method| method == "getblock"));
}
