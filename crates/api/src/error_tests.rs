// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn structured_body_is_parsed() {
    let body = r#"{
        "message": "Not enough RAM",
        "errorCode": 10000,
        "attributes": {
            "workspaces_count": 3,
            "used_ram": "5",
            "limit_ram": "6",
            "required_ram": "2",
            "ram_unit": "GB"
        }
    }"#;

    let err = ApiError::from_response(403, body);

    assert_eq!(err.code(), Some(RAM_LIMIT_EXCEEDED));
    assert_eq!(err.attribute("workspaces_count"), Some("3"));
    assert_eq!(err.attribute("ram_unit"), Some("GB"));
    assert_eq!(err.to_string(), "api error (403): Not enough RAM");
}

#[test]
fn unstructured_body_is_carried_verbatim() {
    let err = ApiError::from_response(502, "bad gateway");

    assert_eq!(err.code(), None);
    assert_eq!(err.to_string(), "api error (502): bad gateway");
}

#[test]
fn empty_body_falls_back_to_status() {
    let err = ApiError::from_response(500, "");
    assert_eq!(err.to_string(), "api error (500): request failed with status 500");
}

#[test]
fn structured_body_without_message_falls_back_to_status() {
    let err = ApiError::from_response(409, r#"{"errorCode": 42}"#);
    assert_eq!(err.code(), Some(42));
    assert_eq!(err.to_string(), "api error (409): request failed with status 409");
}

#[test]
fn not_modified_is_not_a_failure_marker() {
    assert!(ApiError::NotModified.is_not_modified());
    assert!(!ApiError::from_response(404, "").is_not_modified());
}
