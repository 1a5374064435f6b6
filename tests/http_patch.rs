//! PATCH /users/{id} end to end through the router and the in-memory store.

use std::sync::Arc;

use serde_json::{json, Value};
use userpatch::http::{handle, ApiResponse};
use userpatch::service::{build_validator, UserService};
use userpatch::store::MemoryUserStore;

fn service() -> UserService {
    let validator = build_validator().expect("request schemas are valid");
    UserService::new(Arc::new(MemoryUserStore::new()), Arc::new(validator))
}

fn send(svc: &UserService, method: &str, path: &str, body: Value) -> ApiResponse {
    handle(svc, method, path, body.to_string().as_bytes())
}

fn body(res: &ApiResponse) -> Value {
    res.json_body().expect("response body is JSON")
}

/// Creates the fixture user and returns its id
fn seed(svc: &UserService) -> i64 {
    let res = send(
        svc,
        "POST",
        "/users",
        json!({
            "name": "Old",
            "email": "test@example.com",
            "age": 30,
            "phone": "1234567890",
            "active": true,
            "bio": "Some bio",
            "role": "admin",
            "score": 80.0
        }),
    );
    assert_eq!(res.status, 201, "{:?}", res.json_body());
    body(&res)["id"].as_i64().unwrap()
}

fn get(svc: &UserService, id: i64) -> Value {
    let res = handle(svc, "GET", &format!("/users/{id}"), b"");
    assert_eq!(res.status, 200);
    body(&res)
}

fn patch(svc: &UserService, id: i64, patch: Value) -> ApiResponse {
    send(svc, "PATCH", &format!("/users/{id}"), patch)
}

fn without(mut value: Value, keys: &[&str]) -> Value {
    for key in keys {
        value.as_object_mut().unwrap().remove(*key);
    }
    value
}

#[test]
fn test_single_field_changes_only_that_column() {
    let svc = service();
    let id = seed(&svc);
    let before = get(&svc, id);

    let res = patch(&svc, id, json!({ "name": "Xy" }));
    assert_eq!(res.status, 200);
    let after = body(&res);
    assert_eq!(after["name"], "Xy");
    assert_eq!(without(after, &["name"]), without(before, &["name"]));

    let res = patch(&svc, id, json!({ "name": "X" }));
    assert_eq!(res.status, 400);
    let errors = body(&res);
    assert_eq!(errors["errors"][0]["field"], "name");
    assert_eq!(errors["errors"][0]["rule"], "min");
    assert_eq!(get(&svc, id)["name"], "Xy");
}

#[test]
fn test_null_clears_nullable_phone() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "phone": null }));
    assert_eq!(res.status, 200);
    assert_eq!(body(&res)["phone"], Value::Null);
    assert_eq!(get(&svc, id)["phone"], Value::Null);
}

#[test]
fn test_empty_patch_is_rejected() {
    let svc = service();
    let id = seed(&svc);
    let before = get(&svc, id);

    let res = patch(&svc, id, json!({}));
    assert_eq!(res.status, 400);
    let errors = body(&res);
    assert_eq!(errors["error"], "No fields to update");
    assert_eq!(errors["errors"][0]["rule"], "empty");
    assert_eq!(get(&svc, id), before);
}

#[test]
fn test_out_of_range_value_is_rejected_and_record_unchanged() {
    let svc = service();
    let id = seed(&svc);
    let before = get(&svc, id);

    let res = patch(&svc, id, json!({ "age": -1 }));
    assert_eq!(res.status, 400);
    let errors = body(&res);
    assert_eq!(errors["error"], "Validation failed");
    assert_eq!(errors["errors"][0]["field"], "age");
    assert_eq!(errors["errors"][0]["rule"], "gte");
    assert_eq!(get(&svc, id), before);
}

#[test]
fn test_null_skips_inner_rules_and_resets_role() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "role": null }));
    assert_eq!(res.status, 200);
    assert_eq!(body(&res)["role"], "");
}

#[test]
fn test_unknown_user_is_not_found() {
    let svc = service();
    let res = patch(&svc, 999, json!({ "name": "Test" }));
    assert_eq!(res.status, 404);
    assert_eq!(body(&res)["error"], "User not found");
}

#[test]
fn test_null_on_non_nullable_columns_stores_zero_values() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(
        &svc,
        id,
        json!({ "bio": null, "active": null, "score": null, "age": null }),
    );
    assert_eq!(res.status, 200);
    let user = body(&res);
    assert_eq!(user["bio"], "");
    assert_eq!(user["active"], false);
    assert_eq!(user["score"], 0.0);
    assert_eq!(user["age"], 0);
    assert_eq!(user["name"], "Old");
}

#[test]
fn test_mixed_states_in_one_body() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(
        &svc,
        id,
        json!({ "name": "Updated Name", "phone": null, "score": 95.5 }),
    );
    assert_eq!(res.status, 200);
    let user = body(&res);
    assert_eq!(user["name"], "Updated Name");
    assert_eq!(user["phone"], Value::Null);
    assert_eq!(user["score"], 95.5);
    assert_eq!(user["age"], 30);
    assert_eq!(user["bio"], "Some bio");
    assert_eq!(user["role"], "admin");
    assert_eq!(user["active"], true);
}

#[test]
fn test_false_is_a_value_not_an_absence() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "active": false }));
    assert_eq!(res.status, 200);
    assert_eq!(body(&res)["active"], false);
}

#[test]
fn test_same_patch_twice_is_idempotent() {
    let svc = service();
    let id = seed(&svc);
    let update = json!({ "bio": "New bio", "phone": null, "age": 41 });

    let first = body(&patch(&svc, id, update.clone()));
    let second = body(&patch(&svc, id, update));
    assert_eq!(first, second);
}

#[test]
fn test_email_and_id_cannot_be_patched() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "email": "new@example.com", "id": 77 }));
    assert_eq!(res.status, 400);
    assert_eq!(body(&res)["error"], "No fields to update");

    let res = patch(&svc, id, json!({ "email": "new@example.com", "name": "Still Me" }));
    assert_eq!(res.status, 200);
    let user = body(&res);
    assert_eq!(user["email"], "test@example.com");
    assert_eq!(user["id"], id);
}

#[test]
fn test_name_cannot_be_null() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "name": null }));
    assert_eq!(res.status, 400);
    let errors = body(&res);
    assert_eq!(errors["errors"][0]["field"], "name");
    assert_eq!(errors["errors"][0]["rule"], "nonull");
    assert_eq!(get(&svc, id)["name"], "Old");
}

#[test]
fn test_every_failing_field_is_reported() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(
        &svc,
        id,
        json!({ "name": "A", "age": 151, "role": "superadmin", "score": 101 }),
    );
    assert_eq!(res.status, 400);
    let fields: Vec<String> = body(&res)["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["name", "age", "role", "score"]);
}

#[test]
fn test_validation_rules_table() {
    let cases = [
        (json!({ "name": "A" }), Some(("name", "min"))),
        (json!({ "name": "a".repeat(101) }), Some(("name", "max"))),
        (json!({ "name": "Valid Name" }), None),
        (json!({ "age": 151 }), Some(("age", "lte"))),
        (json!({ "age": 0 }), None),
        (json!({ "phone": "123" }), Some(("phone", "min"))),
        (json!({ "phone": "1".repeat(21) }), Some(("phone", "max"))),
        (json!({ "phone": "9876543210" }), None),
        (json!({ "bio": "b".repeat(501) }), Some(("bio", "max"))),
        (json!({ "role": "superadmin" }), Some(("role", "oneof"))),
        (json!({ "role": "guest" }), None),
        (json!({ "score": -1 }), Some(("score", "gte"))),
        (json!({ "score": 100 }), None),
    ];

    for (update, expected) in cases {
        let svc = service();
        let id = seed(&svc);
        let res = patch(&svc, id, update.clone());
        match expected {
            None => assert_eq!(res.status, 200, "{update}"),
            Some((field, rule)) => {
                assert_eq!(res.status, 400, "{update}");
                let errors = body(&res);
                assert_eq!(errors["errors"][0]["field"], field, "{update}");
                assert_eq!(errors["errors"][0]["rule"], rule, "{update}");
            }
        }
    }
}

#[test]
fn test_wrong_type_is_malformed_input() {
    let svc = service();
    let id = seed(&svc);

    let res = patch(&svc, id, json!({ "age": "thirty" }));
    assert_eq!(res.status, 400);
    let errors = body(&res);
    assert_eq!(errors["errors"][0]["field"], "age");
    assert_eq!(get(&svc, id)["age"], 30);
}

#[test]
fn test_non_object_body_is_malformed_input() {
    let svc = service();
    let id = seed(&svc);

    let res = handle(&svc, "PATCH", &format!("/users/{id}"), b"[1, 2, 3]");
    assert_eq!(res.status, 400);
    let res = handle(&svc, "PATCH", &format!("/users/{id}"), b"{not json");
    assert_eq!(res.status, 400);
}
