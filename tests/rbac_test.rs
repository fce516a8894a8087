//! Integration tests for the role gate: callers outside an operation's
//! allowed set get 403 and no side effect occurs.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn warehouse_cannot_read_commercial_paperwork() {
    let app = TestApp::new().await;
    let warehouse = app
        .signup_and_login("Wally", "w@x.com", "p", "Warehouse")
        .await;

    for uri in ["/orders", "/invoices", "/payments", "/receipts"] {
        let (status, _) = app.request(Method::GET, uri, None, Some(&warehouse)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {uri} should be gated");
    }
}

#[tokio::test]
async fn sales_cannot_write_stock_and_nothing_is_persisted() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/stock",
            Some(json!({ "item_name": "M8 bolt", "quantity": 500 })),
            Some(&sales),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("Access denied"));

    // Stock is readable by everyone, so Sales can confirm nothing landed.
    let (status, body) = app.request(Method::GET, "/stock", None, Some(&sales)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn sales_cannot_touch_delivery_notes() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (status, _) = app
        .request(Method::GET, "/delivery-notes", None, Some(&sales))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_delete_is_forbidden_with_no_side_effect() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "customer_name": "Acme" })),
            Some(&sales),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(Method::DELETE, &format!("/orders/{id}"), None, Some(&sales))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, &format!("/orders/{id}"), None, Some(&sales))
        .await;
    assert_eq!(status, StatusCode::OK, "order must still exist");
}

#[tokio::test]
async fn the_role_matrix_grants_cross_desk_reads_where_specified() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let warehouse = app
        .signup_and_login("Wally", "w@x.com", "p", "Warehouse")
        .await;
    let admin = app.signup_and_login("Root", "root@x.com", "p", "Admin").await;

    // Stock reads are open to all three roles.
    for token in [&sales, &warehouse, &admin] {
        let (status, _) = app.request(Method::GET, "/stock", None, Some(token)).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Admin passes every gate.
    for uri in ["/orders", "/invoices", "/payments", "/receipts", "/delivery-notes"] {
        let (status, _) = app.request(Method::GET, uri, None, Some(&admin)).await;
        assert_eq!(status, StatusCode::OK, "admin GET {uri}");
    }

    // Warehouse owns delivery notes, sales owns the commercial side.
    let (status, _) = app
        .request(Method::GET, "/delivery-notes", None, Some(&warehouse))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request(Method::GET, "/orders", None, Some(&sales)).await;
    assert_eq!(status, StatusCode::OK);
}
