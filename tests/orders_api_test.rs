//! Integration tests for the order resource, including the restrict-on-
//! delete policy toward invoices and delivery notes.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn first_order_gets_id_one_and_default_status() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "customer_name": "Acme" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["customer_name"], "Acme");
}

#[tokio::test]
async fn create_requires_customer_name() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (status, _) = app
        .request(Method::POST, "/orders", Some(json!({})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.request(Method::GET, "/orders", None, Some(&token)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn update_changes_status_in_place() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "customer_name": "Acme" })),
            Some(&token),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/orders/{id}"),
            Some(json!({ "status": "shipped" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .request(Method::GET, &format!("/orders/{id}"), None, Some(&token))
        .await;
    assert_eq!(body["data"]["status"], "shipped");
    assert_eq!(body["data"]["customer_name"], "Acme");

    let (status, _) = app
        .request(
            Method::PUT,
            "/orders/999",
            Some(json!({ "status": "shipped" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_refused_while_dependents_exist() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let admin = app.signup_and_login("Root", "root@x.com", "p", "Admin").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "customer_name": "Acme" })),
            Some(&sales),
        )
        .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/invoices",
            Some(json!({ "order_id": order_id, "total_amount": "500.00" })),
            Some(&sales),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    let invoice_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(Method::DELETE, &format!("/orders/{order_id}"), None, Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "restrict policy");

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/invoices/{invoice_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::DELETE, &format!("/orders/{order_id}"), None, Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, &format!("/orders/{order_id}"), None, Some(&sales))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
