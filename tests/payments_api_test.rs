//! Integration tests for payments: recording against invoices, partial
//! updates, the multipart receipt upload and the restrict-on-delete policy.

mod common;

use axum::http::{Method, StatusCode};
use common::{multipart_upload, TestApp};
use serde_json::json;

const BOUNDARY: &str = "fabrika-test-boundary";

/// Create order → invoice, returning the invoice id.
async fn create_invoice(app: &TestApp, token: &str) -> i64 {
    let (status, body) = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "customer_name": "Acme" })),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/invoices",
            Some(json!({ "order_id": order_id, "total_amount": "500.00" })),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_payment(app: &TestApp, token: &str, invoice_id: i64) -> i64 {
    let (status, body) = app
        .request(
            Method::POST,
            "/payments",
            Some(json!({
                "invoice_id": invoice_id,
                "amount": "150.50",
                "payment_method": "bank_transfer",
                "reference": "TRX-001",
            })),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn payment_records_against_an_existing_invoice() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let invoice_id = create_invoice(&app, &token).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/payments",
            Some(json!({ "invoice_id": invoice_id, "amount": "150.50" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["data"]["invoice_id"], invoice_id);
    assert_eq!(body["data"]["status"], "pending");
    let amount: f64 = body["data"]["amount"]
        .as_str()
        .expect("amount")
        .parse()
        .expect("numeric amount");
    assert!((amount - 150.5).abs() < f64::EPSILON);

    // Unknown invoice is rejected before any write.
    let (status, _) = app
        .request(
            Method::POST,
            "/payments",
            Some(json!({ "invoice_id": 999, "amount": "1.00" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .request(Method::GET, "/payments", None, Some(&token))
        .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn update_touches_only_supplied_fields() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let invoice_id = create_invoice(&app, &token).await;
    let payment_id = create_payment(&app, &token, invoice_id).await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/payments/{payment_id}"),
            Some(json!({ "status": "completed", "notes": "wire received" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .request(
            Method::GET,
            &format!("/payments/{payment_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["notes"], "wire received");
    assert_eq!(body["data"]["payment_method"], "bank_transfer");
    assert_eq!(body["data"]["reference"], "TRX-001");
    let amount: f64 = body["data"]["amount"]
        .as_str()
        .expect("amount")
        .parse()
        .expect("numeric amount");
    assert!((amount - 150.5).abs() < f64::EPSILON);

    let (status, _) = app
        .request(
            Method::PUT,
            "/payments/999",
            Some(json!({ "status": "completed" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn receipt_upload_stores_the_file_keyed_by_payment() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let invoice_id = create_invoice(&app, &token).await;
    let payment_id = create_payment(&app, &token, invoice_id).await;

    let body_bytes = multipart_upload(BOUNDARY, payment_id, "scan.png", b"fake png bytes");
    let (status, body) = app
        .request_raw(
            Method::POST,
            "/payments/upload",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            body_bytes,
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let receipt_path = body["data"]["receipt_path"].as_str().expect("receipt_path");
    assert!(receipt_path.ends_with(&format!("receipt_{payment_id}.png")));
    assert_eq!(
        std::fs::read(receipt_path).expect("uploaded file"),
        b"fake png bytes"
    );
}

#[tokio::test]
async fn receipt_upload_rejects_bad_input() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let invoice_id = create_invoice(&app, &token).await;
    let payment_id = create_payment(&app, &token, invoice_id).await;

    // Disallowed extension.
    let body_bytes = multipart_upload(BOUNDARY, payment_id, "scan.exe", b"nope");
    let (status, _) = app
        .request_raw(
            Method::POST,
            "/payments/upload",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            body_bytes,
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown payment id.
    let body_bytes = multipart_upload(BOUNDARY, 999, "scan.png", b"data");
    let (status, _) = app
        .request_raw(
            Method::POST,
            "/payments/upload",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            body_bytes,
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The payment record was never touched.
    let (_, body) = app
        .request(
            Method::GET,
            &format!("/payments/{payment_id}"),
            None,
            Some(&token),
        )
        .await;
    assert!(body["data"]["receipt_path"].is_null());
}

#[tokio::test]
async fn delete_is_refused_while_a_receipt_exists() {
    let app = TestApp::new().await;
    let sales = app.signup_and_login("Sal", "s@x.com", "p", "Sales").await;
    let admin = app.signup_and_login("Root", "root@x.com", "p", "Admin").await;
    let invoice_id = create_invoice(&app, &sales).await;
    let payment_id = create_payment(&app, &sales, invoice_id).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/receipts",
            Some(json!({ "payment_id": payment_id })),
            Some(&sales),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let receipt_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/payments/{payment_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "restrict policy");

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/receipts/{receipt_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/payments/{payment_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
