mod common;

use common::{TestApp, PAY_PATH};
use serde_json::{json, Value};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const PAYMENT_REQUEST: &str = r#"{"merchantOrderId":"MO-7781","amount":1000,"paymentFlow":{"type":"PG_CHECKOUT","merchantUrls":{"redirectUrl":"https://shop.example.com/payment-success"}}}"#;

#[tokio::test]
async fn missing_authorization_is_rejected_before_upstream() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(PAY_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider)
        .await;

    let response = app.initiate_payment(None, PAYMENT_REQUEST).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "error": "Unauthorized: Missing Token" }));
}

#[tokio::test]
async fn payment_is_forwarded_verbatim_with_provider_scheme() {
    let app = TestApp::spawn().await;

    let provider_body = r#"{"orderId":"OMO2403282020198641071317","state":"PENDING","expireAt":1711867462542,"redirectUrl":"https://mercury-uat.phonepe.com/transact/uat_v2?token=abc"}"#;

    Mock::given(method("POST"))
        .and(path(PAY_PATH))
        .and(header("authorization", "O-Bearer caller-token"))
        .and(header("content-type", "application/json"))
        .and(body_string(PAYMENT_REQUEST))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(provider_body.as_bytes().to_vec(), "application/json"),
        )
        .expect(1)
        .mount(&app.provider)
        .await;

    let response = app
        .initiate_payment(Some("caller-token"), PAYMENT_REQUEST)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        provider_body
    );
}

#[tokio::test]
async fn upstream_error_payload_is_not_relayed() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(PAY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "BAD_REQUEST",
            "message": "amount must be at least 100 paise"
        })))
        .mount(&app.provider)
        .await;

    let response = app
        .initiate_payment(Some("caller-token"), PAYMENT_REQUEST)
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "error": "Payment request failed" }));
}

#[tokio::test]
async fn provider_server_error_becomes_generic_failure() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(PAY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream maintenance"))
        .mount(&app.provider)
        .await;

    let response = app
        .initiate_payment(Some("caller-token"), PAYMENT_REQUEST)
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body = response.text().await.expect("Failed to read body");
    assert!(!body.contains("maintenance"));
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_upstream_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(PAY_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider)
        .await;

    let response = app
        .initiate_payment(Some("caller-token"), "{\"amount\": ")
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Invalid JSON payload");
}
