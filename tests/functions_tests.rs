//! End-to-end tests for the HTTP functions
//!
//! The router is built through `ServerBuilder` with in-memory stores and
//! driven with `axum_test::TestServer`. Image proxy tests point at a real
//! axum listener on a local port standing in for a remote image host.

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum_test::TestServer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use julinemart::prelude::*;
use julinemart::payments::VendorContact;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    server: TestServer,
    auth: InMemoryAuthAdmin,
    mailer: RecordingMailer,
    settings: InMemorySettingsStore,
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.site.site_url = "https://shop.example.com".to_string();
    config.image_proxy.max_bytes = 1024;
    config
}

fn payment_with_vendor(id: &str, email: Option<&str>) -> VendorPayment {
    VendorPayment {
        id: id.to_string(),
        order_id: 1201,
        order_date: Some("2025-02-14".to_string()),
        vendor_code: "VND001".to_string(),
        product_total: Some(dec!(1000)),
        commission_amount: Some(dec!(50)),
        vendor_earnings: Some(dec!(950)),
        advance_amount: Some(dec!(380)),
        balance_amount: Some(dec!(570)),
        advance_paid_date: Some("2025-02-15".to_string()),
        advance_payment_method: Some("Bank Transfer".to_string()),
        advance_payment_reference: Some("ADV-10001".to_string()),
        vendor: Some(VendorContact {
            vendor_name: Some("Ada Stores".to_string()),
            email: email.map(str::to_string),
        }),
        ..Default::default()
    }
}

fn create_harness() -> Harness {
    create_harness_with(test_config())
}

fn create_harness_with(config: AppConfig) -> Harness {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP client");

    let payments = InMemoryPaymentStore::new();
    payments
        .insert(payment_with_vendor("42", Some("ada@example.com")))
        .unwrap();
    payments.insert(payment_with_vendor("43", None)).unwrap();

    let auth = InMemoryAuthAdmin::new();
    let mailer = RecordingMailer::new();
    let settings = InMemorySettingsStore::new();

    let app = ServerBuilder::new()
        .with_config(config)
        .with_http_client(http)
        .with_payment_store(payments)
        .with_settings_store(settings.clone())
        .with_auth_admin(auth.clone())
        .with_mailer(mailer.clone())
        .build()
        .expect("Failed to build app");

    Harness {
        server: TestServer::new(app).expect("Failed to create test server"),
        auth,
        mailer,
        settings,
    }
}

/// Serve a few fixed responses on an ephemeral local port
async fn spawn_image_host() -> String {
    let app = Router::new()
        .route(
            "/logo.png",
            get(|| async { ([(CONTENT_TYPE, "image/png")], PNG_BYTES.to_vec()) }),
        )
        .route(
            "/page.html",
            get(|| async { ([(CONTENT_TYPE, "text/html")], "<html></html>") }),
        )
        .route(
            "/large.png",
            get(|| async { ([(CONTENT_TYPE, "image/png")], vec![0u8; 4096]) }),
        )
        .route("/gone.png", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// =============================================================================
// Health and routing
// =============================================================================

mod routing_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoints() {
        let h = create_harness();
        for path in ["/health", "/healthz"] {
            let response = h.server.get(path).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["status"], "ok");
            assert_eq!(body["service"], "julinemart-backend");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let h = create_harness();
        let response = h.server.get("/api/does-not-exist").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let h = create_harness();
        let response = h.server.get("/api/send-payment-email").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = response.json();
        assert_eq!(body["error"], "Method not allowed");

        let response = h.server.method(Method::PATCH, "/api/upload-logo").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let h = create_harness();
        let response = h
            .server
            .method(Method::OPTIONS, "/api/create-vendor-auth")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://admin.example.com"),
            )
            .add_header(
                HeaderName::from_static("access-control-request-method"),
                HeaderValue::from_static("POST"),
            )
            .add_header(
                HeaderName::from_static("access-control-request-headers"),
                HeaderValue::from_static("content-type"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}

// =============================================================================
// Payments
// =============================================================================

mod payment_tests {
    use super::*;

    #[tokio::test]
    async fn test_breakdown_for_1000() {
        let h = create_harness();
        let response = h
            .server
            .get("/api/payments/breakdown")
            .add_query_param("total", "1000")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["commissionRate"].as_f64(), Some(5.0));
        assert_eq!(body["commissionAmount"].as_f64(), Some(50.0));
        assert_eq!(body["vendorEarnings"].as_f64(), Some(950.0));
        assert_eq!(body["advanceAmount"].as_f64(), Some(380.0));
        assert_eq!(body["balanceAmount"].as_f64(), Some(570.0));
    }

    #[tokio::test]
    async fn test_breakdown_rejects_bad_totals() {
        let h = create_harness();

        let zero = h
            .server
            .get("/api/payments/breakdown")
            .add_query_param("total", "0")
            .await;
        zero.assert_status(StatusCode::BAD_REQUEST);

        let text = h
            .server
            .get("/api/payments/breakdown")
            .add_query_param("total", "lots")
            .await;
        text.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = text.json();
        assert_eq!(body["code"], "INVALID_FIELD");

        let missing = h.server.get("/api/payments/breakdown").await;
        missing.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_catalog() {
        let h = create_harness();
        let response = h.server.get("/api/payments/statuses").await;
        response.assert_status_ok();

        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 6);
        assert_eq!(body[0]["status"], "pending_advance");
        assert_eq!(body[0]["label"], "Advance Pending");
        let completed = body.iter().find(|s| s["status"] == "completed").unwrap();
        assert_eq!(completed["nextAction"]["action"], "view_only");
    }

    #[tokio::test]
    async fn test_banks_are_listed() {
        let h = create_harness();
        let body: Vec<Value> = h.server.get("/api/banks").await.json();
        assert_eq!(body.len(), 19);
        assert!(body.iter().any(|b| b["code"] == "058"));
    }

    #[tokio::test]
    async fn test_validation_endpoints_report_every_error() {
        let h = create_harness();

        let response = h
            .server
            .post("/api/bank-accounts/validate")
            .json(&json!({
                "bank_name": "GTBank",
                "account_number": "123",
                "account_name": "A"
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["isValid"], false);
        assert!(body["errors"][0].as_str().unwrap().contains("10 digits"));

        let response = h
            .server
            .post("/api/payments/validate")
            .json(&json!({ "order_id": 0 }))
            .await;
        let body: Value = response.json();
        assert_eq!(body["isValid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_null_fields_read_as_blank() {
        let h = create_harness();

        let response = h
            .server
            .post("/api/payments/validate")
            .json(&json!({
                "order_id": 5,
                "order_date": "2025-01-01",
                "vendor_code": null,
                "product_total": 10
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["isValid"], false);
        assert_eq!(body["errors"], json!(["Vendor is required"]));

        let response = h
            .server
            .post("/api/bank-accounts/validate")
            .json(&json!({
                "bank_name": "Access Bank",
                "account_number": null,
                "account_name": null
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["errors"],
            json!(["Account number is required", "Account name is required"])
        );
    }

    #[tokio::test]
    async fn test_draft_receipt_for_stored_payment() {
        let h = create_harness();
        let response = h.server.get("/api/payments/42/receipt").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["receiptNumber"], "PAY-1201-DRAFT");
        assert_eq!(body["vendor"]["name"], "Ada Stores");
        assert_eq!(body["amounts"]["advanceAmount"], "NGN 380.00");

        h.server
            .get("/api/payments/999/receipt")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_csv_export() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/payments/export")
            .json(&json!([
                {"vendor": "Ada, Stores", "order_id": 1201},
                {"vendor": "Bola", "order_id": 1202}
            ]))
            .await;
        response.assert_status_ok();
        assert!(
            response.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        assert!(
            response.headers()["content-disposition"]
                .to_str()
                .unwrap()
                .contains("payments-")
        );
        assert_eq!(response.text(), "vendor,order_id\n\"Ada, Stores\",1201\nBola,1202\n");

        let empty = h.server.post("/api/payments/export").json(&json!([])).await;
        empty.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = empty.json();
        assert_eq!(body["error"], "No data to export");
    }
}

// =============================================================================
// send-payment-email
// =============================================================================

mod payment_email_tests {
    use super::*;

    #[tokio::test]
    async fn test_sends_advance_email_to_vendor() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .json(&json!({ "paymentId": 42, "emailType": "advance_paid" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Email sent successfully");
        assert_eq!(body["sentTo"], "ada@example.com");

        let sent = h.mailer.sent().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Advance Payment Received - Order #1201");
        assert!(sent[0].html.contains("ADV-10001"));
        assert!(sent[0].html.contains("Hi Ada Stores,"));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .json(&json!({ "paymentId": "42" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "paymentId and emailType are required");
    }

    #[tokio::test]
    async fn test_invalid_email_type() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .json(&json!({ "paymentId": "42", "emailType": "welcome" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid email type");
        assert!(h.mailer.sent().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_payment() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .json(&json!({ "paymentId": "999", "emailType": "balance_paid" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Payment not found");
    }

    #[tokio::test]
    async fn test_vendor_without_email() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .json(&json!({ "paymentId": "43", "emailType": "hub_verified" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Vendor email not found");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/send-payment-email")
            .text("{not json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_JSON");
    }
}

// =============================================================================
// create-vendor-auth
// =============================================================================

mod vendor_auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_vendor_is_created_and_invited() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/create-vendor-auth")
            .json(&json!({
                "vendor_code": "vnd001",
                "vendor_name": "Ada Stores",
                "email": "Ada@Example.com"
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["vendor_code"], "VND001");
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["authCreated"], true);
        assert_eq!(body["userExists"], false);
        assert_eq!(body["emailSent"], true);
        assert!(body["userId"].as_str().is_some());
        assert_eq!(
            body["redirectUrl"],
            "https://shop.example.com/vendor/reset-password.html"
        );

        let user = h.auth.user("ada@example.com").unwrap().unwrap();
        assert_eq!(user.vendor_code, "VND001");
        assert_eq!(
            h.auth.password_resets().unwrap(),
            vec![(
                "ada@example.com".to_string(),
                "https://shop.example.com/vendor/reset-password.html".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_existing_vendor_gets_reset_email() {
        let h = create_harness();
        let request = json!({
            "vendor_code": "VND001",
            "vendor_name": "Ada Stores",
            "email": "ada@example.com"
        });
        h.server.post("/api/create-vendor-auth").json(&request).await;

        let response = h.server.post("/api/create-vendor-auth").json(&request).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["authCreated"], false);
        assert_eq!(body["userExists"], true);
        assert_eq!(body["userId"], Value::Null);
        assert!(body["message"].as_str().unwrap().starts_with("Vendor already exists"));
        assert_eq!(h.auth.password_resets().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_fields() {
        let h = create_harness();
        let response = h
            .server
            .post("/api/create-vendor-auth")
            .json(&json!({ "vendor_code": "VND001", "email": "ada@example.com" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "Missing required fields: vendor_code, vendor_name, email"
        );

        let response = h
            .server
            .post("/api/create-vendor-auth")
            .json(&json!({
                "vendor_code": "VND001",
                "vendor_name": "Ada Stores",
                "email": "not-an-email"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_FIELD");
    }

    #[tokio::test]
    async fn test_without_auth_admin_is_configuration_error() {
        let app = ServerBuilder::new()
            .with_payment_store(InMemoryPaymentStore::new())
            .build()
            .unwrap();
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/create-vendor-auth")
            .json(&json!({
                "vendor_code": "VND001",
                "vendor_name": "Ada Stores",
                "email": "ada@example.com"
            }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Server configuration error")
        );
    }
}

// =============================================================================
// Logo blob and branding
// =============================================================================

mod logo_tests {
    use super::*;

    #[tokio::test]
    async fn test_logo_lifecycle() {
        let h = create_harness();
        h.server
            .get("/api/get-logo")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let upload = h
            .server
            .post("/api/upload-logo")
            .text("data:image/png;base64,iVBORw0KGgo=")
            .await;
        upload.assert_status_ok();
        assert_eq!(upload.text(), "Logo uploaded");

        let fetched = h.server.get("/api/get-logo").await;
        fetched.assert_status_ok();
        assert_eq!(fetched.text(), "data:image/png;base64,iVBORw0KGgo=");
        assert!(
            fetched.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );

        h.server
            .put("/api/upload-logo")
            .text("data:image/png;base64,AAAA")
            .await
            .assert_status_ok();
        assert_eq!(h.server.get("/api/get-logo").await.text(), "data:image/png;base64,AAAA");

        let deleted = h.server.delete("/api/delete-logo").await;
        deleted.assert_status_ok();
        assert_eq!(deleted.text(), "Logo deleted");
        h.server
            .get("/api/get-logo")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        h.server.post("/api/delete-logo").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_branding_reflects_settings() {
        let h = create_harness();
        let body: Value = h.server.get("/api/branding").await.json();
        assert_eq!(body["logoUrl"], "");
        assert_eq!(body["displayTitle"], "JulineMart");

        h.settings
            .upsert_setting("site_title", "Juline Market", chrono::Utc::now())
            .await
            .unwrap();
        let body: Value = h.server.get("/api/branding").await.json();
        assert_eq!(body["siteTitle"], "Juline Market");
        assert_eq!(
            body["printHeader"],
            r#"<div class="company-name">Juline Market</div>"#
        );
    }
}

// =============================================================================
// fetch-image
// =============================================================================

mod image_proxy_tests {
    use super::*;

    #[tokio::test]
    async fn test_image_is_returned_as_data_uri() {
        let host = spawn_image_host().await;
        let h = create_harness();

        let response = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("{}/logo.png", host))
            .await;
        response.assert_status_ok();

        let text = response.text();
        let encoded = text.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), PNG_BYTES);
    }

    #[tokio::test]
    async fn test_upstream_status_is_propagated() {
        let host = spawn_image_host().await;
        let h = create_harness();

        let response = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("{}/gone.png", host))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to fetch image. Status: 404");
    }

    #[tokio::test]
    async fn test_non_image_and_oversized_bodies_are_rejected() {
        let host = spawn_image_host().await;
        let h = create_harness();

        let html = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("{}/page.html", host))
            .await;
        html.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = html.json();
        assert_eq!(body["error"], "URL does not point to a valid image.");

        let large = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("{}/large.png", host))
            .await;
        large.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_url() {
        let h = create_harness();
        let response = h.server.get("/api/fetch-image").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Missing URL parameter");
    }

    #[tokio::test]
    async fn test_hosts_outside_allow_list_are_refused() {
        let host = spawn_image_host().await;
        let mut config = test_config();
        config.image_proxy.allowed_hosts = vec!["cdn.example.com".to_string()];
        let h = create_harness_with(config);

        let response = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("{}/logo.png", host))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_FIELD");
        assert_eq!(body["error"], "Invalid url: host '127.0.0.1' is not allowed");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_server_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let h = create_harness();
        let response = h
            .server
            .get("/api/fetch-image")
            .add_query_param("url", format!("http://{}/logo.png", addr))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Error fetching image")
        );
    }
}
