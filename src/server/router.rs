//! Route table for the HTTP functions

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    branding, health_check, image, logo, method_not_allowed, payment_email, payments,
    route_not_found, vendor_auth,
};
use super::state::AppState;

/// Routes under `/api`
///
/// Every route answers a wrong method with a JSON 405 rather than axum's
/// empty default.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-vendor-auth",
            post(vendor_auth::create_vendor_auth).fallback(method_not_allowed),
        )
        .route(
            "/get-logo",
            get(logo::get_logo).fallback(method_not_allowed),
        )
        .route(
            "/upload-logo",
            post(logo::upload_logo)
                .put(logo::upload_logo)
                .fallback(method_not_allowed),
        )
        .route(
            "/delete-logo",
            delete(logo::delete_logo)
                .post(logo::delete_logo)
                .fallback(method_not_allowed),
        )
        .route(
            "/fetch-image",
            get(image::fetch_image).fallback(method_not_allowed),
        )
        .route(
            "/send-payment-email",
            post(payment_email::send_payment_email).fallback(method_not_allowed),
        )
        .route(
            "/branding",
            get(branding::get_branding).fallback(method_not_allowed),
        )
        .route(
            "/banks",
            get(payments::list_banks).fallback(method_not_allowed),
        )
        .route(
            "/payments/breakdown",
            get(payments::breakdown).fallback(method_not_allowed),
        )
        .route(
            "/payments/statuses",
            get(payments::list_statuses).fallback(method_not_allowed),
        )
        .route(
            "/payments/validate",
            post(payments::validate_payment).fallback(method_not_allowed),
        )
        .route(
            "/payments/export",
            post(payments::export).fallback(method_not_allowed),
        )
        .route(
            "/payments/{id}/receipt",
            get(payments::receipt).fallback(method_not_allowed),
        )
        .route(
            "/bank-accounts/validate",
            post(payments::validate_account).fallback(method_not_allowed),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Assemble the application router with CORS and request tracing
pub fn build_router(state: AppState, custom_routes: Vec<Router>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE]);

    let mut app = health_routes()
        .nest("/api", api_routes())
        .fallback(route_not_found)
        .with_state(state);

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
