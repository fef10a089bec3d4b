//! HTTP server: the marketplace's serverless functions as axum routes
//!
//! [`ServerBuilder`] wires the service traits into an [`AppState`] and
//! produces a router with:
//! - the HTTP functions under `/api`
//! - `/health` and `/healthz`
//! - permissive CORS and request tracing

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use state::AppState;
