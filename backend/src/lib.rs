//! Backend library modules.

#[cfg(feature = "demo-data")]
pub mod demo_data;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Tracing middleware re-exported for server wiring.
pub use middleware::trace::Trace;
