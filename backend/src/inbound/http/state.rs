//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DashboardQuery, DocumentWorkflow, LoginService, ResultWorkflow, UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub documents: Arc<dyn DocumentWorkflow>,
    pub results: Arc<dyn ResultWorkflow>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub documents: Arc<dyn DocumentWorkflow>,
    pub results: Arc<dyn ResultWorkflow>,
    /// Maximum decoded upload size in bytes.
    pub max_upload_bytes: usize,
}

/// Default decoded upload bound when configuration does not override it.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the default upload bound.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureDashboardQuery, FixtureDocumentWorkflow, FixtureLoginService,
    ///     FixtureResultWorkflow, FixtureUserProfileQuery,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     profile: Arc::new(FixtureUserProfileQuery),
    ///     dashboard: Arc::new(FixtureDashboardQuery),
    ///     documents: Arc::new(FixtureDocumentWorkflow),
    ///     results: Arc::new(FixtureResultWorkflow),
    /// };
    /// let state = HttpState::new(ports);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_max_upload_bytes(ports, DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Construct state with an explicit decoded upload bound.
    pub fn with_max_upload_bytes(ports: HttpStatePorts, max_upload_bytes: usize) -> Self {
        let HttpStatePorts {
            login,
            profile,
            dashboard,
            documents,
            results,
        } = ports;
        Self {
            login,
            profile,
            dashboard,
            documents,
            results,
            max_upload_bytes,
        }
    }
}
