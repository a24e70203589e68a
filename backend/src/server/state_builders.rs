//! Builders for the HTTP state ports over database or fixture backends.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{
    FixtureDashboardQuery, FixtureDocumentWorkflow, FixtureLoginService, FixtureResultWorkflow,
    FixtureUserProfileQuery,
};
use crate::domain::{
    DashboardService, DocumentWorkflowService, ProfileService, ResultWorkflowService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DbPool, DieselAcademicSessionRepository, DieselDocumentRepository, DieselLoginService,
    DieselResultRepository, DieselUserRepository,
};
use crate::outbound::storage::{DriveFileStore, FallbackFileStore, LocalFileStore};

use super::ServerConfig;

/// Compose the file store from configuration.
///
/// A configured drive endpoint yields the drive-first composite; otherwise
/// every upload lands on local disk.
fn build_file_store(config: &ServerConfig) -> std::io::Result<FallbackFileStore> {
    let local = Arc::new(
        LocalFileStore::new(config.upload_root.clone())
            .map_err(|err| std::io::Error::other(format!("upload root unavailable: {err}")))?,
    );
    match &config.drive_endpoint {
        Some(endpoint) => {
            let drive = DriveFileStore::new(endpoint.clone(), config.drive_timeout)
                .map_err(|err| std::io::Error::other(format!("drive client failed: {err}")))?;
            Ok(FallbackFileStore::new(Arc::new(drive), local))
        }
        None => Ok(FallbackFileStore::local_only(local)),
    }
}

/// Build database-backed ports over the pool.
fn build_database_ports(config: &ServerConfig, pool: &DbPool) -> std::io::Result<HttpStatePorts> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let documents = Arc::new(DieselDocumentRepository::new(pool.clone()));
    let results = Arc::new(DieselResultRepository::new(pool.clone()));
    let sessions = Arc::new(DieselAcademicSessionRepository::new(pool.clone()));
    let files = Arc::new(build_file_store(config)?);
    let clock = Arc::new(DefaultClock);

    Ok(HttpStatePorts {
        login: Arc::new(DieselLoginService::new(DieselUserRepository::new(
            pool.clone(),
        ))),
        profile: Arc::new(ProfileService::new(users.clone())),
        dashboard: Arc::new(DashboardService::new(
            documents.clone(),
            results.clone(),
            users.clone(),
        )),
        documents: Arc::new(DocumentWorkflowService::new(
            documents,
            users.clone(),
            files.clone(),
            clock.clone(),
        )),
        results: Arc::new(ResultWorkflowService::new(
            results, users, sessions, files, clock,
        )),
    })
}

/// Fixture ports serving the API without any infrastructure.
fn build_fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        profile: Arc::new(FixtureUserProfileQuery),
        dashboard: Arc::new(FixtureDashboardQuery),
        documents: Arc::new(FixtureDocumentWorkflow),
        results: Arc::new(FixtureResultWorkflow),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = match &config.db_pool {
        Some(pool) => build_database_ports(config, pool)?,
        None => build_fixture_ports(),
    };
    Ok(web::Data::new(HttpState::with_max_upload_bytes(
        ports,
        config.max_upload_bytes,
    )))
}
