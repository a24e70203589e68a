//! HTTP server configuration object and settings loading.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;
use crate::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_ROOT: &str = "uploads";
const DEFAULT_DRIVE_TIMEOUT_SECONDS: u64 = 30;

/// Server settings resolved from CLI arguments, environment, and file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVER")]
pub struct ServerSettings {
    /// Socket address the server binds to.
    pub bind_addr: Option<String>,
    /// Whether session cookies require HTTPS transport.
    #[ortho_config(default = true, skip_cli)]
    pub cookie_secure: bool,
    /// PostgreSQL connection string; fixtures are used when absent.
    pub database_url: Option<String>,
    /// Root directory for locally stored uploads.
    pub upload_root: Option<PathBuf>,
    /// Base URL of the cloud drive endpoint; local-only storage when absent.
    pub drive_endpoint: Option<String>,
    /// Request timeout for drive calls, in seconds.
    pub drive_timeout_seconds: Option<u64>,
    /// Maximum decoded upload size in bytes.
    pub max_upload_bytes: Option<usize>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured upload root, falling back to the default.
    pub fn upload_root(&self) -> PathBuf {
        self.upload_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT))
    }

    /// Return the configured drive timeout, falling back to the default.
    pub fn drive_timeout(&self) -> Duration {
        Duration::from_secs(
            self.drive_timeout_seconds
                .unwrap_or(DEFAULT_DRIVE_TIMEOUT_SECONDS),
        )
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) upload_root: PathBuf,
    pub(crate) drive_endpoint: Option<Url>,
    pub(crate) drive_timeout: Duration,
    pub(crate) max_upload_bytes: usize,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            upload_root: PathBuf::from(DEFAULT_UPLOAD_ROOT),
            drive_endpoint: None,
            drive_timeout: Duration::from_secs(DEFAULT_DRIVE_TIMEOUT_SECONDS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for
    /// every port; without it, fixture implementations serve the API.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the root directory for locally stored uploads.
    #[must_use]
    pub fn with_upload_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.upload_root = root.into();
        self
    }

    /// Attach a cloud drive endpoint with a request timeout.
    #[must_use]
    pub fn with_drive(mut self, endpoint: Url, timeout: Duration) -> Self {
        self.drive_endpoint = Some(endpoint);
        self.drive_timeout = timeout;
        self
    }

    /// Override the maximum decoded upload size in bytes.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and config defaults.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("SERVER_BIND_ADDR", None::<String>),
            ("SERVER_COOKIE_SECURE", None::<String>),
            ("SERVER_DATABASE_URL", None::<String>),
            ("SERVER_UPLOAD_ROOT", None::<String>),
            ("SERVER_DRIVE_ENDPOINT", None::<String>),
            ("SERVER_DRIVE_TIMEOUT_SECONDS", None::<String>),
            ("SERVER_MAX_UPLOAD_BYTES", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.cookie_secure);
        assert!(settings.database_url.is_none());
        assert_eq!(settings.upload_root(), PathBuf::from(DEFAULT_UPLOAD_ROOT));
        assert_eq!(
            settings.drive_timeout(),
            Duration::from_secs(DEFAULT_DRIVE_TIMEOUT_SECONDS)
        );
        assert!(settings.max_upload_bytes.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SERVER_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("SERVER_COOKIE_SECURE", Some("false".to_owned())),
            ("SERVER_UPLOAD_ROOT", Some("/srv/uploads".to_owned())),
            ("SERVER_DRIVE_TIMEOUT_SECONDS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert!(!settings.cookie_secure);
        assert_eq!(settings.upload_root(), PathBuf::from("/srv/uploads"));
        assert_eq!(settings.drive_timeout(), Duration::from_secs(5));
    }
}
