//! Session key bootstrap and fingerprinting.
//!
//! The session signing key is read from a file so it survives restarts and
//! can be rotated without a rebuild. Debug builds (or deployments that
//! explicitly opt in) fall back to an ephemeral key, which invalidates every
//! session on restart. A truncated SHA-256 fingerprint of the active key is
//! logged on startup so operators can verify rotations without exposing key
//! material.

use std::path::PathBuf;

use actix_web::cookie::Key;
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Errors raised while loading the session signing key.
#[derive(thiserror::Error, Debug)]
pub enum SessionKeyError {
    /// Reading the session key file failed and no fallback applies.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the session signing key from the configured key file.
///
/// The path comes from `SESSION_KEY_FILE`, defaulting to
/// `/var/run/secrets/session_key`. When the file is unreadable, debug builds
/// and deployments with `SESSION_ALLOW_EPHEMERAL=1` generate a temporary key
/// with a warning; release builds fail.
pub fn load_session_key<E: Env>(env: &E) -> Result<Key, SessionKeyError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_string());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            let allow_ephemeral = env.string(ALLOW_EPHEMERAL_ENV).as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionKeyError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

/// Generate a truncated SHA-256 fingerprint of the key's signing material.
///
/// Returns the first 8 bytes of the SHA-256 hash as a 16-character hex
/// string, enough for visual distinction in logs and rotation runbooks
/// without being security-sensitive.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let signing_bytes = key.signing();
    let mut hasher = Sha256::new();
    hasher.update(signing_bytes);
    let result = hasher.finalize();
    hex::encode(&result[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use mockable::MockEnv;
    use rstest::rstest;

    use super::*;

    fn env_returning(key_file: Option<String>, allow_ephemeral: Option<String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| match name {
            KEY_FILE_ENV => key_file.clone(),
            ALLOW_EPHEMERAL_ENV => allow_ephemeral.clone(),
            _ => None,
        });
        env
    }

    #[rstest]
    fn key_is_derived_from_the_file_contents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let key_path = dir.path().join("session_key");
        std::fs::write(&key_path, vec![b'a'; 64]).expect("write key file");
        let env = env_returning(
            Some(key_path.to_string_lossy().into_owned()),
            Some("0".to_owned()),
        );

        let key = load_session_key(&env).expect("key loads");
        assert_eq!(
            key_fingerprint(&key),
            key_fingerprint(&Key::derive_from(&[b'a'; 64]))
        );
    }

    #[rstest]
    fn missing_key_file_falls_back_when_ephemeral_is_allowed() {
        let env = env_returning(Some("/nonexistent/session_key".to_owned()), Some("1".to_owned()));

        load_session_key(&env).expect("ephemeral key generated");
    }

    #[cfg(not(debug_assertions))]
    #[rstest]
    fn missing_key_file_fails_in_release_builds() {
        let env = env_returning(Some("/nonexistent/session_key".to_owned()), None);

        let err = load_session_key(&env).expect_err("release builds require the key file");
        assert!(matches!(err, SessionKeyError::KeyRead { .. }));
    }

    #[rstest]
    fn fingerprint_is_deterministic_and_hex() {
        let key = Key::derive_from(&[b'a'; 64]);

        let fp = key_fingerprint(&key);
        assert_eq!(fp, key_fingerprint(&key));
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn different_keys_produce_different_fingerprints() {
        let fp1 = key_fingerprint(&Key::derive_from(&[b'a'; 64]));
        let fp2 = key_fingerprint(&Key::derive_from(&[b'b'; 64]));
        assert_ne!(fp1, fp2);
    }
}
