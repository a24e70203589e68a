//! Demo data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DEPARTMENT: &str = "Computer Science";

/// Configuration values controlling demo account seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEMO_DATA")]
pub struct DemoDataSettings {
    /// Enable demo account seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Department the demo accounts belong to.
    pub department: Option<String>,
}

impl DemoDataSettings {
    /// Return the configured department name, falling back to the default.
    pub fn department(&self) -> &str {
        self.department.as_deref().unwrap_or(DEFAULT_DEPARTMENT)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for demo data configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> DemoDataSettings {
        DemoDataSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("DEMO_DATA_ENABLED", None::<String>),
            ("DEMO_DATA_DEPARTMENT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert_eq!(settings.department(), DEFAULT_DEPARTMENT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("DEMO_DATA_ENABLED", Some("true".to_owned())),
            ("DEMO_DATA_DEPARTMENT", Some("Mathematics".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert_eq!(settings.department(), "Mathematics");
    }
}
