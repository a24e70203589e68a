//! Startup wiring for demonstration account seeding.

mod config;
mod startup;

pub use config::DemoDataSettings;
pub use startup::{StartupSeedingError, seed_demo_accounts_on_startup};
