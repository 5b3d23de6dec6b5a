//! Runtime configuration.
//!
//! Settings come from the environment, the way the deployment passes them
//! in. Tests use `ApiConfig::default_test()`.

use serde::{Deserialize, Serialize};

/// Environment variable naming the SQLite database file.
pub const DB_PATH_VAR: &str = "REFERRALS_DB";

const DEFAULT_DB_PATH: &str = "referrals.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub db_path: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let db_path =
            std::env::var(DB_PATH_VAR).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        Self { db_path }
    }

    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".to_string(),
        }
    }
}
