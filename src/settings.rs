use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ROSTER_URL: &str = "https://dhhs.ne.gov/licensure/Documents/ChildCareRoster.pdf";

/// Runtime settings; every field can be overridden with a `ROSTER_*` variable.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pdf_url: String,
    pub pdf_dir: PathBuf,
    pub data_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix("ROSTER"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("pdf_url", ROSTER_URL)?
            .set_default("pdf_dir", "pdfs")?
            .set_default("data_dir", "data")?
            .set_default("timeout_secs", 60)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
