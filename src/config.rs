use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub draft: Draft,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Backend {
    pub base_url: String,
    /// 0 disables the request timeout.
    pub timeout_seconds: u64,
    pub check_health_on_start: bool,
}
impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_seconds: 120,
            check_health_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub enabled: bool,
    pub state_dir: String,
    pub quiet_period_ms: u64,
    pub max_age_hours: u64,
}
impl Default for Draft {
    fn default() -> Self {
        Self {
            enabled: true,
            state_dir: ".docintel".into(),
            quiet_period_ms: 1000,
            max_age_hours: 24,
        }
    }
}
impl Draft {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours * 60 * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub json: bool,
    pub cleanup_on_exit: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            json: false,
            cleanup_on_exit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
