use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Longest accepted lookahead interval: one week.
const MAX_NEAR_TAKING_INTERVAL_MINUTES: i64 = 7 * 24 * 60;

/// Deployment environment. Selects the log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env: Environment,
    pub http: HttpConfig,
    pub rpc: RpcConfig,
    pub database: DatabaseConfig,
    /// Minutes after "now" in which a dose counts as upcoming.
    pub near_taking_interval_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            http: HttpConfig::default(),
            rpc: RpcConfig::default(),
            database: DatabaseConfig::default(),
            near_taking_interval_minutes: 60,
        }
    }
}

impl AppConfig {
    /// Build the config for this process.
    ///
    /// Reads `.env`, then the YAML file named by `CONFIG_PATH` when it is set,
    /// then applies the `DATABASE_URL` override.
    pub fn load() -> Result<Self> {
        load_dotenv();

        let config_path = env_opt("CONFIG_PATH");
        let mut config = match config_path {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(url) = env_opt("DATABASE_URL") {
            config.database.url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_NEAR_TAKING_INTERVAL_MINUTES).contains(&self.near_taking_interval_minutes) {
            anyhow::bail!(
                "near_taking_interval_minutes must be between 1 and {}, got {}",
                MAX_NEAR_TAKING_INTERVAL_MINUTES,
                self.near_taking_interval_minutes
            );
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    pub fn lookahead(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.near_taking_interval_minutes)
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (env: {:?}):", self.env);
        tracing::info!("  http:      address={}, timeout={}s", self.http.address, self.http.timeout_secs);
        tracing::info!("  rpc:       address={}", self.rpc.address);
        tracing::info!("  database:  max_connections={}", self.database.max_connections);
        tracing::info!("  lookahead: {} minutes", self.near_taking_interval_minutes);
    }
}

// ── HTTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub address: String,
    pub timeout_secs: u64,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            timeout_secs: 10,
            cors_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── RPC ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub address: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:50051".to_string(),
        }
    }
}

// ── Database ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:pills_reminder.db".to_string(),
            max_connections: 5,
        }
    }
}
