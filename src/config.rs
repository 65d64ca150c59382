use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared HMAC secret used to sign bearer tokens.
    /// Overridden by the `SIGN_KEY` environment variable.
    pub sign_key: String,

    /// Lifetime of an issued token in hours.
    pub token_ttl_hours: u64,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sign_key: String::new(),
            token_ttl_hours: 24 * 7,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/worker-missions.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

impl Config {
    /// Loads `.env`, then the first config file found, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `SIGN_KEY`, `PORT` and `DATABASE_URL` on top of file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SIGN_KEY").filter(|k| !k.is_empty()) {
            self.security.sign_key = key;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.general.database_path = url;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("worker-missions").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".worker-missions").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default config with a freshly generated signing key.
    /// Returns false if a config file already exists.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            return Ok(false);
        }

        let mut config = Self::default();
        config.security.sign_key = generate_sign_key();
        config.save_to_path(&path)?;
        info!("Created default config file: {}", path.display());
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.sign_key.trim().is_empty() {
            anyhow::bail!(
                "No token signing key configured. Set SIGN_KEY or security.sign_key in config.toml"
            );
        }

        if self.security.token_ttl_hours == 0 {
            anyhow::bail!("security.token_ttl_hours must be > 0");
        }

        if self.general.database_path.is_empty() {
            anyhow::bail!("general.database_path cannot be empty");
        }

        Ok(())
    }
}

/// Random 64-character hex secret.
#[must_use]
pub fn generate_sign_key() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.token_ttl_hours, 168);
        assert!(config.security.sign_key.is_empty());
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_default_config_requires_sign_key() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.security.sign_key = "secret".to_string();
        assert!(config.validate().is_ok());

        config.security.token_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[security]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            sign_key = "abc"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.sign_key, "abc");

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.argon2_time_cost, 3);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SIGN_KEY", "from-env"),
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]);

        let mut config = Config::default();
        config
            .apply_env_overrides(|k| env.get(k).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.security.sign_key, "from-env");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.general.database_path, "sqlite::memory:");
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_sign_key_shape() {
        let key = generate_sign_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
