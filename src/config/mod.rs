//! Configuration loading for the portal
//!
//! Settings come from a YAML file (path in `PORTAL_CONFIG`, default
//! `config/portal.yaml`). Every section has defaults, so a missing file or a
//! partial one is fine. A handful of environment variables override the file.

use crate::core::error::ConfigError;
use crate::render::OrganizationProfile;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/portal.yaml";

/// Placeholder secret shipped in the defaults; refused once accounts exist
pub const DEFAULT_JWT_SECRET: &str = "change-me";

/// Storage backends understood by `storage.backend`
pub const STORAGE_BACKENDS: &[&str] = &["in_memory", "mongodb"];

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub organization: OrganizationProfile,
    pub receipts: ReceiptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Origins allowed by CORS; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `in_memory` or `mongodb`
    pub backend: String,
    pub mongodb_uri: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: "ngo_portal".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,

    /// Roles that unlock the admin API
    pub admin_roles: Vec<String>,

    pub accounts: Vec<AccountConfig>,

    /// Mark the session cookie `Secure` (enable behind HTTPS)
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            session_ttl_hours: 24,
            admin_roles: vec!["admin".to_string()],
            accounts: Vec::new(),
            secure_cookies: false,
        }
    }
}

/// A login account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    #[serde(default)]
    pub name: String,

    /// Hex SHA-256 of the password
    pub password_hash: String,

    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    pub receipt_prefix: String,
    pub membership_prefix: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            receipt_prefix: "RCPT".to_string(),
            membership_prefix: "MEM".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load from `PORTAL_CONFIG` (or the default path), apply environment
    /// overrides and validate
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = env("PORTAL_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            tracing::info!(path = %path, "loading configuration");
            Self::from_yaml_file(&path)?
        } else {
            tracing::info!(path = %path, "configuration file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides_from(env);
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORTAL_*` overrides from an arbitrary lookup
    pub fn apply_env_overrides_from(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = env("PORTAL_BIND") {
            self.server.bind = bind;
        }
        if let Some(secret) = env("PORTAL_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(uri) = env("PORTAL_MONGODB_URI") {
            self.storage.mongodb_uri = uri;
        }
        if let Some(database) = env("PORTAL_MONGODB_DATABASE") {
            self.storage.database = database;
        }
        if let Some(backend) = env("PORTAL_STORAGE") {
            self.storage.backend = backend;
        }
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "storage.backend".to_string(),
                value: self.storage.backend.clone(),
                message: format!("expected one of {}", STORAGE_BACKENDS.join(", ")),
            });
        }

        let secret = self.auth.jwt_secret.trim();
        if !self.auth.accounts.is_empty() && (secret.is_empty() || secret == DEFAULT_JWT_SECRET) {
            return Err(ConfigError::InvalidValue {
                field: "auth.jwt_secret".to_string(),
                value: "<redacted>".to_string(),
                message: "set a non-default secret before configuring accounts".to_string(),
            });
        }

        if self.auth.admin_roles.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.admin_roles".to_string(),
                value: "[]".to_string(),
                message: "at least one admin role is required".to_string(),
            });
        }

        if self.auth.session_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.session_ttl_hours".to_string(),
                value: self.auth.session_ttl_hours.to_string(),
                message: "must be positive".to_string(),
            });
        }

        for account in &self.auth.accounts {
            let hash = &account.password_hash;
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidValue {
                    field: "auth.accounts.password_hash".to_string(),
                    value: account.email.clone(),
                    message: "must be a hex SHA-256 digest".to_string(),
                });
            }
        }

        Ok(())
    }
}
