//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (applied by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing TOML file is not an error: the service logs a warning and
//! continues with defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bom-server.toml";

/// Compiled defaults
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "sqlite://bom.db?mode=ro";
    pub const DIRECT_TABLE: &str = "translate/tr-to-cn.json";
    pub const FALLBACK_TABLE: &str = "translate/fallback-tr-to-cn.json";
    pub const CATALOG_TIMEOUT_SECS: u64 = 30;
    /// Upstream catalog ceiling (requests/second)
    pub const CATALOG_MAX_REQUESTS_PER_SECOND: u32 = 20;
    /// Pause between consecutive catalog requests in a verification sweep
    pub const VERIFICATION_DELAY_MS: u64 = 100;
}

/// Environment variable names
pub mod env_vars {
    pub const HOST: &str = "BOM_HOST";
    pub const PORT: &str = "BOM_PORT";
    pub const DATABASE_URL: &str = "BOM_DATABASE_URL";
    pub const DIRECT_TABLE: &str = "BOM_TRANSLATION_DIRECT";
    pub const FALLBACK_TABLE: &str = "BOM_TRANSLATION_FALLBACK";
    pub const CATALOG_URL: &str = "BOM_CATALOG_URL";
    pub const CATALOG_PATH: &str = "BOM_CATALOG_PATH";
    pub const CATALOG_TOKEN: &str = "BOM_CATALOG_TOKEN";
    pub const CATALOG_TIMEOUT_SECS: &str = "BOM_CATALOG_TIMEOUT_SECS";
    pub const CATALOG_MAX_RPS: &str = "BOM_CATALOG_MAX_RPS";
    pub const VERIFICATION_DELAY_MS: &str = "BOM_VERIFY_DELAY_MS";
}

/// On-disk TOML schema. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub translation: TranslationSection,
    pub catalog: CatalogSection,
    pub verification: VerificationSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSection {
    pub direct_table: Option<PathBuf>,
    pub fallback_table: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_requests_per_second: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationSection {
    pub delay_ms: Option<u64>,
}

/// Read the TOML config file
///
/// A missing file yields defaults with a warning; an unreadable or
/// malformed file is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found: {} (using environment and defaults)",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Translation data file locations
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationPaths {
    pub direct_table: PathBuf,
    pub fallback_table: PathBuf,
}

/// External product catalog settings
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Duration,
    pub max_requests_per_second: u32,
}

impl CatalogSettings {
    /// Full lookup URL, if both URL parts are configured
    pub fn endpoint(&self) -> Option<String> {
        match (&self.base_url, &self.path) {
            (Some(base), Some(path)) => Some(format!("{}{}", base, path)),
            _ => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some() && self.auth_token.is_some()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub translation: TranslationPaths,
    pub catalog: CatalogSettings,
    pub verification_delay: Duration,
}

impl ServiceConfig {
    /// Resolve settings from environment variables over the TOML values
    pub fn resolve(toml: &TomlConfig) -> Result<Self> {
        let host = env_value(env_vars::HOST)
            .or_else(|| toml.server.host.clone())
            .unwrap_or_else(|| defaults::HOST.to_string());

        let port = match env_value(env_vars::PORT) {
            Some(raw) => parse_env(env_vars::PORT, &raw)?,
            None => toml.server.port.unwrap_or(defaults::PORT),
        };

        let database_url = env_value(env_vars::DATABASE_URL)
            .or_else(|| toml.database.url.clone())
            .unwrap_or_else(|| defaults::DATABASE_URL.to_string());

        let translation = TranslationPaths {
            direct_table: env_value(env_vars::DIRECT_TABLE)
                .map(PathBuf::from)
                .or_else(|| toml.translation.direct_table.clone())
                .unwrap_or_else(|| PathBuf::from(defaults::DIRECT_TABLE)),
            fallback_table: env_value(env_vars::FALLBACK_TABLE)
                .map(PathBuf::from)
                .or_else(|| toml.translation.fallback_table.clone())
                .unwrap_or_else(|| PathBuf::from(defaults::FALLBACK_TABLE)),
        };

        let timeout_secs = match env_value(env_vars::CATALOG_TIMEOUT_SECS) {
            Some(raw) => parse_env(env_vars::CATALOG_TIMEOUT_SECS, &raw)?,
            None => toml
                .catalog
                .timeout_secs
                .unwrap_or(defaults::CATALOG_TIMEOUT_SECS),
        };

        let max_requests_per_second = match env_value(env_vars::CATALOG_MAX_RPS) {
            Some(raw) => parse_env(env_vars::CATALOG_MAX_RPS, &raw)?,
            None => toml
                .catalog
                .max_requests_per_second
                .unwrap_or(defaults::CATALOG_MAX_REQUESTS_PER_SECOND),
        };
        if max_requests_per_second == 0 {
            return Err(Error::Config(
                "catalog.max_requests_per_second must be greater than zero".to_string(),
            ));
        }

        let catalog = CatalogSettings {
            base_url: env_value(env_vars::CATALOG_URL).or_else(|| non_blank(&toml.catalog.base_url)),
            path: env_value(env_vars::CATALOG_PATH).or_else(|| non_blank(&toml.catalog.path)),
            auth_token: env_value(env_vars::CATALOG_TOKEN)
                .or_else(|| non_blank(&toml.catalog.auth_token)),
            timeout: Duration::from_secs(timeout_secs),
            max_requests_per_second,
        };

        let delay_ms = match env_value(env_vars::VERIFICATION_DELAY_MS) {
            Some(raw) => parse_env(env_vars::VERIFICATION_DELAY_MS, &raw)?,
            None => toml
                .verification
                .delay_ms
                .unwrap_or(defaults::VERIFICATION_DELAY_MS),
        };

        Ok(Self {
            host,
            port,
            database_url,
            translation,
            catalog,
            verification_delay: Duration::from_millis(delay_ms),
        })
    }
}

/// Non-blank environment variable value
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {}", name, raw)))
}
