//! Configuration types for Ticklist

use crate::catalog::{Catalog, CatalogError};
use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TicklistConfig {
    /// MCP server configuration
    pub server: ServerConfig,

    /// Catalog seeding and addressing
    pub catalog: CatalogConfig,

    /// Stub HTTP API configuration
    pub http: HttpConfig,
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name reported during initialize
    pub name: String,

    /// Server version reported during initialize
    pub version: String,

    /// Whether to expose tools
    pub enable_tools: bool,

    /// Whether to expose resources
    pub enable_resources: bool,

    /// Tool allowlist (None = allow all registered tools)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_allowlist: Option<Vec<String>>,

    /// Locale for caller-visible text
    pub locale: Locale,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "ticklist".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_tools: true,
            enable_resources: true,
            tool_allowlist: None,
            locale: Locale::default(),
        }
    }
}

/// A record to place in the catalog at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    /// Explicit id; when absent the catalog assigns the next free one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub completed: bool,
}

impl SeedEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            completed,
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URI scheme used for resource addresses (`<scheme>:///<id>`)
    pub uri_scheme: String,

    /// Records present at startup
    pub seed: Vec<SeedEntry>,
}

fn default_seed() -> Vec<SeedEntry> {
    vec![
        SeedEntry::new("1", "Write spec", true),
        SeedEntry::new("2", "Implement", true),
        SeedEntry::new("3", "Test", false),
    ]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            uri_scheme: "todo".to_string(),
            seed: default_seed(),
        }
    }
}

impl CatalogConfig {
    /// Build a catalog from the configured seed
    pub fn build_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_seed(&self.seed)
    }
}

/// Stub HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to bind
    pub bind: SocketAddr,

    /// Path prefix the API routes are mounted under
    pub base_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            base_path: "/api".to_string(),
        }
    }
}

impl TicklistConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (ticklist.toml)
    /// 3. File named by TICKLIST_CONFIG_PATH, if set
    /// 4. Environment variable overrides (`TICKLIST_SERVER__LOCALE=ja`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid or the merged
    /// configuration fails validation.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(TicklistConfig::default()))
            .merge(Toml::file("ticklist.toml"));

        if let Ok(path) = std::env::var("TICKLIST_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: TicklistConfig = figment
            .merge(Env::prefixed("TICKLIST_").ignore(&["CONFIG_PATH"]).split("__"))
            .extract()
            .map_err(|e| {
                crate::error::TicklistError::Configuration(format!(
                    "Failed to load configuration: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.is_file() {
            return Err(crate::error::TicklistError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: TicklistConfig = Figment::from(Serialized::defaults(TicklistConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                crate::error::TicklistError::Configuration(format!(
                    "Failed to load configuration file: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty server name or URI scheme, a seed entry
    /// with an empty title, or duplicate seed ids.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TicklistError;

        if self.server.name.trim().is_empty() {
            return Err(TicklistError::Configuration(
                "server.name must not be empty".to_string(),
            ));
        }

        let scheme = &self.catalog.uri_scheme;
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(TicklistError::Configuration(format!(
                "catalog.uri_scheme is not a valid URI scheme: {:?}",
                scheme
            )));
        }

        let mut seen = HashSet::new();
        for entry in &self.catalog.seed {
            if entry.title.trim().is_empty() {
                return Err(TicklistError::Configuration(
                    "catalog.seed entries need a non-empty title".to_string(),
                ));
            }
            if let Some(id) = &entry.id {
                if !seen.insert(id.as_str()) {
                    return Err(TicklistError::Configuration(format!(
                        "catalog.seed has duplicate id {}",
                        id
                    )));
                }
            }
        }

        if !self.http.base_path.starts_with('/') {
            return Err(TicklistError::Configuration(
                "http.base_path must start with '/'".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = TicklistConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.seed.len(), 3);
        assert_eq!(config.server.locale, Locale::En);
    }

    #[test]
    fn test_load_merges_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ticklist.toml",
                r#"
                [server]
                name = "my-todos"

                [[catalog.seed]]
                title = "Only entry"
                "#,
            )?;
            jail.set_env("TICKLIST_SERVER__LOCALE", "ja");
            jail.set_env("TICKLIST_HTTP__BIND", "0.0.0.0:9000");

            let config = TicklistConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.server.name, "my-todos");
            assert_eq!(config.server.locale, Locale::Ja);
            assert_eq!(config.http.bind.port(), 9000);
            assert_eq!(config.catalog.seed.len(), 1);
            assert!(config.server.enable_tools);
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_duplicate_seed_ids() {
        let mut config = TicklistConfig::default();
        config.catalog.seed.push(SeedEntry::new("1", "Again", false));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let mut config = TicklistConfig::default();
        config.catalog.uri_scheme = "to do".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(TicklistConfig::from_file("/nonexistent/ticklist.toml").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[catalog]\nuri_scheme = \"task\"\n\n[http]\nbase_path = \"/v1\"\n",
        )
        .unwrap();

        let config = TicklistConfig::from_file(&path).unwrap();
        assert_eq!(config.catalog.uri_scheme, "task");
        assert_eq!(config.http.base_path, "/v1");
        assert_eq!(config.catalog.seed.len(), 3);
    }
}
