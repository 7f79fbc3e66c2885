//! Server configuration and catalog files.

use std::{
    collections::HashSet,
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use grow_defence_core::Catalogs;
use grow_defence_system_breeding::InheritanceResolver;
use serde::Deserialize;
use thiserror::Error;

/// Configuration file version understood by this build.
pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Port bound when the configuration does not name an address.
pub const DEFAULT_PORT: u16 = 8787;

/// Failure to load the server configuration or its catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// File is not valid TOML for the expected shape.
    #[error("failed to parse {what}: {source}")]
    Parse {
        /// Which document failed to parse.
        what: &'static str,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// Configuration declares a version this build does not understand.
    #[error("unsupported config version {found}; expected {SUPPORTED_CONFIG_VERSION}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },
    /// Two sessions share one token.
    #[error("duplicate session token for user {user:?}")]
    DuplicateToken {
        /// User of the second entry with the token.
        user: String,
    },
    /// A session entry has an empty token or user.
    #[error("session entries need a non-empty token and user")]
    EmptySession,
}

/// Static bearer token accepted by the built-in session verifier.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionEntry {
    /// Bearer token presented by the client.
    pub token: String,
    /// User the token authenticates.
    pub user: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BreedingSection {
    #[serde(default)]
    resolver: Option<InheritanceResolver>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    version: u32,
    #[serde(default)]
    bind: Option<SocketAddr>,
    #[serde(default)]
    catalog: Option<PathBuf>,
    #[serde(default)]
    breeding: BreedingSection,
    #[serde(default)]
    sessions: Vec<SessionEntry>,
}

/// Validated server configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Catalog file, already resolved against the configuration directory.
    pub catalog: Option<PathBuf>,
    /// Resolver used for persisted breeding results.
    pub resolver: InheritanceResolver,
    /// Accepted bearer tokens.
    pub sessions: Vec<SessionEntry>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            catalog: None,
            resolver: InheritanceResolver::WeightedBlend,
            sessions: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Reads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = read(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&contents, base)
    }

    /// Parses configuration text, resolving relative paths against `base`.
    pub fn parse(contents: &str, base: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            what: "server config",
            source,
        })?;
        if raw.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion { found: raw.version });
        }

        let mut seen = HashSet::new();
        for session in &raw.sessions {
            if session.token.trim().is_empty() || session.user.trim().is_empty() {
                return Err(ConfigError::EmptySession);
            }
            if !seen.insert(session.token.as_str()) {
                return Err(ConfigError::DuplicateToken {
                    user: session.user.clone(),
                });
            }
        }

        let defaults = Self::default();
        Ok(Self {
            bind: raw.bind.unwrap_or(defaults.bind),
            catalog: raw.catalog.map(|catalog| base.join(catalog)),
            resolver: raw.breeding.resolver.unwrap_or(defaults.resolver),
            sessions: raw.sessions,
        })
    }
}

/// Reads the catalog TOML at `path`.
pub fn load_catalogs(path: &Path) -> Result<Catalogs, ConfigError> {
    parse_catalogs(&read(path)?)
}

/// Parses catalog TOML text.
pub fn parse_catalogs(contents: &str) -> Result<Catalogs, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        what: "catalog",
        source,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = ServerConfig::parse(
            r#"
            version = 1
            bind = "0.0.0.0:9000"
            catalog = "catalog.toml"

            [breeding]
            resolver = "mode_based"

            [[sessions]]
            token = "secret"
            user = "grower"
            "#,
            Path::new("/etc/grow"),
        )
        .expect("config parses");

        assert_eq!(config.bind, "0.0.0.0:9000".parse().expect("addr"));
        assert_eq!(config.catalog, Some(PathBuf::from("/etc/grow/catalog.toml")));
        assert_eq!(config.resolver, InheritanceResolver::ModeBased);
        assert_eq!(config.sessions.len(), 1);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ServerConfig::parse("version = 1", Path::new("")).expect("config parses");
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn rejects_unknown_version() {
        let error = ServerConfig::parse("version = 2", Path::new("")).expect_err("rejected");
        assert!(matches!(error, ConfigError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn rejects_duplicate_tokens() {
        let error = ServerConfig::parse(
            r#"
            version = 1
            [[sessions]]
            token = "a"
            user = "one"
            [[sessions]]
            token = "a"
            user = "two"
            "#,
            Path::new(""),
        )
        .expect_err("rejected");
        assert!(matches!(error, ConfigError::DuplicateToken { .. }));
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = ServerConfig::parse("version = 1\nport = 80", Path::new(""))
            .expect_err("rejected");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn parses_catalog_tables() {
        let catalogs = parse_catalogs(
            r#"
            [[pests]]
            id = "aphid"
            type = "aphid"
            health = 40.0
            speed = 1.2
            damage_per_second = 2.0
            unlock_level = 1

            [[environmental_bosses]]
            id = "frost"
            name = "Frost Weevil"
            min_level = 6
            seasons = ["winter"]
            "#,
        )
        .expect("catalog parses");
        assert_eq!(catalogs.pests.len(), 1);
        assert_eq!(catalogs.environmental_bosses[0].weather, Vec::new());
        assert!(catalogs.bosses.is_empty());
    }
}
