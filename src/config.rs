// Configuration: where to connect and how loud to log.
//
// Values are resolved in three layers, later ones winning:
// 1. built-in defaults (a local mongod, `test_db.sales`)
// 2. `~/.sales-crud.json`, if it exists
// 3. environment variables (`SALES_MONGODB_URI`, `SALES_DATABASE`,
//    `SALES_COLLECTION`, `RUST_LOG`)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".sales-crud.json";

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolved settings for one run of the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// MongoDB connection string, may carry credentials.
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

/// Shape of the optional JSON file. Every key may be omitted.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    uri: Option<String>,
    database: Option<String>,
    collection: Option<String>,
    log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test_db".to_string(),
            collection: "sales".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load defaults, then the home directory file, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(path) = default_config_path() {
            config.merge_file(&path)?;
        }
        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from a JSON file. A missing file leaves the
    /// config untouched.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let file: FileConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(uri) = file.uri {
            self.uri = uri;
        }
        if let Some(database) = file.database {
            self.database = database;
        }
        if let Some(collection) = file.collection {
            self.collection = collection;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        Ok(())
    }

    /// Overlay values from environment-style lookups. Empty values are
    /// ignored. Takes a lookup function so tests don't touch the real
    /// process environment.
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(uri) = get("SALES_MONGODB_URI") {
            self.uri = uri;
        }
        if let Some(database) = get("SALES_DATABASE") {
            self.database = database;
        }
        if let Some(collection) = get("SALES_COLLECTION") {
            self.collection = collection;
        }
        if let Some(level) = get("RUST_LOG") {
            self.log_level = level;
        }
    }

    /// The connection string with any `user:password@` part masked, safe
    /// to print or log.
    pub fn redacted_uri(&self) -> String {
        let Some(scheme_end) = self.uri.find("://") else {
            return self.uri.clone();
        };
        let rest = &self.uri[scheme_end + 3..];
        let authority_end = rest.find('/').unwrap_or(rest.len());
        match rest[..authority_end].rfind('@') {
            Some(at) => format!("{}://***{}", &self.uri[..scheme_end], &rest[at..]),
            None => self.uri.clone(),
        }
    }
}

/// `~/.sales-crud.json`, or `None` when the home directory is unknown.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "test_db");
        assert_eq!(config.collection, "sales");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.merge_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"database": "prod", "log_level": "debug"}}"#).unwrap();

        let mut config = Config::default();
        config.merge_file(file.path()).unwrap();
        assert_eq!(config.database, "prod");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.collection, "sales");
        assert_eq!(config.uri, "mongodb://localhost:27017");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::default().merge_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        // the serde error is only reachable as the source
        assert_eq!(
            err.to_string(),
            format!("Failed to parse config file {}", file.path().display())
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"databse": "typo"}}"#).unwrap();

        assert!(Config::default().merge_file(file.path()).is_err());
    }

    #[test]
    fn env_overrides_and_skips_empty_values() {
        let env: HashMap<&str, &str> = [
            ("SALES_MONGODB_URI", "mongodb://db.internal:27017/test_db"),
            ("SALES_COLLECTION", "  "),
            ("RUST_LOG", "sales_crud=debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.merge_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.uri, "mongodb://db.internal:27017/test_db");
        assert_eq!(config.collection, "sales");
        assert_eq!(config.database, "test_db");
        assert_eq!(config.log_level, "sales_crud=debug");
    }

    #[test]
    fn redacts_credentials() {
        let config = Config {
            uri: "mongodb://admin:s3cr@t@10.0.0.5/test_db".to_string(),
            ..Config::default()
        };
        assert_eq!(config.redacted_uri(), "mongodb://***@10.0.0.5/test_db");
    }

    #[test]
    fn redaction_leaves_plain_uris_alone() {
        let config = Config::default();
        assert_eq!(config.redacted_uri(), "mongodb://localhost:27017");

        let config = Config {
            uri: "mongodb://host/db?authSource=a@b".to_string(),
            ..Config::default()
        };
        assert_eq!(config.redacted_uri(), "mongodb://host/db?authSource=a@b");
    }
}
