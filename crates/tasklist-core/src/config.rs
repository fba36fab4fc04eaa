//! Runtime configuration.
//!
//! | env var | default | meaning |
//! |---|---|---|
//! | `TASKLIST_BACKEND` | `sqlite` | `sqlite` or `memory` |
//! | `TASKLIST_DB_PATH` | unset (in-memory SQLite) | SQLite file path |
//! | `TASKLIST_LOG_FORMAT` | `pretty` | `pretty` or `json` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::TaskError;
use crate::impls::{InMemoryDatabase, SqliteDatabase};
use crate::observability::LogFormat;
use crate::ports::Database;

pub const ENV_BACKEND: &str = "TASKLIST_BACKEND";
pub const ENV_DB_PATH: &str = "TASKLIST_DB_PATH";
pub const ENV_LOG_FORMAT: &str = "TASKLIST_LOG_FORMAT";

/// ConfigError は設定の読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be one of {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("TASKLIST_DB_PATH cannot be used with the memory backend")]
    PathWithMemoryBackend,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

impl Backend {
    /// Open a database of this kind. `path = None` means in-memory.
    pub fn open(self, path: Option<&std::path::Path>) -> Result<Arc<dyn Database>, TaskError> {
        let db: Arc<dyn Database> = match (self, path) {
            (Backend::Sqlite, Some(path)) => Arc::new(SqliteDatabase::open(path)?),
            (Backend::Sqlite, None) => Arc::new(SqliteDatabase::open_in_memory()?),
            (Backend::Memory, _) => Arc::new(InMemoryDatabase::new()),
        };
        Ok(db)
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            _ => Err(ConfigError::Invalid {
                name: ENV_BACKEND,
                expected: "sqlite|memory",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => f.write_str("sqlite"),
            Backend::Memory => f.write_str("memory"),
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name: ENV_LOG_FORMAT,
        expected: "pretty|json",
        value: value.to_string(),
    })
}

/// Process configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub db_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name).and_then(|v| {
                let trimmed = v.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        };

        let mut config = Self::default();
        if let Some(backend) = get(ENV_BACKEND) {
            config.backend = backend.parse()?;
        }
        config.db_path = get(ENV_DB_PATH).map(PathBuf::from);
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log_format = parse_log_format(&format)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == Backend::Memory && self.db_path.is_some() {
            return Err(ConfigError::PathWithMemoryBackend);
        }
        Ok(())
    }

    pub fn open_database(&self) -> Result<Arc<dyn Database>, TaskError> {
        self.backend.open(self.db_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_in_memory_sqlite() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (ENV_BACKEND, "SQLite"),
            (ENV_DB_PATH, " /tmp/tasks.db "),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/tasks.db")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[(ENV_DB_PATH, "  "), (ENV_BACKEND, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = Config::from_lookup(lookup(&[(ENV_BACKEND, "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_BACKEND));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Config::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_LOG_FORMAT));
    }

    #[test]
    fn memory_backend_refuses_a_path() {
        let err = Config::from_lookup(lookup(&[
            (ENV_BACKEND, "memory"),
            (ENV_DB_PATH, "/tmp/tasks.db"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::PathWithMemoryBackend);
    }

    #[tokio::test]
    async fn opens_each_backend() {
        for backend in [Backend::Sqlite, Backend::Memory] {
            let db = backend.open(None).unwrap();
            assert_eq!(db.backend(), backend.to_string());
            let session = db.begin().await.unwrap();
            assert!(session.query().list_with_done().unwrap().is_empty());
        }
    }
}
