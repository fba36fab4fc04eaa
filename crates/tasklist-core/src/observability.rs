//! Observability - ログ初期化と状態別カウント
//!
//! ログは `tracing` で出す。初期化はプロセス起動時に 1 回だけ（2 回目以降は no-op）。
//! レベルは `RUST_LOG` で制御する（例: `info`, `tasklist_core=debug`）。

use std::str::FromStr;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::TaskView;

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logs.
    Json,
    /// Human-readable logs.
    #[default]
    Pretty,
}

/// Unrecognised log format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format {0:?} (expected pretty|json)")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// Initializes the logging subsystem.
///
/// Logs go to stderr so that stdout stays machine-readable for the CLI.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                    .init();
            }
        }
    });
}

/// Task counts by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub done: usize,
    pub not_done: usize,
}

impl TaskCounts {
    pub fn from_views(views: &[TaskView]) -> Self {
        let mut counts = TaskCounts::default();
        for view in views {
            counts.total += 1;
            if view.done {
                counts.done += 1;
            } else {
                counts.not_done += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    fn view(id: i64, done: bool) -> TaskView {
        TaskView {
            id: TaskId::new(id),
            title: None,
            due_date: None,
            done,
        }
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Json);
        tracing::info!("logging initialised");
    }

    #[test]
    fn counts_split_by_done_flag() {
        let counts = TaskCounts::from_views(&[view(1, true), view(2, false), view(3, false)]);
        assert_eq!(
            counts,
            TaskCounts {
                total: 3,
                done: 1,
                not_done: 2
            }
        );
    }

    #[test]
    fn log_format_parses_from_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
