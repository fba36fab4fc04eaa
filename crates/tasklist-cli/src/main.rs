//! tasklist - タスク一覧と完了状態の CLI
//!
//! 結果は JSON で stdout に、ログは stderr に出す。
//! 失敗時は `{"status", "detail"}` を stderr に出して終了コード 1。
//!
//! `--db` を付けなければ in-memory SQLite なので、状態はその 1 回の実行で消える。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tasklist_core::api::{ApiError, ApiResult, TaskApi, TaskCreate};
use tasklist_core::app::AppBuilder;
use tasklist_core::config::{Backend, Config};
use tasklist_core::domain::{DueDate, TaskId};
use tasklist_core::observability::{LogFormat, init_logging};

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Task list with done tracking")]
struct Cli {
    /// SQLite file (overrides TASKLIST_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// sqlite | memory (overrides TASKLIST_BACKEND)
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// pretty | json (overrides TASKLIST_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every task with its done flag
    List,
    /// Show one task
    Show { id: TaskId },
    /// Create a task
    Create {
        #[arg(long)]
        title: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        due_date: Option<DueDate>,
    },
    /// Replace a task's title (due date is checked but not written)
    Update {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        due_date: Option<DueDate>,
    },
    /// Delete a task and its done marker
    Delete { id: TaskId },
    /// Mark a task as done
    Done { id: TaskId },
    /// Unmark a done task
    Undone { id: TaskId },
    /// Count tasks by completion state
    Stats,
    /// Walk through create / list / done / undone against a fresh store
    Demo,
}

impl Cli {
    /// Environment first, then flags on top.
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env().context("invalid TASKLIST_* environment")?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(path) = &self.db {
            config.db_path = Some(path.clone());
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.config()?;
    init_logging(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let app = AppBuilder::new()
        .config(&config)
        .context("failed to open task store")?
        .build()?;
    let api = TaskApi::new(app);

    match run(&api, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(api_err) => {
                eprintln!("{}", serde_json::to_string(api_err)?);
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

async fn run(api: &TaskApi, command: Command) -> Result<()> {
    match command {
        Command::List => print_json(&api.list_tasks().await?),
        Command::Show { id } => print_json(&api.get_task(id).await?),
        Command::Create { title, due_date } => {
            print_json(&api.create_task(TaskCreate { title, due_date }).await?)
        }
        Command::Update {
            id,
            title,
            due_date,
        } => print_json(&api.update_task(id, TaskCreate { title, due_date }).await?),
        Command::Delete { id } => {
            api.delete_task(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::Done { id } => {
            api.mark_task_as_done(id).await?;
            print_json(&api.get_task(id).await?)
        }
        Command::Undone { id } => {
            api.unmark_task_as_done(id).await?;
            print_json(&api.get_task(id).await?)
        }
        Command::Stats => print_json(&api.stats().await?),
        Command::Demo => demo(api).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 1 行 1 ステップ。失敗が期待されるステップもそのまま出す。
fn step<T: Serialize>(label: &str, result: &ApiResult<T>) -> Result<()> {
    let line = match result {
        Ok(value) => serde_json::json!({ "step": label, "ok": value }),
        Err(err) => serde_json::json!({ "step": label, "error": err }),
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

async fn demo(api: &TaskApi) -> Result<()> {
    let created = api
        .create_task(TaskCreate {
            title: Some("buy milk".to_string()),
            due_date: None,
        })
        .await?;
    step("create", &Ok::<_, ApiError>(&created))?;
    step("list", &api.list_tasks().await)?;

    step("done", &api.mark_task_as_done(created.id).await)?;
    step("done again", &api.mark_task_as_done(created.id).await)?;
    step("list", &api.list_tasks().await)?;

    step("undone", &api.unmark_task_as_done(created.id).await)?;
    step("undone again", &api.unmark_task_as_done(created.id).await)?;

    let bad_date = TaskCreate::from_json(r#"{"title": "bad date", "due_date": "2024-12-32"}"#)
        .map_err(ApiError::from);
    step("create with 2024-12-32", &bad_date.map(|_| ()))?;

    step("delete", &api.delete_task(created.id).await)?;
    step("stats", &api.stats().await)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_strict_due_date() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "create",
            "--title",
            "buy milk",
            "--due-date",
            "2024-12-01",
        ])
        .unwrap();
        match cli.command {
            Command::Create { title, due_date } => {
                assert_eq!(title.as_deref(), Some("buy milk"));
                assert_eq!(due_date.unwrap().to_string(), "2024-12-01");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(
            Cli::try_parse_from(["tasklist", "create", "--due-date", "2024-12-32"]).is_err()
        );
        assert!(Cli::try_parse_from(["tasklist", "create", "--due-date", "2024/12/01"]).is_err());
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "--backend",
            "memory",
            "--log-format",
            "json",
            "stats",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(Backend::Memory));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[tokio::test]
    async fn demo_runs_against_memory_store() {
        let app = AppBuilder::new()
            .database(Backend::Memory.open(None).unwrap())
            .build()
            .unwrap();
        let api = TaskApi::new(app);
        demo(&api).await.unwrap();
        assert!(api.list_tasks().await.unwrap().is_empty());
    }
}
