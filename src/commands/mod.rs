//! Command dispatch and handlers.
//!
//! Each handler returns the text to print on success.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;
pub mod toggle;
pub mod watch;

use std::time::Duration;

use crate::cassette::session::RecordingSession;
use crate::cli::{list_query, Cli, Command};
use crate::config::{Config, Mode};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `TICKIT_RECORD` is set to a directory path, all port interactions are
/// recorded to per-port cassette files in that directory. When
/// `TICKIT_REPLAY` is set, they are served from the cassettes there instead.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub async fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = Config::resolve(&cli.api_url)?;
    let (ctx, session) = match &config.mode {
        Mode::Live => (ServiceContext::live(&config), None),
        Mode::Record(dir) => {
            let (ctx, session) = ServiceContext::recording_at(&config, dir)?;
            (ctx, Some(session))
        }
        Mode::Replay(path) => (ServiceContext::replaying(path)?, None),
    };

    let result = dispatch_with_context(&cli.command, &ctx).await;

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    let output = result?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the command handler fails.
pub async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
) -> Result<String, String> {
    match command {
        Command::List { status, sort } => list::run(ctx, list_query(*status, *sort)).await,
        Command::Add { text } => add::run(ctx, text).await,
        Command::Edit { id, text } => edit::run(ctx, *id, text).await,
        Command::Toggle { id } => toggle::run(ctx, *id).await,
        Command::Delete { id } => delete::run(ctx, *id).await,
        Command::Stats => stats::run(ctx).await,
        Command::Export { path } => export::run(ctx, path.as_deref()).await,
        Command::Import { path } => import::run(ctx, path).await,
        Command::Watch { interval_ms, ticks } => {
            watch::run(ctx, Duration::from_millis(*interval_ms), *ticks).await
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use crate::testing::{FixedClock, MemFileSystem, MemTaskService};

    /// Context over an in-memory server, a fixed clock and an empty filesystem.
    pub(crate) fn context(remote: MemTaskService) -> ServiceContext {
        ServiceContext {
            remote: Box::new(remote),
            clock: Box::new(FixedClock::at("2025-01-01T00:00:00Z")),
            fs: Box::new(MemFileSystem::new()),
        }
    }

    #[tokio::test]
    async fn dispatches_to_handlers() {
        let ctx = context(MemTaskService::with_tasks(vec![Task::new(TaskId(1), "a", false)]));

        let output = dispatch_with_context(&Command::Toggle { id: TaskId(1) }, &ctx).await.unwrap();
        assert!(output.ends_with("[x] 1  a"));

        let output = dispatch_with_context(&Command::Stats, &ctx).await.unwrap();
        assert!(output.contains("Completion: 100%"));
    }

    #[tokio::test]
    async fn dispatch_with_context_surfaces_errors() {
        let ctx = context(MemTaskService::new());
        let err =
            dispatch_with_context(&Command::Delete { id: TaskId(3) }, &ctx).await.unwrap_err();
        assert_eq!(err, "task 3 not found");
    }
}
