mod cli;
mod host;
mod logging;
mod render;

use anyhow::Result;
use cli::{Cli, Command};
use daybook_core::{Config, EditorSnapshot, Host, Journal, JournalResult, Selection};
use host::{TerminalHost, resolve_editor};
use render::Renderer;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("daybook: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::new();

    let log_path = logging::log_path();
    if let Some(path) = &log_path {
        if let Err(e) = logging::init(path) {
            eprintln!("daybook: logging disabled: {e:#}");
        }
    }

    let mut config = Config::load()?;
    if let Some(dir) = cli.dir {
        config.base_path = dir;
    }

    let renderer = Renderer::new(cli.color.use_color());
    let editor = resolve_editor(&config.editor);
    let host = TerminalHost::new(editor, cli.no_edit, renderer, log_path);
    let journal = Journal::new(config, host)?;
    tracing::debug!(base = %journal.base_path().display(), "journal ready");

    if cli.path {
        journal
            .host()
            .renderer()
            .print_value(&journal.base_path().display().to_string());
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = dispatch(&journal, cli.command, cli.text).await;
    journal.settle().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            journal.show_error(err).await;
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn dispatch(
    journal: &Journal<TerminalHost>,
    command: Option<Command>,
    text: Vec<String>,
) -> JournalResult<()> {
    let renderer = journal.host().renderer();
    let cancelled = || renderer.print_info("Cancelled.");

    match command {
        None => {
            let inline = (!text.is_empty()).then(|| text.join(" "));
            if journal.process_input(inline.as_deref()).await?.is_none() {
                cancelled();
            }
        }
        Some(Command::Note { title }) => {
            let title = (!title.is_empty()).then(|| title.join(" "));
            if journal.show_note(title.as_deref()).await?.is_none() {
                cancelled();
            }
        }
        Some(Command::Entry { offset }) => {
            journal.show_entry(offset).await?;
        }
        Some(Command::Workspace) => {
            journal.load_journal_workspace().await?;
        }
        Some(Command::Sum { file, selections }) => {
            let snapshot = snapshot(journal, &file, selections).await?;
            if let Some(sum) = journal.print_sum(&snapshot).await? {
                renderer.print_value(&sum);
            }
        }
        Some(Command::Duration { file, selections }) => {
            let snapshot = snapshot(journal, &file, selections).await?;
            if let Some(hours) = journal.print_duration(&snapshot).await? {
                renderer.print_value(&hours);
            }
        }
        Some(Command::Time { file, position }) => {
            let snapshot = snapshot(journal, &file, vec![position]).await?;
            if let Some(time) = journal.print_time(&snapshot).await? {
                renderer.print_value(&time);
            }
        }
        Some(Command::Logs) => journal.host().show_log_channel().await?,
    }
    Ok(())
}

async fn snapshot(
    journal: &Journal<TerminalHost>,
    file: &Path,
    selections: Vec<Selection>,
) -> JournalResult<EditorSnapshot> {
    let document = journal.open_document(file).await?;
    Ok(EditorSnapshot::new(document, selections))
}
