mod app;
mod config;
mod model;
mod protocol;
mod transport;
mod ui;
mod watch;

use anyhow::{Context, Result};
use app::{DomEvent, PanelView, ViewMode};
use clap::{Parser, Subcommand};
use config::PanelConfig;
use serde::Deserialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use transport::{JsonLinesTransport, MemoryTransport, Transport};
use tracing_subscriber::EnvFilter;
use ui::RenderOptions;
use watch::{SnapshotWatcher, WatchEvent};

/// View layer for a host-controlled code annotation panel
#[derive(Parser)]
#[command(name = "annopanel", version, about)]
struct Cli {
    /// Override the configured initial view mode
    #[arg(long, global = true, value_enum)]
    view: Option<ViewMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply one host snapshot and print the rendered page to stdout
    Render {
        /// JSON file holding an `updateAnnotations` message
        snapshot: PathBuf,
        /// Reference time for relative timestamps (epoch millis, defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },
    /// Bridge mode: host messages and DOM events on stdin, intents on stdout
    Serve {
        /// Write the rendered page here after every re-render
        #[arg(long)]
        html_out: Option<PathBuf>,
    },
    /// Re-render a page whenever the snapshot file changes
    Watch {
        snapshot: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

/// One stdin line in bridge mode
#[derive(Deserialize)]
#[serde(untagged)]
enum Inbound {
    Dom(DomEvent),
    Host(serde_json::Value),
}

fn main() -> Result<()> {
    // stdout carries intents and pages, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config = config::load_config(&cwd);
    let view_mode = cli.view.unwrap_or(config.display.default_view);

    match cli.command {
        Command::Render { snapshot, now } => {
            let now = now.unwrap_or_else(ui::time::now_ms);
            let page = render_snapshot_file(&snapshot, view_mode, &config, now)?;
            print!("{}", page);
            Ok(())
        }
        Command::Serve { html_out } => {
            let stdout = io::stdout();
            let transport = JsonLinesTransport::new(stdout.lock());
            run_bridge(
                io::stdin().lock(),
                transport,
                view_mode,
                &config,
                html_out.as_deref(),
            )
        }
        Command::Watch { snapshot, out } => run_watch(&snapshot, &out, view_mode, &config),
    }
}

/// Open a panel, feed it the snapshot file, and return the full page
fn render_snapshot_file(
    snapshot: &Path,
    view_mode: ViewMode,
    config: &PanelConfig,
    now_ms: i64,
) -> Result<String> {
    let raw = std::fs::read_to_string(snapshot)
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;
    let mut panel = PanelView::open(
        MemoryTransport::new(),
        view_mode,
        RenderOptions::from_config(config),
    );
    panel
        .receive_raw(&raw)
        .with_context(|| format!("parsing snapshot {}", snapshot.display()))?;
    for intent in panel.transport_mut().take() {
        tracing::debug!(command = intent.command(), "no host attached, dropping intent");
    }
    let rendered = panel
        .render(now_ms)
        .with_context(|| format!("{} is not an updateAnnotations message", snapshot.display()))?;
    Ok(ui::document::to_document(&rendered))
}

/// Drive a panel from a line-oriented stream. Malformed lines are logged and skipped.
fn run_bridge<R: BufRead, T: Transport>(
    input: R,
    transport: T,
    view_mode: ViewMode,
    config: &PanelConfig,
    html_out: Option<&Path>,
) -> Result<()> {
    let mut panel = PanelView::open(transport, view_mode, RenderOptions::from_config(config));

    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let dirty = match serde_json::from_str::<Inbound>(line) {
            Ok(Inbound::Dom(event)) => panel.handle_event(&event),
            Ok(Inbound::Host(value)) => match protocol::host_message_from_value(value) {
                Ok(Some(msg)) => panel.receive(msg),
                Ok(None) => false,
                Err(err) => {
                    tracing::warn!(line = lineno + 1, "skipping host message: {:#}", err);
                    false
                }
            },
            Err(err) => {
                tracing::warn!(line = lineno + 1, %err, "skipping malformed line");
                false
            }
        };

        if dirty {
            if let (Some(path), Some(rendered)) = (html_out, panel.render(ui::time::now_ms())) {
                write_page(path, &ui::document::to_document(&rendered))?;
            }
        }
    }
    Ok(())
}

fn run_watch(snapshot: &Path, out: &Path, view_mode: ViewMode, config: &PanelConfig) -> Result<()> {
    let (_watcher, rx) = start_watch(snapshot, out, view_mode, config)?;
    while let Ok(WatchEvent::SnapshotChanged) = rx.recv() {
        rerender(snapshot, out, view_mode, config);
    }
    Ok(())
}

/// Register the watcher and write the first page
fn start_watch(
    snapshot: &Path,
    out: &Path,
    view_mode: ViewMode,
    config: &PanelConfig,
) -> Result<(SnapshotWatcher, mpsc::Receiver<WatchEvent>)> {
    let (tx, rx) = mpsc::channel::<WatchEvent>();
    let watcher = SnapshotWatcher::new(snapshot, config.watch.debounce_ms, tx)?;

    rerender(snapshot, out, view_mode, config);
    tracing::info!(snapshot = %snapshot.display(), out = %out.display(), "watching snapshot");
    Ok((watcher, rx))
}

/// A broken snapshot mid-edit should not stop the watcher
fn rerender(snapshot: &Path, out: &Path, view_mode: ViewMode, config: &PanelConfig) {
    let result = render_snapshot_file(snapshot, view_mode, config, ui::time::now_ms())
        .and_then(|page| write_page(out, &page));
    match result {
        Ok(()) => tracing::info!(out = %out.display(), "page updated"),
        Err(err) => tracing::warn!("re-render failed: {:#}", err),
    }
}

fn write_page(path: &Path, page: &str) -> Result<()> {
    std::fs::write(path, page).with_context(|| format!("writing {}", path.display()))
}
