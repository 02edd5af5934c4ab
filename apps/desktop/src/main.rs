use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shared::protocol::encode_view_message;
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
};
use tracing::{debug, info, warn};

mod config;
mod harness;
mod render;

use config::load_settings;
use harness::Harness;

/// Drives the view state controller from host frames and simulated user
/// actions, one per line, and prints every message the view sends back.
#[derive(Parser, Debug)]
struct Args {
    /// Config file; defaults to ./desktop.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read input lines from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
    /// Do not print rendered snapshots.
    #[arg(long)]
    no_render: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(filter) = args.log_filter {
        settings.log_filter = filter;
    }
    if args.no_render {
        settings.render = false;
    }
    if args.input.is_some() {
        settings.input_path = args.input;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let mut harness = Harness::new(settings.outbound_queue_capacity);
    harness.subscribe(|snapshot| match render::state_json(snapshot) {
        Ok(state) => debug!(revision = snapshot.revision, %state, "view state committed"),
        Err(error) => warn!(%error, "failed to serialize view state"),
    })?;
    if settings.render {
        harness.subscribe(|snapshot| print!("{}", render::render_snapshot(snapshot)))?;
    }

    let reader: Box<dyn AsyncBufRead + Unpin> = match &settings.input_path {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("failed to open input '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    info!(
        view_id = ?harness.gateway().view_id(),
        queue_capacity = settings.outbound_queue_capacity,
        "host harness ready"
    );

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match harness.handle_line(&line) {
            Ok(outcome) => {
                for message in &outcome.outbound {
                    println!("-> {}", encode_view_message(message)?);
                }
            }
            Err(error) => warn!(line = line_no, error = %format!("{error:#}"), "input rejected"),
        }
    }

    info!(lines = line_no, "input exhausted; host harness exiting");
    Ok(())
}
