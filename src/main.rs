mod event;
mod feed;
mod model;
mod state;
mod ui;
mod viewer;

use crate::event::{Command, ViewerEvent};
use crate::viewer::Viewer;
use clap::Parser;
use std::error::Error;
use tokio::sync::mpsc;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Path to a JSON feed of authors and their bites (falls back to the
    /// BITES_FEED env var, then to a built-in demo feed)
    #[arg(long)]
    feed: Option<String>,
    /// Pipe mode: print each bite to stdout as autoplay advances
    #[arg(long)]
    pipe: bool,
    /// Open this author immediately instead of starting on the gallery
    #[arg(long)]
    open: Option<String>,
    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug_log: bool,
}

fn feed_from_env_if_unset(cfg: &mut Config) {
    if cfg.feed.is_none()
        && let Ok(path) = std::env::var("BITES_FEED")
        && !path.trim().is_empty()
    {
        cfg.feed = Some(path);
    }
}

fn init_tracing(cfg: &Config) {
    let default_filter = if cfg.debug_log {
        "bitesviewer=debug"
    } else {
        "bitesviewer=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cfg = Config::parse();
    feed_from_env_if_unset(&mut cfg);
    init_tracing(&cfg);

    let collection = match cfg.feed.as_deref() {
        Some(path) => feed::load_collection(path)?,
        None => feed::demo_collection(),
    };
    let first_author = collection.authors.first().map(|a| a.id.clone());

    let (update_tx, update_rx) = mpsc::channel(32);
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (events_tx, mut events_rx) = mpsc::channel(32);

    let (viewer, tick_rx) = Viewer::new(collection, update_tx, Some(events_tx));
    tokio::spawn(viewer.run(cmd_rx, tick_rx));

    // Stand-in for the persistence/telemetry collaborator: log the outward
    // events the viewer emits.
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                ViewerEvent::AuthorSeen { author_id } => {
                    tracing::info!(%author_id, "author seen");
                }
                ViewerEvent::ItemLikeToggled { item_id, liked } => {
                    tracing::info!(%item_id, liked, "like toggled");
                }
            }
        }
    });

    let result = if cfg.pipe {
        let start = cfg.open.clone().or(first_author);
        ui::pipe::run_pipe(update_rx, cmd_tx, start).await
    } else {
        if let Some(author_id) = cfg.open.clone() {
            let _ = cmd_tx.send(Command::Open(author_id)).await;
        }
        ui::screen::run_screen(update_rx, cmd_tx).await
    };

    // Print error if any, for better diagnostics
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }
    Ok(())
}
