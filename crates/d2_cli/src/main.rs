mod feed;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use d2_core::core_api::{
    ConnectionState, Engine, FileStore, FilterAction, FilterToggle, Session, SortKey,
};
use d2_render::{JsonStyle, render_json, render_placeholder, render_text};
use tokio::sync::mpsc;
use tracing::{Level as TraceLevel, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

use feed::FeedEvent;

const DEFAULT_FEED_URL: &str = "ws://localhost:3000/ws";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// WebSocket endpoint that streams inventory snapshots.
    #[arg(long, env = "D2_ITEM_LISTER_URL", default_value = DEFAULT_FEED_URL)]
    url: String,
    /// Render a snapshot file (e.g. TotalState.json) instead of connecting.
    #[arg(long, value_name = "TotalState.json")]
    snapshot: Option<PathBuf>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long = "show-unique", value_name = "BOOL")]
    show_unique: Option<bool>,
    #[arg(long = "show-sets", value_name = "BOOL")]
    show_sets: Option<bool>,
    #[arg(long = "show-gems", value_name = "BOOL")]
    show_gems: Option<bool>,
    #[arg(long = "show-runes", value_name = "BOOL")]
    show_runes: Option<bool>,
    #[arg(long = "show-socketed", value_name = "BOOL")]
    show_socketed: Option<bool>,
    #[arg(long = "only-show-filters", value_name = "BOOL")]
    only_show_filters: Option<bool>,
    /// Toggle a sort column; repeat to build a multi-key order.
    #[arg(long = "sort", value_name = "KEY", value_parser = parse_sort_key)]
    sort: Vec<SortKey>,
    #[arg(long)]
    json: bool,
    /// Exit after the first snapshot received from the feed.
    #[arg(long)]
    once: bool,
    /// Directory holding stored preferences.
    #[arg(long = "prefs-dir", value_name = "DIR")]
    prefs_dir: Option<PathBuf>,
}

impl Cli {
    fn filter_actions(&self) -> Vec<FilterAction> {
        let mut actions = Vec::new();
        if let Some(search) = &self.search {
            actions.push(FilterAction::SetSearchTerm(search.clone()));
        }
        let toggles = [
            (FilterToggle::ShowUnique, self.show_unique),
            (FilterToggle::ShowSets, self.show_sets),
            (FilterToggle::ShowGems, self.show_gems),
            (FilterToggle::ShowRunes, self.show_runes),
            (FilterToggle::ShowSocketed, self.show_socketed),
            (FilterToggle::OnlyShowFilters, self.only_show_filters),
        ];
        for (toggle, value) in toggles {
            if let Some(value) = value {
                actions.push(FilterAction::SetCheckbox(toggle, value));
            }
        }
        actions
    }
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    raw.parse()
}

fn init_logging() -> Result<()> {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging() {
        eprintln!("Warning: {e:#}");
    }

    let store = match &cli.prefs_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_location(),
    };
    debug!(dir = %store.dir().display(), "using preference store");

    let engine = Engine::new();
    let mut session = engine.open_session(Box::new(store));
    for action in cli.filter_actions() {
        session.dispatch(action);
    }
    for key in &cli.sort {
        session.toggle_sort(*key);
    }

    if let Some(path) = &cli.snapshot {
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        });
        let snapshot = engine.decode_snapshot(&text).unwrap_or_else(|e| {
            eprintln!("Error decoding snapshot: {}", path.display());
            eprintln!("  {}", e);
            process::exit(1);
        });
        session.replace_snapshot(snapshot);
        print_view(&session, cli.json).unwrap_or_else(|e| {
            eprintln!("Error rendering output: {e:#}");
            process::exit(1);
        });
        return;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error starting async runtime: {e}");
            process::exit(1);
        });
    if let Err(e) = runtime.block_on(watch_feed(&cli, engine, &mut session)) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Renders after every snapshot until the feed closes, or after the first
/// one with `--once`. A lost connection is reported, not retried.
async fn watch_feed(cli: &Cli, engine: Engine, session: &mut Session) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let url = cli.url.clone();
    let feed = tokio::spawn(async move { feed::run(&url, engine, tx).await });

    while let Some(event) = rx.recv().await {
        match event {
            FeedEvent::Connected => session.set_connection(ConnectionState::Connected),
            FeedEvent::Snapshot(snapshot) => {
                session.replace_snapshot(snapshot);
                print_view(session, cli.json)?;
                if cli.once {
                    break;
                }
            }
            FeedEvent::Disconnected => {
                session.set_connection(ConnectionState::NotConnected);
                break;
            }
        }
    }

    if cli.once {
        feed.abort();
    }
    match feed.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(url = %cli.url, "inventory feed unavailable: {e:#}");
            session.set_connection(ConnectionState::NotConnected);
        }
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e).context("inventory feed task failed"),
    }

    if session.connection() == ConnectionState::NotConnected {
        info!(url = %cli.url, "not connected");
        print!("{}", render_placeholder(session.connection()));
    }
    Ok(())
}

fn print_view(session: &Session, json: bool) -> Result<()> {
    let view = session.view();
    if json {
        let value = render_json(&view, JsonStyle::CanonicalV1);
        let rendered =
            serde_json::to_string_pretty(&value).context("failed to serialize JSON output")?;
        println!("{rendered}");
        return Ok(());
    }
    println!("{}", render_text(&view));
    Ok(())
}
