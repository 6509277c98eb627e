mod action;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod github;
mod query;
mod route;
mod source;
mod state;
mod tui;
mod types;
mod ui;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::source::IssueSource;
use crate::tui::EventHandler;
use crate::types::RepositoryIdentifier;

/// Browse a GitHub repository's issues in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Repository route, e.g. `/repository/facebook%2Freact` or `facebook%2Freact`
    route: String,

    /// Override the API base URL from the config file
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // A bad route is fatal before the terminal is touched
    let repo_id = route::resolve(&cli.route)?;

    let config = Config::load().with_base_url(cli.api_url);
    let token = auth::resolve_token(&config.api);
    let github = GitHub::new(&config.api.base_url, token)?;
    info!(repo = %repo_id, source = ?github, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(repo_id, Arc::new(github)).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    repo_id: RepositoryIdentifier,
    source: Arc<dyn IssueSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(repo_id, source, action_tx.clone());

    let tick_rate = Duration::from_millis(100);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
