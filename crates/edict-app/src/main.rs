use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use edict_client::{AuthSession, HttpWordStore};
use edict_config::Config;
use tokio::signal;

mod controller;
mod events;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

/// Terminal client for the Edict vocabulary API.
#[derive(Parser)]
#[command(name = "edict", version)]
struct Args {
    /// Backend origin and base path, e.g. http://localhost:3000/api
    #[arg(long)]
    api_url: Option<String>,

    /// Where the session token is cached between runs
    #[arg(long)]
    token_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let mut config = Config::new();
    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(token_file) = args.token_file {
        config.auth.token_file = token_file;
    }

    let session = Arc::new(AuthSession::load(config.auth.token_file.clone()));
    let store = Arc::new(HttpWordStore::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_seconds),
        session.clone(),
    )?);

    let state = Arc::new(AppState::new(config, session));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(store);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::info!("Task exited"),
                Some(Ok(Err(e))) => tracing::error!("Task failed: {e}"),
                Some(Err(e)) => tracing::error!("Task panicked: {e}"),
                None => {}
            }
        }
    }

    controller.shutdown();
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("edict=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if atty::is(atty::Stream::Stderr) {
        builder.compact().init();
    } else {
        builder.json().init();
    }
}
