use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{error, info, warn};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use sensor_panel::{
    config::AppConfig,
    intent::{HELP, Intent, parse_intent},
    rtdb_client::FirebaseClient,
    shell::Shell,
};
use sensor_panel_core::Event;
use std::io::{BufRead, Write};
use tokio::{
    signal::{
        self,
        unix::{SignalKind, signal},
    },
    sync::mpsc,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize()?;

    let config = AppConfig::load().context("failed to load configuration")?;
    info!("using database {}", config.database.url);

    let db = FirebaseClient::new(&config.database).context("failed to create database client")?;

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = signal::ctrl_c() => info!("received Ctrl-C"),
        }
    };

    let (intent_tx, intent_rx) = mpsc::channel(16);
    spawn_intent_reader(intent_tx)?;
    info!("{HELP}");

    Shell::new(db, config.shell.reconnect_delay)
        .run(intent_rx, shutdown)
        .await;

    info!("shutting down");
    Ok(())
}

fn initialize() -> Result<()> {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );

    CryptoProvider::install_default(default_provider())
        .map_err(|_| anyhow::anyhow!("crypto provider already installed"))?;

    Ok(())
}

/// Read commands from stdin on a dedicated thread.
///
/// The channel closes on `quit` or end of input, which ends the shell.
fn spawn_intent_reader(tx: mpsc::Sender<Event>) -> Result<()> {
    std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("failed to read stdin: {e}");
                        break;
                    }
                };

                match parse_intent(&line) {
                    Ok(Some(Intent::Event(event))) => {
                        if tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Ok(Some(Intent::Help)) => info!("{HELP}"),
                    Ok(Some(Intent::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{e:#}"),
                }
            }
        })
        .context("failed to spawn stdin reader")?;

    Ok(())
}
