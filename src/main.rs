//! Limit - play MIDI notes and a developer encoder/pad surface from the
//! computer keyboard.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use limit::config::AppConfig;
use limit::host::Host;
use limit::{cli, midi_input};

/// Limit - computer keyboard to MIDI notes, encoders and pads
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// MIDI input port name pattern (overrides the config file)
    #[arg(short, long)]
    input: Option<String>,

    /// Run without MIDI input
    #[arg(long)]
    no_midi: bool,

    /// List available MIDI input ports
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    if args.list_ports {
        return midi_input::print_ports();
    }

    let mut config = AppConfig::load_selected(args.config).await?;
    if let Some(pattern) = args.input {
        config.midi.input_port = Some(pattern);
    }

    let (midi_tx, midi_rx) = mpsc::channel(1000);
    // Held for the whole session; dropping it closes the port
    let _midi_connection = if args.no_midi {
        info!("MIDI input disabled");
        None
    } else {
        match midi_input::connect_input(config.midi.input_port.as_deref(), midi_tx) {
            Ok(handle) => {
                info!("Listening on MIDI input: {}", handle.port_name);
                Some(handle)
            }
            Err(e) => {
                warn!("MIDI input unavailable, continuing keyboard-only: {:#}", e);
                None
            }
        }
    };

    println!("Type key tokens separated by spaces (g, F1, num7, pgup...), 'quit' to exit.");
    let repl_rx = cli::spawn_repl();

    let host = Host::new(config);
    host.run(repl_rx, midi_rx, shutdown_signal()).await?;

    info!("Limit shutdown complete");
    // The line editor thread may still be blocked on stdin
    std::process::exit(0);
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
