//! midihands: hand tracking to MIDI bridge, entry point.
//!
//! A browser page runs a hand tracker and streams landmark frames to this
//! process over WebSocket.  Each hand's position and openness become three
//! MIDI Control Change values (controllers 0-2 for the left hand, 3-5 for
//! the right), sent to the MIDI output selected in the page.
//!
//! # Usage
//!
//! ```text
//! midihands [OPTIONS]
//!
//! Options:
//!   --port         <PORT>  WebSocket listener port [default: 8030]
//!   --bind         <IP>    Listener address [default: 0.0.0.0]
//!   --smooth       <N>     Moving-average window in frames [default: 10]
//!   --reduce-fps   <PCT>   Percentage of frames processed [default: 90]
//!   --midi-channel <CH>    MIDI channel 0-15 [default: 0]
//!   --config       <PATH>  TOML configuration file
//!   --debug                Debug logging
//! ```
//!
//! # Configuration precedence
//!
//! Built-in defaults, then the `--config` file, then environment variables
//! and command-line flags.  `RUST_LOG` overrides `--debug`.
//!
//! | Variable                | Flag             |
//! |-------------------------|------------------|
//! | `MIDIHANDS_PORT`        | `--port`         |
//! | `MIDIHANDS_BIND`        | `--bind`         |
//! | `MIDIHANDS_SMOOTH`      | `--smooth`       |
//! | `MIDIHANDS_REDUCE_FPS`  | `--reduce-fps`   |
//! | `MIDIHANDS_MIDI_CHANNEL`| `--midi-channel` |
//! | `MIDIHANDS_CONFIG`      | `--config`       |

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hands_bridge::application::PipelineContext;
use hands_bridge::domain::BridgeConfig;
use hands_bridge::infrastructure::control_output::open_registry;
use hands_bridge::infrastructure::{load_config, run_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Hand tracking to MIDI Control Change bridge.
///
/// Every option is optional so that values from `--config` are only
/// overridden by flags that were actually given.
#[derive(Debug, Parser)]
#[command(
    name = "midihands",
    about = "Turns browser hand-tracking frames into MIDI Control Change messages",
    version
)]
struct Cli {
    /// TCP port for the WebSocket server [default: 8030].
    #[arg(long, env = "MIDIHANDS_PORT")]
    port: Option<u16>,

    /// IP address to bind the WebSocket server to [default: 0.0.0.0].
    #[arg(long, env = "MIDIHANDS_BIND")]
    bind: Option<IpAddr>,

    /// Number of frames averaged per control value [default: 10].
    #[arg(long, env = "MIDIHANDS_SMOOTH")]
    smooth: Option<usize>,

    /// Percentage of incoming frames to process, 0-100 [default: 90].
    #[arg(long = "reduce-fps", env = "MIDIHANDS_REDUCE_FPS")]
    reduce_fps: Option<u8>,

    /// MIDI channel for Control Change messages, 0-15 [default: 0].
    #[arg(long = "midi-channel", env = "MIDIHANDS_MIDI_CHANNEL")]
    midi_channel: Option<u8>,

    /// Path to a TOML configuration file.
    #[arg(long, env = "MIDIHANDS_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level when `RUST_LOG` is not set.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Layers defaults, the config file, and the command line into a
    /// validated [`BridgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the final
    /// configuration is invalid.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = BridgeConfig::default();

        if let Some(path) = &self.config {
            let file = load_config(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            file.apply_to(&mut config);
        }

        if let Some(bind) = self.bind {
            config.ws_bind_addr.set_ip(bind);
        }
        if let Some(port) = self.port {
            config.ws_bind_addr.set_port(port);
        }
        if let Some(smooth) = self.smooth {
            config.smoothing_window = smooth;
        }
        if let Some(rate) = self.reduce_fps {
            config.keep_rate_percent = rate;
        }
        if let Some(channel) = self.midi_channel {
            config.midi_channel = channel;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse the command line and initialise logging.
/// 2. Build the [`BridgeConfig`] (defaults, file, flags).
/// 3. Open every MIDI output port.
/// 4. Build the shared [`PipelineContext`].
/// 5. Serve WebSocket connections until Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = cli.into_bridge_config()?;
    info!(
        "midihands starting: ws={}, smoothing={}, keep-rate={}%, midi-channel={}",
        config.ws_bind_addr, config.smoothing_window, config.keep_rate_percent, config.midi_channel
    );

    let outputs = open_registry(&config.midi_client_name);
    info!("{} MIDI output(s) available", outputs.len());

    let context = Arc::new(
        PipelineContext::new(&config, Arc::new(outputs))
            .context("failed to build pipeline")?,
    );

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config.ws_bind_addr, context, running).await?;

    info!("midihands stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
