//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is assembled once at startup from defaults, an optional TOML file, and
//! CLI flags (see `main.rs`), validated, and then never changed: none of the
//! settings are adjustable per connection or at runtime.

use std::net::SocketAddr;

use hands_core::signal::{DEFAULT_KEEP_RATE_PERCENT, DEFAULT_WINDOW};
use hands_core::SpreadRange;
use thiserror::Error;

/// Default WebSocket listener port.
pub const DEFAULT_PORT: u16 = 8030;

/// Client name registered with the MIDI backend.
pub const DEFAULT_MIDI_CLIENT_NAME: &str = "midihands";

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("smoothing window must hold at least one sample")]
    ZeroSmoothingWindow,

    #[error("keep rate must be between 0 and 100 percent, got {0}")]
    KeepRateOutOfRange(u8),

    #[error("MIDI channel must be between 0 and 15, got {0}")]
    MidiChannelOutOfRange(u8),

    #[error("spread range must satisfy min < max with finite bounds, got [{min}, {max}]")]
    InvalidSpreadRange { min: f64, max: f64 },
}

/// All runtime configuration for the bridge.
///
/// # Example
///
/// ```rust
/// use hands_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 8030);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Address the WebSocket server binds to.  Port 0 asks the OS for a
    /// free port, which the integration tests rely on.
    pub ws_bind_addr: SocketAddr,

    /// Capacity of each moving-average window.
    pub smoothing_window: usize,

    /// Percentage of incoming frames that enter the pipeline.
    pub keep_rate_percent: u8,

    /// Source range of the spread ratio before it is mapped to `[0, 1]`.
    pub spread_range: SpreadRange,

    /// MIDI channel (0-based) used in the Control Change status byte.
    pub midi_channel: u8,

    /// Client name announced to the MIDI backend.
    pub midi_client_name: String,
}

impl BridgeConfig {
    /// Checks every setting; returns the first problem found.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`] for the conditions rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_window == 0 {
            return Err(ConfigError::ZeroSmoothingWindow);
        }
        if self.keep_rate_percent > 100 {
            return Err(ConfigError::KeepRateOutOfRange(self.keep_rate_percent));
        }
        if self.midi_channel > 15 {
            return Err(ConfigError::MidiChannelOutOfRange(self.midi_channel));
        }
        if !self.spread_range.is_valid() {
            return Err(ConfigError::InvalidSpreadRange {
                min: self.spread_range.min,
                max: self.spread_range.max,
            });
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    /// | Field             | Default        |
    /// |-------------------|----------------|
    /// | ws_bind_addr      | `0.0.0.0:8030` |
    /// | smoothing_window  | 10             |
    /// | keep_rate_percent | 90             |
    /// | spread_range      | 0.85 – 2.3     |
    /// | midi_channel      | 0              |
    /// | midi_client_name  | `midihands`    |
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            smoothing_window: DEFAULT_WINDOW,
            keep_rate_percent: DEFAULT_KEEP_RATE_PERCENT,
            spread_range: SpreadRange::default(),
            midi_channel: 0,
            midi_client_name: DEFAULT_MIDI_CLIENT_NAME.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
