//! Optional TOML configuration file.
//!
//! The file sits between the built-in defaults and the command line: every
//! field is optional, and anything given on the command line wins.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 8030
//!
//! [pipeline]
//! smoothing = 10
//! reduce_rate = 90
//! spread_min = 0.85
//! spread_max = 2.3
//!
//! [midi]
//! channel = 0
//! client_name = "midihands"
//! ```

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BridgeConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level file layout.  Absent sections and fields mean "keep default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub pipeline: PipelineSection,
    pub midi: MidiSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSection {
    pub smoothing: Option<usize>,
    pub reduce_rate: Option<u8>,
    pub spread_min: Option<f64>,
    pub spread_max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MidiSection {
    pub channel: Option<u8>,
    pub client_name: Option<String>,
}

impl FileConfig {
    /// Overlays every field present in the file onto `config`.
    pub fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(bind) = self.server.bind {
            config.ws_bind_addr.set_ip(bind);
        }
        if let Some(port) = self.server.port {
            config.ws_bind_addr.set_port(port);
        }
        if let Some(smoothing) = self.pipeline.smoothing {
            config.smoothing_window = smoothing;
        }
        if let Some(rate) = self.pipeline.reduce_rate {
            config.keep_rate_percent = rate;
        }
        if let Some(min) = self.pipeline.spread_min {
            config.spread_range.min = min;
        }
        if let Some(max) = self.pipeline.spread_max {
            config.spread_range.max = max;
        }
        if let Some(channel) = self.midi.channel {
            config.midi_channel = channel;
        }
        if let Some(name) = &self.midi.client_name {
            config.midi_client_name = name.clone();
        }
    }
}

/// Parses a configuration file from a string.
///
/// # Errors
///
/// Returns [`ConfigFileError::Parse`] if the TOML is malformed or names a
/// field that does not exist.
pub fn parse_config(content: &str) -> Result<FileConfig, ConfigFileError> {
    Ok(toml::from_str(content)?)
}

/// Loads a configuration file from `path`.
///
/// Unlike the built-in defaults, an explicitly named file must exist.
///
/// # Errors
///
/// Returns [`ConfigFileError::Io`] if the file cannot be read and
/// [`ConfigFileError::Parse`] if its contents are invalid.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
