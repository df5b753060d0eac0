//! MIDI output through `midir`.
//!
//! At startup every output port is opened and registered under its port
//! name, which is also the name the browser sends back in `MIDIOut`.
//!
//! `midir` consumes the `MidiOutput` handle on `connect`, so each port gets
//! its own client handle; the port is re-resolved by name on that handle.

use std::sync::{Arc, Mutex, PoisonError};

use hands_core::{ControlChange, ControlOutputRegistry, ControlSink, OutputError};
use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a single output port could not be opened.
#[derive(Debug, Error)]
enum PortError {
    #[error("MIDI backend initialisation failed: {0}")]
    Init(#[from] midir::InitError),

    #[error("port '{0}' disappeared")]
    Missing(String),

    #[error("connect failed: {0}")]
    Connect(String),
}

/// One open MIDI output port.
pub struct MidirSink {
    name: String,
    conn: Mutex<MidiOutputConnection>,
}

impl MidirSink {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ControlSink for MidirSink {
    fn send(&self, message: ControlChange) -> Result<(), OutputError> {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.send(&message.to_bytes())
            .map_err(|e| OutputError::Send {
                device: self.name.clone(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for MidirSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidirSink").field("name", &self.name).finish()
    }
}

/// Opens every available MIDI output port.
///
/// Never fails: if the backend cannot be initialised, or a port refuses the
/// connection, that is logged and the port is left out.  An empty registry
/// still lets the bridge serve display updates.
pub fn open_registry(client_name: &str) -> ControlOutputRegistry {
    let mut registry = ControlOutputRegistry::new();

    let names = match port_names(client_name) {
        Ok(names) => names,
        Err(e) => {
            warn!("MIDI backend unavailable, continuing without control outputs: {e}");
            return registry;
        }
    };

    for name in names {
        match connect(client_name, &name) {
            Ok(conn) => {
                info!(output = %name, "opened MIDI output");
                registry.insert(
                    name.clone(),
                    Arc::new(MidirSink {
                        name,
                        conn: Mutex::new(conn),
                    }),
                );
            }
            Err(e) => debug!(output = %name, "skipping MIDI output: {e}"),
        }
    }

    if registry.is_empty() {
        warn!("no MIDI output ports could be opened");
    }
    registry
}

fn port_names(client_name: &str) -> Result<Vec<String>, midir::InitError> {
    let output = MidiOutput::new(client_name)?;
    Ok(output
        .ports()
        .iter()
        .filter_map(|port| output.port_name(port).ok())
        .collect())
}

fn connect(client_name: &str, port_name: &str) -> Result<MidiOutputConnection, PortError> {
    let output = MidiOutput::new(client_name)?;
    let port = output
        .ports()
        .into_iter()
        .find(|p| output.port_name(p).is_ok_and(|n| n == port_name))
        .ok_or_else(|| PortError::Missing(port_name.to_string()))?;
    output
        .connect(&port, client_name)
        .map_err(|e| PortError::Connect(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
