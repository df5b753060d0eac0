//! JSON message types for the browser-facing WebSocket protocol.
//!
//! # Message flow
//!
//! ```text
//! Browser → Bridge:  JSON text frame  →  FrameMessage  →  Vec<HandObservation>
//! Bridge  → Browser: OutboundMsg      →  JSON text frame
//! ```
//!
//! The browser side is a hand tracker that posts one frame per animation
//! tick.  Field names on the inbound side follow the tracker's own result
//! object (`multiHandLandmarks`, `multiHandedness`), which is why they are
//! camelCase on the wire.

use hands_core::{Channel, Hand, HandControl, HandObservation, Landmark};
use serde::{Deserialize, Serialize};

// ── Browser → Bridge ──────────────────────────────────────────────────────────

/// One tracker frame as posted by the browser.
///
/// ```json
/// {"MIDIOut":"IAC Driver Bus 1",
///  "multiHandLandmarks":[[{"x":0.5,"y":0.5,"z":0.0}, ...]],
///  "multiHandedness":[{"index":0,"score":0.98,"label":"Left"}]}
/// ```
///
/// Every field is optional on the wire; a frame with no hands is valid and
/// simply produces no output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMessage {
    /// Name of the MIDI output the user selected in the page.  Empty when
    /// nothing is selected.
    #[serde(rename = "MIDIOut", default)]
    pub midi_out: String,

    /// Landmark sets, one per detected hand.
    #[serde(rename = "multiHandLandmarks", default)]
    pub multi_hand_landmarks: Vec<Vec<Landmark>>,

    /// Handedness classification, parallel to `multi_hand_landmarks`.
    #[serde(rename = "multiHandedness", default)]
    pub multi_handedness: Vec<Handedness>,
}

/// Handedness entry for one detected hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handedness {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub label: String,
}

impl FrameMessage {
    /// Pairs each landmark set with its handedness entry by position.
    ///
    /// Hands without a handedness entry, or whose label is neither left nor
    /// right, are dropped.  Landmark-count checks are left to the geometry
    /// reducer so malformed hands are reported in one place.
    pub fn observations(&self) -> Vec<HandObservation> {
        self.multi_hand_landmarks
            .iter()
            .zip(&self.multi_handedness)
            .filter_map(|(landmarks, handedness)| {
                let hand = Hand::from_label(&handedness.label)?;
                Some(HandObservation::new(
                    hand,
                    handedness.score,
                    landmarks.clone(),
                ))
            })
            .collect()
    }
}

// ── Bridge → Browser ──────────────────────────────────────────────────────────

/// All messages the bridge sends to the browser.
///
/// ```json
/// {"kind":"addMidi","ele":"","data":"IAC Driver Bus 1"}
/// {"kind":"updateElement","ele":"left","data":"Left<br>x (cc 0)=64<br>..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OutboundMsg {
    /// Announces one available MIDI output.  Sent once per device right
    /// after the connection opens.
    #[serde(rename = "addMidi")]
    AddMidi { ele: String, data: String },

    /// Replaces the contents of the page element `ele` with `data`.
    #[serde(rename = "updateElement")]
    UpdateElement { ele: String, data: String },
}

impl OutboundMsg {
    pub fn add_midi(device: impl Into<String>) -> Self {
        OutboundMsg::AddMidi {
            ele: String::new(),
            data: device.into(),
        }
    }

    /// Display update for one processed hand.
    pub fn hand_display(control: &HandControl) -> Self {
        OutboundMsg::UpdateElement {
            ele: control.hand.key().to_string(),
            data: display_text(control),
        }
    }
}

/// Human-readable summary of one hand's values, HTML line breaks included:
/// `Left<br>x (cc 0)=64<br>y (cc 1)=64<br>o (cc 2)=0`.
pub fn display_text(control: &HandControl) -> String {
    let mut text = control.hand.label().to_string();
    for (channel, value) in control.channel_values() {
        text.push_str(&display_line(channel, value));
    }
    text
}

fn display_line(channel: Channel, value: u8) -> String {
    format!(
        "<br>{} (cc {})={}",
        channel.feature.tag(),
        channel.controller(),
        value
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
