//! Edge-triggered control output.
//!
//! For every processed hand the emitter compares the three freshly computed
//! CC values with the last values sent on those channels and sends a Control
//! Change only for the ones that moved.  The comparison, the latch update,
//! and the device write happen under one lock so concurrent frames cannot
//! interleave their writes to the same channel.

use std::sync::Arc;

use hands_core::{ControlChange, ControlOutputRegistry, HandControl, LastSentState};
use tracing::{trace, warn};

/// Outcome of one [`ControlEmitter::emit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Messages handed to the output device.
    pub sent: usize,
    /// Messages the device rejected.  Their channels still count as sent.
    pub failed: usize,
}

/// Owns the last-sent latch and routes changed values to the selected
/// output device.
pub struct ControlEmitter {
    latch: LastSentState,
    outputs: Arc<ControlOutputRegistry>,
    midi_channel: u8,
}

impl ControlEmitter {
    pub fn new(outputs: Arc<ControlOutputRegistry>, midi_channel: u8) -> Self {
        Self {
            latch: LastSentState::new(),
            outputs,
            midi_channel,
        }
    }

    pub fn outputs(&self) -> &ControlOutputRegistry {
        &self.outputs
    }

    pub fn latch(&self) -> &LastSentState {
        &self.latch
    }

    /// Sends the channels of `control` whose values changed to the device
    /// named `device`.
    ///
    /// Nothing happens, and the latch is left alone, when `control` is not
    /// dispatchable or `device` does not name a registered output.  A device
    /// error is logged and the remaining channels are still attempted; there
    /// are no retries.
    pub fn emit(&self, control: &HandControl, device: &str) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if !control.dispatchable {
            return dispatch;
        }
        let Some(sink) = self.outputs.get(device) else {
            trace!(device, "no such control output; skipping dispatch");
            return dispatch;
        };

        let mut latch = self.latch.lock();
        for (channel, value) in control.channel_values() {
            if !latch.record(channel, value) {
                continue;
            }
            let message = ControlChange::new(self.midi_channel, channel.controller(), value);
            dispatch.sent += 1;
            if let Err(e) = sink.send(message) {
                dispatch.failed += 1;
                warn!(channel = %channel, value, "control output write failed: {e}");
            }
        }
        dispatch
    }
}

impl std::fmt::Debug for ControlEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlEmitter")
            .field("outputs", &self.outputs)
            .field("midi_channel", &self.midi_channel)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hands_core::{Channel, ControlSink, Feature, Hand, OutputError};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Sink {}
        impl ControlSink for Sink {
            fn send(&self, message: ControlChange) -> Result<(), OutputError>;
        }
    }

    fn emitter_with(name: &str, sink: MockSink, midi_channel: u8) -> ControlEmitter {
        let mut registry = ControlOutputRegistry::new();
        registry.insert(name, Arc::new(sink));
        ControlEmitter::new(Arc::new(registry), midi_channel)
    }

    fn left(values: [u8; 3]) -> HandControl {
        HandControl {
            hand: Hand::Left,
            values,
            dispatchable: true,
        }
    }

    #[test]
    fn test_first_frame_sends_every_channel() {
        // Arrange
        let mut sink = MockSink::new();
        sink.expect_send()
            .with(eq(ControlChange::new(0, 0, 10)))
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_send()
            .with(eq(ControlChange::new(0, 1, 20)))
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_send()
            .with(eq(ControlChange::new(0, 2, 30)))
            .times(1)
            .returning(|_| Ok(()));
        let emitter = emitter_with("synth", sink, 0);

        // Act
        let dispatch = emitter.emit(&left([10, 20, 30]), "synth");

        // Assert
        assert_eq!(dispatch, Dispatch { sent: 3, failed: 0 });
    }

    #[test]
    fn test_unchanged_values_are_not_resent() {
        let mut sink = MockSink::new();
        sink.expect_send().times(3).returning(|_| Ok(()));
        let emitter = emitter_with("synth", sink, 0);

        emitter.emit(&left([10, 20, 30]), "synth");
        let second = emitter.emit(&left([10, 20, 30]), "synth");

        assert_eq!(second.sent, 0);
    }

    #[test]
    fn test_only_changed_channel_is_sent() {
        let mut sink = MockSink::new();
        for message in [
            ControlChange::new(0, 0, 10),
            ControlChange::new(0, 1, 20),
            ControlChange::new(0, 2, 30),
            ControlChange::new(0, 1, 21),
        ] {
            sink.expect_send()
                .with(eq(message))
                .times(1)
                .returning(|_| Ok(()));
        }
        let emitter = emitter_with("synth", sink, 0);

        emitter.emit(&left([10, 20, 30]), "synth");
        let second = emitter.emit(&left([10, 21, 30]), "synth");

        assert_eq!(second.sent, 1);
    }

    #[test]
    fn test_unknown_device_leaves_latch_untouched() {
        // Arrange: a sink that must never be called
        let mut sink = MockSink::new();
        sink.expect_send().never();
        let emitter = emitter_with("synth", sink, 0);

        // Act
        let dispatch = emitter.emit(&left([10, 20, 30]), "other");

        // Assert
        assert_eq!(dispatch.sent, 0);
        let x = Channel::new(Hand::Left, Feature::PositionX);
        assert_eq!(emitter.latch().last(x), None);
    }

    #[test]
    fn test_empty_device_name_is_ignored() {
        let mut sink = MockSink::new();
        sink.expect_send().never();
        let emitter = emitter_with("synth", sink, 0);

        assert_eq!(emitter.emit(&left([1, 2, 3]), "").sent, 0);
    }

    #[test]
    fn test_non_dispatchable_control_sends_nothing() {
        let mut sink = MockSink::new();
        sink.expect_send().never();
        let emitter = emitter_with("synth", sink, 0);

        let control = HandControl {
            dispatchable: false,
            ..left([64, 64, 0])
        };

        assert_eq!(emitter.emit(&control, "synth"), Dispatch::default());
    }

    #[test]
    fn test_device_error_is_counted_and_other_channels_continue() {
        // Arrange: the first write fails, the rest succeed
        let mut sink = MockSink::new();
        sink.expect_send()
            .withf(|m| m.controller == 0)
            .times(1)
            .returning(|_| Err(OutputError::Closed("synth".into())));
        sink.expect_send()
            .withf(|m| m.controller != 0)
            .times(2)
            .returning(|_| Ok(()));
        let emitter = emitter_with("synth", sink, 0);

        // Act
        let dispatch = emitter.emit(&left([1, 2, 3]), "synth");

        // Assert
        assert_eq!(dispatch, Dispatch { sent: 3, failed: 1 });
    }

    #[test]
    fn test_configured_midi_channel_reaches_the_device() {
        let mut sink = MockSink::new();
        sink.expect_send()
            .withf(|m| m.channel == 9 && m.to_bytes()[0] == 0xB9)
            .times(3)
            .returning(|_| Ok(()));
        let emitter = emitter_with("drums", sink, 9);

        emitter.emit(&left([5, 6, 7]), "drums");
    }
}
