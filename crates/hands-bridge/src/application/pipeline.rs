//! Per-frame pipeline orchestration.
//!
//! [`PipelineContext`] is the one piece of process-wide state: the smoothing
//! windows, the last-sent latch, the frame scheduler, and the registry of
//! open control outputs.  It is built once at startup, wrapped in an `Arc`,
//! and shared by every connection.  Tests build their own instances.

use std::sync::Arc;

use hands_core::{
    ControlOutputRegistry, FrameScheduler, GeometryError, Hand, HandObservation, SignalChain,
};
use thiserror::Error;
use tracing::debug;

use crate::application::control_emitter::ControlEmitter;
use crate::domain::{BridgeConfig, ConfigError, FrameMessage, OutboundMsg};

/// Errors raised while building or running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("malformed {hand} hand: {source}")]
    MalformedHand {
        hand: Hand,
        #[source]
        source: GeometryError,
    },
}

/// Shared state for the hand → MIDI pipeline.
#[derive(Debug)]
pub struct PipelineContext {
    chain: SignalChain,
    scheduler: FrameScheduler,
    emitter: ControlEmitter,
}

impl PipelineContext {
    /// Builds a context from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` fails
    /// [`BridgeConfig::validate`].
    pub fn new(
        config: &BridgeConfig,
        outputs: Arc<ControlOutputRegistry>,
    ) -> Result<Self, PipelineError> {
        Self::with_scheduler(
            config,
            outputs,
            FrameScheduler::new(config.keep_rate_percent),
        )
    }

    /// Same as [`PipelineContext::new`] with an explicit scheduler, so tests
    /// can fix the random draws.
    pub fn with_scheduler(
        config: &BridgeConfig,
        outputs: Arc<ControlOutputRegistry>,
        scheduler: FrameScheduler,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            chain: SignalChain::new(config.smoothing_window, config.spread_range),
            scheduler,
            emitter: ControlEmitter::new(outputs, config.midi_channel),
        })
    }

    pub fn chain(&self) -> &SignalChain {
        &self.chain
    }

    pub fn emitter(&self) -> &ControlEmitter {
        &self.emitter
    }

    /// Names of the open control outputs, sorted.
    pub fn output_names(&self) -> Vec<String> {
        self.emitter.outputs().names().map(str::to_owned).collect()
    }

    /// Draws once from the frame scheduler.
    pub fn should_process(&self) -> bool {
        self.scheduler.should_process()
    }

    /// Runs one hand through the chain and the emitter.
    ///
    /// Returns the display update for the hand.  Control messages go to the
    /// output named `device` as a side effect.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MalformedHand`] if the observation does not carry
    /// 21 finite landmarks.  Nothing is updated in that case.
    pub fn process_hand(
        &self,
        observation: &HandObservation,
        device: &str,
    ) -> Result<OutboundMsg, PipelineError> {
        let control = self
            .chain
            .process(observation)
            .map_err(|source| PipelineError::MalformedHand {
                hand: observation.hand,
                source,
            })?;
        self.emitter.emit(&control, device);
        Ok(OutboundMsg::hand_display(&control))
    }

    /// Runs every hand of an accepted frame and collects the display
    /// updates, one per well-formed hand.  Malformed hands are skipped.
    pub fn process_frame(&self, frame: &FrameMessage) -> Vec<OutboundMsg> {
        frame
            .observations()
            .iter()
            .filter_map(|obs| match self.process_hand(obs, &frame.midi_out) {
                Ok(update) => Some(update),
                Err(e) => {
                    debug!("skipping hand: {e}");
                    None
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hands_core::{Landmark, HAND_LANDMARK_COUNT};

    fn context() -> PipelineContext {
        PipelineContext::new(&BridgeConfig::default(), Arc::new(ControlOutputRegistry::new()))
            .unwrap()
    }

    fn frame_with(hands: Vec<(&str, Vec<Landmark>)>) -> FrameMessage {
        FrameMessage {
            midi_out: String::new(),
            multi_hand_landmarks: hands.iter().map(|(_, lm)| lm.clone()).collect(),
            multi_handedness: hands
                .iter()
                .map(|(label, _)| crate::domain::Handedness {
                    index: 0,
                    score: 0.9,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BridgeConfig {
            smoothing_window: 0,
            ..BridgeConfig::default()
        };
        let result = PipelineContext::new(&config, Arc::new(ControlOutputRegistry::new()));
        assert!(matches!(
            result,
            Err(PipelineError::InvalidConfig(ConfigError::ZeroSmoothingWindow))
        ));
    }

    #[test]
    fn test_frame_yields_one_update_per_hand() {
        // Arrange
        let ctx = context();
        let flat = vec![Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        let frame = frame_with(vec![("Left", flat.clone()), ("Right", flat)]);

        // Act
        let updates = ctx.process_frame(&frame);

        // Assert
        let elements: Vec<String> = updates
            .into_iter()
            .map(|m| match m {
                OutboundMsg::UpdateElement { ele, .. } => ele,
                other => panic!("unexpected message {other:?}"),
            })
            .collect();
        assert_eq!(elements, vec!["left", "right"]);
    }

    #[test]
    fn test_malformed_hand_is_skipped_without_affecting_others() {
        let ctx = context();
        let frame = frame_with(vec![
            ("Left", vec![Landmark::new(0.5, 0.5, 0.0); 4]),
            ("Right", vec![Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT]),
        ]);

        let updates = ctx.process_frame(&frame);

        assert_eq!(updates.len(), 1);
    }

    #[test]
    fn test_process_hand_reports_malformed_hand() {
        let ctx = context();
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        landmarks[3].x = f64::NAN;
        let obs = HandObservation::new(Hand::Right, 0.9, landmarks);

        let err = ctx.process_hand(&obs, "").unwrap_err();

        assert!(matches!(err, PipelineError::MalformedHand { hand: Hand::Right, .. }));
    }

    #[test]
    fn test_output_names_come_from_registry() {
        let mut registry = ControlOutputRegistry::new();
        registry.insert("b", Arc::new(crate::infrastructure::control_output::RecordingSink::new()));
        registry.insert("a", Arc::new(crate::infrastructure::control_output::RecordingSink::new()));
        let ctx = PipelineContext::new(&BridgeConfig::default(), Arc::new(registry)).unwrap();

        assert_eq!(ctx.output_names(), vec!["a", "b"]);
    }
}
