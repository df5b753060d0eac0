//! End-to-end tests of the frame pipeline without a network.
//!
//! Frames are decoded from the same JSON the browser sends, pushed through a
//! [`PipelineContext`], and the control output is observed through a
//! [`RecordingSink`].

use std::sync::Arc;

use hands_bridge::application::PipelineContext;
use hands_bridge::domain::{BridgeConfig, FrameMessage, OutboundMsg};
use hands_bridge::infrastructure::control_output::RecordingSink;
use hands_core::ControlOutputRegistry;

const OUTPUT: &str = "Virtual Out";

/// Builds a context with one recording output and the given keep rate.
fn context_with_recorder(keep_rate_percent: u8) -> (PipelineContext, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let mut registry = ControlOutputRegistry::new();
    registry.insert(OUTPUT, sink.clone());
    let config = BridgeConfig {
        keep_rate_percent,
        ..BridgeConfig::default()
    };
    let ctx = PipelineContext::new(&config, Arc::new(registry)).expect("valid config");
    (ctx, sink)
}

/// One-hand frame with every landmark at (`x`, `y`).
fn flat_frame(label: &str, x: f64, y: f64, output: &str) -> FrameMessage {
    let point = format!(r#"{{"x":{x},"y":{y},"z":0.0}}"#);
    let landmarks = vec![point; 21].join(",");
    let json = format!(
        r#"{{"MIDIOut":"{output}","multiHandLandmarks":[[{landmarks}]],
            "multiHandedness":[{{"index":0,"score":0.97,"label":"{label}"}}]}}"#
    );
    serde_json::from_str(&json).expect("frame JSON must decode")
}

/// One-hand frame with a measurable spread: wrist at (`x`, 0.5), pinky base
/// 0.1 to the right, middle fingertip `ratio` × 0.1 above the wrist.
fn open_frame(label: &str, x: f64, ratio: f64, output: &str) -> FrameMessage {
    let mut frame = flat_frame(label, x, 0.5, output);
    let hand = &mut frame.multi_hand_landmarks[0];
    hand[17].x = x + 0.1;
    hand[12].y = 0.5 - 0.1 * ratio;
    frame
}

#[test]
fn test_degenerate_left_hand_updates_display_every_frame_without_dispatch() {
    // Arrange
    let (ctx, sink) = context_with_recorder(100);
    let frame = flat_frame("Left", 0.5, 0.5, OUTPUT);

    // Act: ten identical frames, each accepted at keep-rate 100%
    let mut updates = Vec::new();
    for _ in 0..10 {
        assert!(ctx.should_process());
        updates.extend(ctx.process_frame(&frame));
    }

    // Assert: one display update per frame, no channel dispatched more than once
    assert_eq!(updates.len(), 10);
    for update in &updates {
        assert_eq!(
            update,
            &OutboundMsg::UpdateElement {
                ele: "left".to_string(),
                data: "Left<br>x (cc 0)=64<br>y (cc 1)=64<br>o (cc 2)=0".to_string(),
            }
        );
    }
    for controller in 0..6 {
        assert!(sink.sent_on(controller).len() <= 1);
    }
}

#[test]
fn test_steady_pose_dispatches_each_channel_once() {
    let (ctx, sink) = context_with_recorder(100);
    let frame = open_frame("Right", 0.4, 1.6, OUTPUT);

    for _ in 0..10 {
        ctx.process_frame(&frame);
    }

    let controllers: Vec<u8> = sink.sent().iter().map(|m| m.controller).collect();
    assert_eq!(controllers, vec![3, 4, 5]);
}

#[test]
fn test_unknown_output_name_sends_nothing_but_still_updates_display() {
    let (ctx, sink) = context_with_recorder(100);
    let frame = open_frame("Left", 0.4, 1.6, "Some Other Port");

    let updates = ctx.process_frame(&frame);

    assert_eq!(updates.len(), 1);
    assert!(sink.sent().is_empty());
}

#[test]
fn test_switching_to_known_output_sends_current_values() {
    // Arrange: first frames go nowhere, so the latch stays empty
    let (ctx, sink) = context_with_recorder(100);
    ctx.process_frame(&open_frame("Left", 0.4, 1.6, ""));

    // Act
    ctx.process_frame(&open_frame("Left", 0.4, 1.6, OUTPUT));

    // Assert
    assert_eq!(sink.sent().len(), 3);
}

#[test]
fn test_output_failure_does_not_block_display_updates() {
    let (ctx, sink) = context_with_recorder(100);
    sink.fail_sends(true);

    let updates = ctx.process_frame(&open_frame("Left", 0.4, 1.6, OUTPUT));

    assert_eq!(updates.len(), 1);
    assert!(sink.sent().is_empty());
}

#[test]
fn test_zero_keep_rate_rejects_frames() {
    let (ctx, _sink) = context_with_recorder(0);
    let accepted = (0..1_000).filter(|_| ctx.should_process()).count();
    assert!(accepted <= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_frames_keep_one_dispatch_per_value() {
    // Arrange: frames are processed on spawned tasks, as the server does
    let (ctx, sink) = context_with_recorder(100);
    let ctx = Arc::new(ctx);
    let frame = Arc::new(open_frame("Left", 0.25, 2.0, OUTPUT));

    // Act
    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let (ctx, frame) = (Arc::clone(&ctx), Arc::clone(&frame));
            tokio::spawn(async move { ctx.process_frame(&frame).len() })
        })
        .collect();
    let mut updates = 0;
    for task in tasks {
        updates += task.await.unwrap();
    }

    // Assert
    assert_eq!(updates, 32);
    assert_eq!(sink.sent().len(), 3);
}
