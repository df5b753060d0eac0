//! WebSocket server: accept loop and per-connection task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting connections and upgrading each one to a WebSocket session.
//! 3. Announcing every open control output to the page (`addMidi`).
//! 4. Reading tracker frames, gating them through the frame scheduler, and
//!    spawning one pipeline task per accepted frame.
//! 5. Writing display updates back through a per-connection writer task.
//! 6. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Concurrency
//!
//! Each connection runs in its own Tokio task, and each accepted frame in
//! another.  Frame tasks are not ordered relative to each other; the shared
//! latch in the pipeline context keeps the control output consistent.
//! Frame tasks never touch the socket: they push [`OutboundMsg`]s into a
//! bounded channel drained by the connection's writer task, so no pipeline
//! lock is ever held across a network write.
//!
//! # Failure isolation
//!
//! A decode error, a closed socket, or even a panic inside a connection
//! task ends that connection only.  The outer task inspects the inner
//! task's `JoinError` and logs panics instead of propagating them.  Frame
//! tasks get the same outer/inner split, so a panicking output device loses
//! one frame and leaves the connection running.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::application::{PipelineContext, Session, SessionRegistry};
use crate::domain::{FrameMessage, OutboundMsg};

/// How long `accept()` may block before the loop re-checks `running`.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Capacity of each connection's outbound message queue.
const OUTBOUND_QUEUE_DEPTH: usize = 256;

// ── Public API ────────────────────────────────────────────────────────────────

/// A bound, not yet serving, WebSocket listener.
pub struct BridgeServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    sessions: Arc<SessionRegistry>,
}

/// Binds the WebSocket listener on `addr`.
///
/// Port 0 binds an ephemeral port; read it back with
/// [`BridgeServer::local_addr`].
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, missing
/// permission).
pub async fn bind(addr: SocketAddr, context: Arc<PipelineContext>) -> anyhow::Result<BridgeServer> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to read bound listener address")?;

    Ok(BridgeServer {
        listener,
        local_addr,
        sessions: Arc::new(SessionRegistry::new(context)),
    })
}

impl BridgeServer {
    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Runs the accept loop until `running` is set to `false`.
    ///
    /// Connections already open keep running after the loop exits; they end
    /// when their peers disconnect or the runtime shuts down.
    pub async fn serve(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!("WebSocket bridge listening on {}", self.local_addr);

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            match timeout(ACCEPT_POLL_INTERVAL, self.listener.accept()).await {
                Ok(Ok((stream, peer_addr))) => {
                    info!("new browser connection from {peer_addr}");
                    let sessions = Arc::clone(&self.sessions);
                    tokio::spawn(async move {
                        handle_browser_session(stream, peer_addr, sessions).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient (e.g. out of file descriptors); keep serving.
                    error!("accept error: {e}");
                }
                Err(_) => {
                    // No connection in the last poll interval.
                }
            }
        }

        Ok(())
    }
}

/// Binds `addr` and serves until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(
    addr: SocketAddr,
    context: Arc<PipelineContext>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    bind(addr, context).await?.serve(running).await
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for one connection.
///
/// Runs [`run_session`] in its own task so that a panic anywhere in the
/// session surfaces here as a `JoinError` instead of tearing down the
/// accept loop.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    sessions: Arc<SessionRegistry>,
) {
    let task = tokio::spawn(run_session(raw_stream, peer_addr, sessions));
    match task.await {
        Ok(Ok(())) => info!("session {peer_addr} closed normally"),
        Ok(Err(e)) => debug!("session {peer_addr} closed with error: {e:#}"),
        Err(e) if e.is_panic() => error!("session {peer_addr} panicked; connection dropped"),
        Err(e) => warn!("session {peer_addr} task cancelled: {e}"),
    }
}

/// Runs the complete lifecycle of one WebSocket connection.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails.  Everything after the
/// handshake ends the session quietly.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    sessions: Arc<SessionRegistry>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let session = sessions.open(peer_addr);
    info!(session = %session.id(), "WebSocket session established: {peer_addr}");

    let (mut ws_tx, ws_rx) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::channel::<OutboundMsg>(OUTBOUND_QUEUE_DEPTH);

    // ── Writer: drains the outbound queue onto the socket ────────────────────
    let session_id = session.id();
    let mut writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("session {session_id}: JSON serialization error: {e}");
                    continue;
                }
            };
            if ws_tx.send(WsMessage::Text(text)).await.is_err() {
                debug!("session {session_id}: WebSocket send failed (browser disconnected)");
                break;
            }
        }
    });

    // ── Announce available control outputs ───────────────────────────────────
    for name in session.context().output_names() {
        if out_tx.send(OutboundMsg::add_midi(name)).await.is_err() {
            break;
        }
    }

    // ── Reader: frames in, pipeline tasks out ────────────────────────────────
    tokio::select! {
        _ = read_frames(ws_rx, &session, out_tx) => {
            debug!("session {session_id}: reader ended");
        }
        _ = &mut writer => {
            debug!("session {session_id}: writer ended");
        }
    }
    writer.abort();

    Ok(())
}

/// Reads frames until the peer closes or sends something undecodable.
async fn read_frames<S>(mut ws_rx: S, session: &Session, out_tx: mpsc::Sender<OutboundMsg>)
where
    S: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    let session_id = session.id();

    loop {
        let ws_msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {session_id}: browser WebSocket closed");
                break;
            }
            Some(Err(e)) => {
                debug!("session {session_id}: browser WebSocket error: {e}");
                break;
            }
            None => {
                debug!("session {session_id}: browser stream ended");
                break;
            }
        };

        let payload = match ws_msg {
            WsMessage::Text(text) => text.into_bytes(),
            WsMessage::Binary(bytes) => bytes,
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            WsMessage::Close(_) => {
                debug!("session {session_id}: WebSocket Close frame received");
                break;
            }
        };

        let frame: FrameMessage = match serde_json::from_slice(&payload) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("session {session_id}: undecodable frame, closing: {e}");
                break;
            }
        };

        session.select_output(&frame.midi_out);
        let context = Arc::clone(session.context());
        let accepted = context.should_process();
        session.record_frame(accepted);
        if !accepted {
            trace!("session {session_id}: frame dropped by scheduler");
            continue;
        }

        tokio::spawn(handle_frame(context, frame, out_tx.clone(), session_id));
    }
}

// ── Per-frame handler ─────────────────────────────────────────────────────────

/// Top-level handler for one accepted frame.
///
/// The pipeline runs in its own task so that a panic inside it (an output
/// device, say) is logged here and costs only this frame's display updates.
async fn handle_frame(
    context: Arc<PipelineContext>,
    frame: FrameMessage,
    out_tx: mpsc::Sender<OutboundMsg>,
    session_id: Uuid,
) {
    let task = tokio::spawn(run_frame(context, frame, out_tx, session_id));
    match task.await {
        Ok(()) => {}
        Err(e) if e.is_panic() => {
            error!("session {session_id}: frame pipeline panicked; frame dropped");
        }
        Err(e) => warn!("session {session_id}: frame task cancelled: {e}"),
    }
}

/// Runs the pipeline on `frame` and queues its display updates.
async fn run_frame(
    context: Arc<PipelineContext>,
    frame: FrameMessage,
    out_tx: mpsc::Sender<OutboundMsg>,
    session_id: Uuid,
) {
    for update in context.process_frame(&frame) {
        if out_tx.send(update).await.is_err() {
            debug!("session {session_id}: connection gone, dropping display update");
            break;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
