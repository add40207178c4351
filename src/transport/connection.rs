//! Inspector WebSocket connection and event loop.
//!
//! This module handles the WebSocket connection to the device's remote
//! Web Inspector, including request/response correlation.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the inspector (responses, notifications)
//! - Outgoing commands from the transport
//! - Request/response correlation by numeric id
//!
//! One command is in flight at a time (the calling test step is blocked
//! on it), so the correlation map holds at most one entry in practice;
//! the map form keeps shutdown handling uniform.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{Request, Response};

// ============================================================================
// Types
// ============================================================================

/// WebSocket stream to the inspector endpoint.
pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Map of request ids to response channels.
type CorrelationMap = FxHashMap<u64, oneshot::Sender<Result<Response>>>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to the device's remote inspector.
///
/// Handles request/response correlation. The connection spawns an
/// internal event loop task which keeps servicing the socket while the
/// calling test step is suspended on a response.
///
/// Sends carry no deadline of their own: a command against a hung
/// device suspends its caller until the caller's own timeout (if any)
/// fires. Bounded waits are built on top, in the facade's `wait_for`.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Next request id.
    next_id: AtomicU64,
}

impl Connection {
    /// Creates a new connection from a WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    pub(crate) fn new(ws_stream: WsStream) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
        ));

        Self {
            command_tx,
            correlation,
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates the next request id.
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends a request and waits for its response.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the event loop has terminated
    /// - the transport failure the event loop recorded for this request
    pub async fn send(&self, request: Request) -> Result<Response> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::NotConnected)?;

        match response_rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::NotConnected),
        }
    }

    /// Returns the number of commands awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Shuts down the connection gracefully.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming messages from the inspector
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the transport
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(
                                request,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        // Fail all pending requests on shutdown
        Self::fail_pending_requests(&correlation);

        debug!("Event loop terminated");
    }

    /// Handles an incoming text message from the inspector.
    fn handle_incoming_message(text: &str, correlation: &Arc<Mutex<CorrelationMap>>) {
        // Responses carry the id of the request they answer
        if let Ok(response) = from_str::<Response>(text) {
            let tx = correlation.lock().remove(&response.id);

            if let Some(tx) = tx {
                let _ = tx.send(Ok(response));
            } else {
                warn!(id = response.id, "Response for unknown request");
            }

            return;
        }

        // Anything else is an unsolicited inspector notification
        trace!(text = %text, "Ignoring inspector notification");
    }

    /// Handles a send command from the transport.
    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut futures_util::stream::SplitSink<WsStream, Message>,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) {
        let request_id = request.id;

        // Serialize request
        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Store correlation before sending
        correlation.lock().insert(request_id, response_tx);

        // Send over WebSocket
        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            if let Some(tx) = correlation.lock().remove(&request_id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
        }

        trace!(request_id, "Request sent");
    }

    /// Fails all pending requests when the event loop stops.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::NotConnected));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_monotonic() {
        let (command_tx, _command_rx) = mpsc::unbounded_channel();
        let connection = Connection {
            command_tx,
            correlation: Arc::new(Mutex::new(CorrelationMap::default())),
            next_id: AtomicU64::new(1),
        };

        let first = connection.next_id();
        let second = connection.next_id();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_send_after_loop_death_is_not_connected() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        drop(command_rx);

        let connection = Connection {
            command_tx,
            correlation: Arc::new(Mutex::new(CorrelationMap::default())),
            next_id: AtomicU64::new(1),
        };

        let err = connection
            .send(Request::enable(connection.next_id()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }
}
