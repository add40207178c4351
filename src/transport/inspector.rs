//! Remote Web Inspector transport.
//!
//! Attaches to the debugger the device exposes on port 860: lists the
//! debuggable pages over HTTP, picks the shell UI page, opens its
//! WebSocket debugger endpoint and drives it with `Runtime` commands.
//! Key presses are synthetic DOM key events dispatched by script
//! against the shell's focus sink.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::keys::{LogicalKey, key_event_script};
use crate::protocol::page::choose_page;
use crate::protocol::{EvaluateResult, PageInfo, Request};

use super::connection::Connection;
use super::options::ConnectOptions;
use super::{Transport, TransportKind, TransportState, split_address, value_is_truthy};

// ============================================================================
// Constants
// ============================================================================

/// Port the device's remote inspector listens on.
pub(crate) const INSPECTOR_PORT: u16 = 860;

// ============================================================================
// InspectorTransport
// ============================================================================

/// Transport speaking the remote Web Inspector protocol.
///
/// This is the primary transport: it needs nothing besides a devkit
/// with the debugger enabled, and the other script-capable transport
/// (DART) nests one of these for its evaluation path.
pub struct InspectorTransport {
    /// Connection lifecycle state.
    state: TransportState,
    /// Delay before each remote round trip.
    command_delay: Duration,
    /// Deadline for the attach handshake.
    connect_timeout: Duration,
    /// HTTP client for the page-list endpoint.
    http: reqwest::Client,
    /// Live WebSocket connection, when Connected.
    connection: Option<Connection>,
}

impl InspectorTransport {
    /// Creates a disconnected inspector transport.
    #[must_use]
    pub fn new(options: &ConnectOptions) -> Self {
        Self {
            state: TransportState::Disconnected,
            command_delay: options.command_delay,
            connect_timeout: options.connect_timeout,
            http: reqwest::Client::new(),
            connection: None,
        }
    }

    /// Returns the number of commands awaiting a device response.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.connection
            .as_ref()
            .map_or(0, Connection::pending_count)
    }

    /// Lists targets, attaches to the shell page and confirms it live.
    async fn attach(&self, address: &str) -> Result<Connection> {
        let (host, port) = split_address(address, INSPECTOR_PORT);

        let list_url = format!("http://{host}:{port}/json");
        let pages: Vec<PageInfo> = self
            .http
            .get(&list_url)
            .send()
            .await
            .map_err(|e| Error::connection(format!("failed to list debugger targets: {e}")))?
            .json()
            .await
            .map_err(|e| Error::connection(format!("malformed debugger target list: {e}")))?;

        let page = choose_page(&pages)?;
        let ws_url = page.debugger_url(&host, port)?;
        debug!(
            page = page.process_display_name.as_deref().unwrap_or("<unnamed>"),
            url = %ws_url,
            "Attaching to debugger target"
        );

        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url.as_str())
            .await
            .map_err(|e| Error::connection(format!("failed to attach to {ws_url}: {e}")))?;

        let connection = Connection::new(ws_stream);

        // The target is live once it acknowledges Runtime.enable
        let enable = connection.send(Request::enable(connection.next_id()));
        timeout(self.connect_timeout, enable)
            .await
            .map_err(|_| Error::connection_timeout(self.connect_timeout.as_millis() as u64))??
            .into_result()?;

        Ok(connection)
    }
}

// ============================================================================
// Transport Implementation
// ============================================================================

#[async_trait]
impl Transport for InspectorTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Inspector
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn connect(&mut self, address: &str) -> Result<()> {
        self.state = TransportState::Connecting;

        match self.attach(address).await {
            Ok(connection) => {
                self.connection = Some(connection);
                self.state = TransportState::Connected;
                info!(address, "Connected to remote Web Inspector");
                Ok(())
            }
            Err(e) => {
                self.state = TransportState::Disconnected;
                Err(e)
            }
        }
    }

    async fn press_key(&mut self, key: LogicalKey) -> Result<bool> {
        let key_code = key
            .dom_key_code()
            .ok_or_else(|| Error::unsupported_key(key, TransportKind::Inspector))?;

        debug!(key = %key, key_code, "Press");
        let value = self.evaluate(&key_event_script(key_code)).await?;
        Ok(value_is_truthy(&value))
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let connection = self.connection.as_ref().ok_or(Error::NotConnected)?;

        if !self.command_delay.is_zero() {
            sleep(self.command_delay).await;
        }

        let request = Request::evaluate(connection.next_id(), expression);
        let response = connection.send(request).await?;

        let eval: EvaluateResult = serde_json::from_value(response.into_result()?)?;
        eval.into_value()
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            let pending = connection.pending_count();
            if pending > 0 {
                warn!(pending, "Disconnecting with commands still in flight");
            }
            connection.shutdown();
            info!("Disconnected from remote Web Inspector");
        }

        self.state = TransportState::Disconnected;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
