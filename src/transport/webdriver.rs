//! WebDriver browser-automation transport.
//!
//! Drives the desktop simulator build of the shell UI through a
//! WebDriver hub speaking the JSON wire protocol. The simulator runs
//! as a Chrome page served next to the hub; connecting means creating
//! a session, steering it to the harness page and waiting until the
//! page's harness global announces itself.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::keys::{LogicalKey, key_event_script};

use super::options::{ConnectOptions, WindowPosition};
use super::{Transport, TransportKind, TransportState, value_is_truthy};

// ============================================================================
// Constants
// ============================================================================

/// Marker the harness page defines once its scripting surface is up.
const HARNESS_READY_EXPRESSION: &str = "window.RemoteShell !== undefined";

/// Interval between readiness polls while connecting.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// WebDriverTransport
// ============================================================================

/// Transport driving the simulator through a WebDriver hub.
///
/// Unlike the device transports this one controls an ordinary desktop
/// browser, so it is the only transport that honors window placement
/// and real page navigation.
pub struct WebDriverTransport {
    /// Connection lifecycle state.
    state: TransportState,
    /// Delay before each remote round trip.
    command_delay: Duration,
    /// Deadline for the readiness poll.
    connect_timeout: Duration,
    /// Simulator harness page to steer the session to.
    harness_page_url: String,
    /// Requested window placement.
    window_position: Option<WindowPosition>,
    /// HTTP client for the wire protocol.
    http: reqwest::Client,
    /// Hub root (`http://host/wd/hub`), when Connected.
    base_url: Option<String>,
    /// Wire session id, when Connected.
    session_id: Option<String>,
}

impl WebDriverTransport {
    /// Creates a disconnected WebDriver transport.
    #[must_use]
    pub fn new(options: &ConnectOptions) -> Self {
        Self {
            state: TransportState::Disconnected,
            command_delay: options.command_delay,
            connect_timeout: options.connect_timeout,
            harness_page_url: options.harness_page_url.clone(),
            window_position: options.window_position,
            http: reqwest::Client::new(),
            base_url: None,
            session_id: None,
        }
    }

    /// Builds the Chrome capabilities for the simulator session.
    fn capabilities(position: Option<&WindowPosition>) -> Value {
        let mut chrome_options = json!({
            "args": ["--disable-web-security", "--console"],
            "detach": true,
        });

        if let Some(position) = position {
            chrome_options["prefs"] = json!({
                "browser": {
                    "window_placement": {
                        "left": position.left,
                        "top": position.top,
                        "right": position.right(),
                        "bottom": position.bottom(),
                        "maximized": false,
                    }
                }
            });
        }

        json!({
            "desiredCapabilities": {
                "browserName": "chrome",
                "chromeOptions": chrome_options,
            }
        })
    }

    /// Creates the wire session and returns its id.
    async fn create_session(&self, base_url: &str) -> Result<String> {
        let payload: Value = self
            .http
            .post(format!("{base_url}/session"))
            .json(&Self::capabilities(self.window_position.as_ref()))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::connection(format!("failed to create WebDriver session: {e}")))?
            .json()
            .await
            .map_err(|e| Error::connection(format!("malformed WebDriver response: {e}")))?;

        payload
            .get("sessionId")
            .or_else(|| payload.pointer("/value/sessionId"))
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::connection("WebDriver hub returned no session id"))
    }

    /// Runs a script body in the page and returns its wire value.
    async fn execute(&self, script: &str) -> Result<Value> {
        let base_url = self.base_url.as_ref().ok_or(Error::NotConnected)?;
        let session_id = self.session_id.as_ref().ok_or(Error::NotConnected)?;

        if !self.command_delay.is_zero() {
            sleep(self.command_delay).await;
        }

        let payload: Value = self
            .http
            .post(format!("{base_url}/session/{session_id}/execute"))
            .json(&json!({ "script": script, "args": [] }))
            .send()
            .await?
            .json()
            .await?;

        // Wire status 0 is success; anything else carries the page error
        let status = payload.get("status").and_then(Value::as_i64).unwrap_or(0);
        if status != 0 {
            let message = payload
                .pointer("/value/message")
                .and_then(Value::as_str)
                .map(String::from);
            return Err(match message {
                Some(message) => Error::remote_evaluation(message),
                None => Error::unknown_remote_failure(),
            });
        }

        Ok(payload.get("value").cloned().unwrap_or(Value::Null))
    }

    /// Polls the harness page until its global marker exists.
    async fn wait_until_ready(&self) -> Result<()> {
        let deadline = Instant::now() + self.connect_timeout;

        loop {
            match self.evaluate_expression(HARNESS_READY_EXPRESSION).await {
                Ok(value) if value_is_truthy(&value) => return Ok(()),
                Ok(_) => trace!("Harness page not ready yet"),
                // The page may still be mid-load; keep polling
                Err(e) => trace!(error = %e, "Readiness poll failed"),
            }

            if Instant::now() >= deadline {
                return Err(Error::connection_timeout(
                    self.connect_timeout.as_millis() as u64,
                ));
            }

            sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Evaluates an expression (as opposed to a statement list).
    async fn evaluate_expression(&self, expression: &str) -> Result<Value> {
        self.execute(&format!("return ({expression});")).await
    }

    /// Tears down the wire session, best effort.
    async fn delete_session(&mut self) {
        if let (Some(base_url), Some(session_id)) = (self.base_url.take(), self.session_id.take()) {
            let _ = self
                .http
                .delete(format!("{base_url}/session/{session_id}"))
                .send()
                .await;
        }
    }
}

// ============================================================================
// Transport Implementation
// ============================================================================

#[async_trait]
impl Transport for WebDriverTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::WebDriver
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn connect(&mut self, address: &str) -> Result<()> {
        self.state = TransportState::Connecting;

        let base_url = format!("http://{address}/wd/hub");
        let page_url = self.harness_page_url.clone();
        let result = async {
            let session_id = self.create_session(&base_url).await?;
            debug!(session_id, "WebDriver session created");

            self.base_url = Some(base_url.clone());
            self.session_id = Some(session_id);

            self.navigate_to(&page_url).await?;
            self.wait_until_ready().await
        }
        .await;

        match result {
            Ok(()) => {
                self.state = TransportState::Connected;
                info!(address, page = %self.harness_page_url, "Connected to WebDriver hub");
                Ok(())
            }
            Err(e) => {
                self.delete_session().await;
                self.state = TransportState::Disconnected;
                Err(e)
            }
        }
    }

    async fn press_key(&mut self, key: LogicalKey) -> Result<bool> {
        let key_code = key
            .dom_key_code()
            .ok_or_else(|| Error::unsupported_key(key, TransportKind::WebDriver))?;

        debug!(key = %key, key_code, "Press");
        self.execute(&key_event_script(key_code)).await?;
        Ok(true)
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.evaluate_expression(expression).await
    }

    async fn navigate_to(&mut self, url: &str) -> Result<()> {
        let base_url = self.base_url.as_ref().ok_or(Error::NotConnected)?;
        let session_id = self.session_id.as_ref().ok_or(Error::NotConnected)?;

        self.http
            .post(format!("{base_url}/session/{session_id}/url"))
            .json(&json!({ "url": url }))
            .send()
            .await?
            .error_for_status()?;

        debug!(url, "Navigated");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.session_id.is_some() {
            self.delete_session().await;
            info!("Disconnected from WebDriver hub");
        }

        self.state = TransportState::Disconnected;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
