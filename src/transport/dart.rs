//! DART device-automation transport.
//!
//! DART is the lab's device-automation service: it owns a pool of
//! devkits and exposes an HTTP control plane that can inject native
//! controller input into a device under test. This transport schedules
//! a run against the target device, resolves the run to a device
//! process, and presses buttons through the process's virtual-input
//! endpoint.
//!
//! Script evaluation is not something DART offers, so the transport
//! nests an [`InspectorTransport`] against the same device and
//! delegates `evaluate` to it.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::keys::LogicalKey;

use super::inspector::InspectorTransport;
use super::options::ConnectOptions;
use super::{Transport, TransportKind, TransportState};

// ============================================================================
// Constants
// ============================================================================

/// Run-definition name prefix; the device address completes it.
const RUN_DEFINITION_PREFIX: &str = "infinityTest-";

/// Suite name the scheduled run executes under.
const RUN_SUITE_NAME: &str = "PS4 Tests";

// ============================================================================
// DartTransport
// ============================================================================

/// Transport driving a device through the DART control plane.
///
/// Presses arrive as native controller input, so keys with no DOM
/// representation (the PS button) work only here.
pub struct DartTransport {
    /// Connection lifecycle state.
    state: TransportState,
    /// Settle delay before and after each press.
    settle_delay: Duration,
    /// Delay between scheduling a run and polling its process id.
    provision_delay: Duration,
    /// Control plane root URL.
    base_url: String,
    /// HTTP client for the control plane.
    http: reqwest::Client,
    /// Nested inspector for script evaluation.
    inspector: InspectorTransport,
    /// Scheduled run id, when Connected.
    run_id: Option<String>,
    /// Virtual-input endpoint, when Connected.
    vinput_url: Option<String>,
}

impl DartTransport {
    /// Creates a disconnected DART transport.
    #[must_use]
    pub fn new(options: &ConnectOptions) -> Self {
        Self {
            state: TransportState::Disconnected,
            settle_delay: options.settle_delay,
            provision_delay: options.provision_delay,
            base_url: options.dart_base_url.clone(),
            http: reqwest::Client::new(),
            inspector: InspectorTransport::new(options),
            run_id: None,
            vinput_url: None,
        }
    }

    /// Schedules a run for the device and resolves its vinput endpoint.
    async fn provision(&self, address: &str) -> Result<(String, String)> {
        let base = &self.base_url;
        let suite = urlencoding::encode(RUN_SUITE_NAME);

        let schedule_url =
            format!("{base}definitions/by-name/{RUN_DEFINITION_PREFIX}{address}/run/{suite}");
        let run_id = self
            .http
            .post(&schedule_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::connection(format!("failed to schedule DART run: {e}")))?
            .text()
            .await
            .map_err(|e| Error::connection(format!("unreadable DART run id: {e}")))?
            .trim()
            .to_string();

        if run_id.is_empty() {
            return Err(Error::connection("DART returned an empty run id"));
        }
        debug!(run_id, "DART run scheduled");

        // The run needs time to claim a device before it has a process
        sleep(self.provision_delay).await;

        let process_id = self
            .http
            .get(format!("{base}instances/by-id/{run_id}/processId"))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::connection(format!("failed to resolve DART process: {e}")))?
            .text()
            .await
            .map_err(|e| Error::connection(format!("unreadable DART process id: {e}")))?
            .trim()
            .to_string();

        let vinput_url = format!("{base}instances/process/{process_id}/vinput/");

        // The device comes up holding an input session; release it
        self.http
            .post(format!("{vinput_url}close"))
            .send()
            .await
            .map_err(|e| Error::connection(format!("failed to reset DART input session: {e}")))?;

        info!(process_id, url = %vinput_url, "Connected to DART process");
        Ok((run_id, vinput_url))
    }
}

// ============================================================================
// Transport Implementation
// ============================================================================

#[async_trait]
impl Transport for DartTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Dart
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn connect(&mut self, address: &str) -> Result<()> {
        self.state = TransportState::Connecting;

        // Evaluation path first; a devkit without its debugger up is
        // not worth scheduling a run against.
        if let Err(e) = self.inspector.connect(address).await {
            self.state = TransportState::Disconnected;
            return Err(e);
        }

        match self.provision(address).await {
            Ok((run_id, vinput_url)) => {
                self.run_id = Some(run_id);
                self.vinput_url = Some(vinput_url);
                self.state = TransportState::Connected;
                info!(address, "Connected to device via DART");
                Ok(())
            }
            Err(e) => {
                let _ = self.inspector.disconnect().await;
                self.state = TransportState::Disconnected;
                Err(e)
            }
        }
    }

    async fn press_key(&mut self, key: LogicalKey) -> Result<bool> {
        // Every logical key has a native mapping on this transport
        let key_name = key.dart_name();

        let vinput_url = self.vinput_url.as_ref().ok_or(Error::NotConnected)?;

        debug!(key = %key, code = key_name, "Press");
        sleep(self.settle_delay).await;

        let response = self
            .http
            .post(format!("{vinput_url}open"))
            .body(format!("press({key_name},once)"))
            .send()
            .await?;
        response.error_for_status()?;

        // Give the shell time to react before the next command lands
        sleep(self.settle_delay).await;

        Ok(true)
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.inspector.evaluate(expression).await
    }

    // DART has no page to navigate; the default no-op applies.

    async fn disconnect(&mut self) -> Result<()> {
        self.inspector.disconnect().await?;

        self.vinput_url = None;
        if let Some(run_id) = self.run_id.take() {
            let stop_url = format!("{}instances/by-id/{run_id}/stop", self.base_url);
            if let Err(e) = self.http.post(&stop_url).send().await {
                warn!(run_id, error = %e, "Failed to stop DART run");
            } else {
                info!(run_id, "Disconnected from DART server");
            }
        }

        self.state = TransportState::Disconnected;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
