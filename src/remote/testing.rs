//! Scriptable in-memory transport for facade tests.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::keys::LogicalKey;
use crate::transport::{Transport, TransportKind, TransportState};

// ============================================================================
// MockLog
// ============================================================================

/// Everything a mock transport saw, shared with the test.
#[derive(Debug, Default)]
pub(crate) struct MockLog {
    pub evaluations: Vec<String>,
    pub presses: Vec<LogicalKey>,
    pub disconnects: usize,
}

// ============================================================================
// MockTransport
// ============================================================================

/// A transport whose remote side is scripted by the test.
pub(crate) struct MockTransport {
    state: TransportState,
    responses: VecDeque<Value>,
    default_value: Value,
    evaluate_error: Option<String>,
    truthy_after: Option<Duration>,
    first_evaluate: Option<Instant>,
    failing_presses: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: TransportState::Connected,
            responses: VecDeque::new(),
            default_value: json!(true),
            evaluate_error: None,
            truthy_after: None,
            first_evaluate: None,
            failing_presses: false,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// Shared view of the call log.
    pub fn log(&self) -> Arc<Mutex<MockLog>> {
        Arc::clone(&self.log)
    }

    pub fn with_state(mut self, state: TransportState) -> Self {
        self.state = state;
        self
    }

    /// Queue one evaluation result; later calls fall back to the default.
    pub fn with_response(mut self, value: Value) -> Self {
        self.responses.push_back(value);
        self
    }

    /// Fixed result for every evaluation.
    pub fn with_evaluate_value(mut self, value: Value) -> Self {
        self.default_value = value;
        self
    }

    /// Every evaluation throws remotely with this description.
    pub fn with_evaluate_error(mut self, message: &str) -> Self {
        self.evaluate_error = Some(message.to_string());
        self
    }

    /// Evaluations yield `false` until the given time has passed, then `true`.
    pub fn truthy_after(mut self, delay: Duration) -> Self {
        self.truthy_after = Some(delay);
        self
    }

    /// Presses fail with a remote evaluation error.
    pub fn with_failing_presses(mut self) -> Self {
        self.failing_presses = true;
        self
    }
}

// ============================================================================
// Transport Implementation
// ============================================================================

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Inspector
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn connect(&mut self, _address: &str) -> Result<()> {
        self.state = TransportState::Connected;
        Ok(())
    }

    async fn press_key(&mut self, key: LogicalKey) -> Result<bool> {
        if key.dom_key_code().is_none() {
            return Err(Error::unsupported_key(key, self.kind()));
        }

        self.log.lock().presses.push(key);
        if self.failing_presses {
            return Err(Error::remote_evaluation("press dispatch failed"));
        }
        Ok(true)
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.log.lock().evaluations.push(expression.to_string());

        if let Some(message) = &self.evaluate_error {
            return Err(Error::remote_evaluation(message.clone()));
        }

        if let Some(delay) = self.truthy_after {
            let first = *self.first_evaluate.get_or_insert_with(Instant::now);
            return Ok(json!(first.elapsed() >= delay));
        }

        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| self.default_value.clone()))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.log.lock().disconnects += 1;
        self.state = TransportState::Disconnected;
        Ok(())
    }
}
