//! Owns the record being edited and the submission lifecycle.
//!
//! ```text
//! Idle|Success|Error --begin_submit--> Submitting
//! Submitting --finish_submit(success)--> Success (record partially reset)
//! Submitting --finish_submit(other)----> Error   (record unchanged)
//! ```

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::endpoint::Endpoint;
use crate::error::{GastosError, Result};
use crate::models::{ExpenseRecord, Field, FieldError, FieldValue, ScriptResponse};

/// Shown when the endpoint reports a failure without a message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error from script";

/// Shown when the request or its reply could not be read. The write may still
/// have landed: the script's reply is often unreadable even when the row was added.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error submitting. Check the log. (Note: If data appeared in Sheets, this is just a CORS warning).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Why a submit never left the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A request is already in flight.
    InFlight,
    /// Required fields are missing or malformed.
    Invalid(Vec<FieldError>),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InFlight => f.write_str("A submission is already in progress"),
            SubmitError::Invalid(errors) => {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                f.write_str(&msgs.join("; "))
            }
        }
    }
}

impl std::error::Error for SubmitError {}

pub struct FormController {
    record: ExpenseRecord,
    status: SubmissionStatus,
    message: String,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(ExpenseRecord::today())
    }
}

impl FormController {
    pub fn new(record: ExpenseRecord) -> Self {
        Self {
            record,
            status: SubmissionStatus::Idle,
            message: String::new(),
        }
    }

    pub fn record(&self) -> &ExpenseRecord {
        &self.record
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Replace one field, leaving every other field as it was.
    pub fn update(&mut self, field: Field, value: impl Into<FieldValue>) -> Result<()> {
        self.record.set(field, value.into())
    }

    /// Enter `Submitting` and hand back the payload to send.
    pub fn begin_submit(&mut self) -> std::result::Result<ExpenseRecord, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        self.record.validate().map_err(SubmitError::Invalid)?;
        self.status = SubmissionStatus::Submitting;
        info!(
            category = %self.record.category,
            amount = %self.record.amount,
            "submitting expense"
        );
        debug!(payload = ?self.record, "outbound record");
        Ok(self.record.clone())
    }

    /// Apply the endpoint's outcome to the in-flight submission.
    pub fn finish_submit(&mut self, outcome: Result<ScriptResponse>) {
        if !self.is_submitting() {
            warn!(status = ?self.status, "ignoring submission outcome with nothing in flight");
            return;
        }
        match outcome {
            Ok(reply) if reply.is_success() => {
                self.status = SubmissionStatus::Success;
                self.message = reply.message.unwrap_or_default();
                self.record.reset_after_success();
                info!(message = %self.message, "expense recorded");
            }
            Ok(reply) => {
                self.status = SubmissionStatus::Error;
                self.message = reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
                warn!(status = ?reply.status, message = %self.message, "endpoint rejected expense");
            }
            Err(e) => {
                error!(error = %e, "submission error");
                self.status = SubmissionStatus::Error;
                self.message = TRANSPORT_FAILURE_MESSAGE.to_string();
            }
        }
    }

    /// Run a whole submission synchronously against `endpoint`.
    pub fn submit(&mut self, endpoint: &dyn Endpoint) -> std::result::Result<SubmissionStatus, SubmitError> {
        let payload = self.begin_submit()?;
        let outcome = endpoint.post(&payload);
        self.finish_submit(outcome);
        Ok(self.status)
    }
}

impl From<SubmitError> for GastosError {
    fn from(e: SubmitError) -> Self {
        GastosError::Other(e.to_string())
    }
}
