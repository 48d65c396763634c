//! API boundary errors.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while validating request payloads.
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    /// One or more request fields are out of range; all messages are
    /// collected before reporting.
    #[error("Validation errors: {}", messages.join("; "))]
    #[diagnostic(code(tickler_api::validation))]
    Validation { messages: Vec<String> },

    /// An update payload targets a different rule variant than the stored
    /// item.
    #[error("reminder {id} is not a {expected} reminder")]
    #[diagnostic(code(tickler_api::kind_mismatch))]
    KindMismatch { id: i64, expected: &'static str },
}

impl ApiError {
    pub fn validation(messages: Vec<String>) -> Self {
        Self::Validation { messages }
    }
}

/// Collects range-check failures so a response can report them all at once.
#[derive(Debug, Default)]
pub struct Validator {
    messages: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure message when `ok` is false.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.messages.push(message.into());
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.messages))
        }
    }
}
