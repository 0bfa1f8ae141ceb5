use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const VALIDATION_ALERT: &str = "Please enter a valid email address";
pub const SUBMISSION_ALERT: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureErrorKind {
    Validation,
    Submission,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Rejected locally; never reaches the network.
    #[error("invalid email: {0}")]
    Validation(String),
    /// Remote rejection or transport fault.
    #[error("submission failed: {0}")]
    Submission(String),
}

impl CaptureError {
    pub fn kind(&self) -> CaptureErrorKind {
        match self {
            Self::Validation(_) => CaptureErrorKind::Validation,
            Self::Submission(_) => CaptureErrorKind::Submission,
        }
    }

    /// Generic text shown in the blocking alert. The detail stays in the trace.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            CaptureErrorKind::Validation => VALIDATION_ALERT,
            CaptureErrorKind::Submission => SUBMISSION_ALERT,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(detail) | Self::Submission(detail) => detail,
        }
    }
}
