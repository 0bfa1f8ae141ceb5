//! Wire format of the hosted mailing-list form.

use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

pub const DEFAULT_EMAIL_FIELD: &str = "field_0";
pub const DEFAULT_HONEYPOT_FIELD: &str = "hpc4b27b6e-eb3b-11e9-be00-06b4694bee2a";
pub const FALLBACK_FAILURE_MESSAGE: &str = "Submission failed";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response body of the form endpoint. `success` is kept loosely typed because
/// the service does not publish a schema; only a literal `true` is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeResponse {
    #[serde(default)]
    pub success: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SubscribeErrorBody>,
}

impl SubscribeResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.success, Some(serde_json::Value::Bool(true)))
    }

    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|error| error.message.clone())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string())
    }

    pub fn into_result(self) -> Result<(), CaptureError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(CaptureError::Submission(self.failure_message()))
        }
    }
}

/// Parses a raw response body; a body that is not JSON counts as a failed submission.
pub fn parse_subscribe_response(body: &str) -> Result<(), CaptureError> {
    let response: SubscribeResponse = serde_json::from_str(body)
        .map_err(|err| CaptureError::Submission(format!("unreadable response body: {err}")))?;
    response.into_result()
}
