use anyhow::Context;
use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use shared::{error::CaptureError, protocol::parse_subscribe_response};
use tracing::{debug, warn};

use crate::config::EndpointSettings;

#[async_trait]
pub trait SubscriptionEndpoint: Send + Sync {
    /// Sends one subscription request. Any outcome other than an explicit success
    /// is a `CaptureError::Submission`.
    async fn subscribe(&self, email: &str) -> Result<(), CaptureError>;
}

/// Posts to a hosted mailing-list form as `multipart/form-data`.
///
/// The client has no cookie store, so no credentials travel with the request.
pub struct FormEndpointClient {
    http: Client,
    form_action: String,
    email_field: String,
    honeypot_field: String,
}

impl FormEndpointClient {
    pub fn new(settings: &EndpointSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build subscription http client")?;
        Ok(Self::with_client(http, settings))
    }

    pub fn with_client(http: Client, settings: &EndpointSettings) -> Self {
        Self {
            http,
            form_action: settings.form_action.clone(),
            email_field: settings.email_field.clone(),
            honeypot_field: settings.honeypot_field.clone(),
        }
    }

    pub fn form_action(&self) -> &str {
        &self.form_action
    }

    fn form_for(&self, email: &str) -> Form {
        Form::new()
            .text(self.email_field.clone(), email.to_string())
            // Honeypot stays empty; the service drops submissions that fill it.
            .text(self.honeypot_field.clone(), String::new())
    }
}

#[async_trait]
impl SubscriptionEndpoint for FormEndpointClient {
    async fn subscribe(&self, email: &str) -> Result<(), CaptureError> {
        let response = self
            .http
            .post(&self.form_action)
            .multipart(self.form_for(email))
            .send()
            .await
            .map_err(|err| {
                warn!(form_action = %self.form_action, "subscription transport failure: {err}");
                CaptureError::Submission(format!("transport failure: {err}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            warn!(%status, "failed to read subscription response body: {err}");
            CaptureError::Submission(format!("failed to read response body: {err}"))
        })?;
        debug!(%status, body_len = body.len(), "subscription endpoint responded");

        parse_subscribe_response(&body).inspect_err(|err| {
            warn!(%status, detail = err.detail(), "subscription rejected");
        })
    }
}

#[cfg(test)]
#[path = "tests/endpoint_tests.rs"]
mod tests;
