use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use shared::protocol::{DEFAULT_EMAIL_FIELD, DEFAULT_HONEYPOT_FIELD};
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "landing.toml";
pub const DEFAULT_FORM_ACTION: &str =
    "https://eomail5.com/form/b7b93d50-eaf6-11f0-abdc-bf3561320fe8";
pub const DEFAULT_SUCCESS_DISPLAY_MS: u64 = 4000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("form_action '{value}' is not a valid http(s) url: {reason}")]
    InvalidFormAction { value: String, reason: String },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    pub form_action: String,
    pub email_field: String,
    pub honeypot_field: String,
    pub success_display_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            form_action: DEFAULT_FORM_ACTION.into(),
            email_field: DEFAULT_EMAIL_FIELD.into(),
            honeypot_field: DEFAULT_HONEYPOT_FIELD.into(),
            success_display_ms: DEFAULT_SUCCESS_DISPLAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl EndpointSettings {
    pub fn success_display_interval(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed =
            Url::parse(&self.form_action).map_err(|err| SettingsError::InvalidFormAction {
                value: self.form_action.clone(),
                reason: err.to_string(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidFormAction {
                value: self.form_action.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.email_field.trim().is_empty() {
            return Err(SettingsError::EmptyField {
                field: "email_field",
            });
        }
        if self.honeypot_field.trim().is_empty() {
            return Err(SettingsError::EmptyField {
                field: "honeypot_field",
            });
        }
        Ok(())
    }
}

/// Defaults, then `landing.toml` from the working directory if present, then environment.
pub fn load_settings() -> anyhow::Result<EndpointSettings> {
    let default_path = Path::new(DEFAULT_SETTINGS_FILE);
    let path = default_path.exists().then_some(default_path);
    load_settings_from(path, |name| std::env::var(name).ok())
}

/// An explicit `path` must exist. `lookup_env` resolves environment overrides.
pub fn load_settings_from(
    path: Option<&Path>,
    lookup_env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<EndpointSettings> {
    let mut settings = EndpointSettings::default();

    if let Some(path) = path {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        apply_overrides(&mut settings, |key| file_cfg.get(key).map(toml_value_text))?;
    }

    apply_overrides(&mut settings, |key| {
        let upper = key.to_ascii_uppercase();
        lookup_env(&format!("APP__{upper}"))
            .or_else(|| lookup_env(&format!("LANDING_{upper}")))
            .filter(|value| !value.trim().is_empty())
    })?;

    settings.validate()?;
    Ok(settings)
}

fn apply_overrides(
    settings: &mut EndpointSettings,
    source: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    if let Some(v) = source("form_action") {
        settings.form_action = v;
    }
    if let Some(v) = source("email_field") {
        settings.email_field = v;
    }
    if let Some(v) = source("honeypot_field") {
        settings.honeypot_field = v;
    }
    if let Some(v) = source("success_display_ms") {
        settings.success_display_ms = parse_positive("success_display_ms", &v)?;
    }
    if let Some(v) = source("request_timeout_secs") {
        settings.request_timeout_secs = parse_positive("request_timeout_secs", &v)?;
    }
    Ok(())
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, SettingsError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(SettingsError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}

fn toml_value_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
