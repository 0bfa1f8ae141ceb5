use super::*;

use std::{
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("landing_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("landing.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_match_hosted_form() {
    let settings = load_settings_from(None, no_env).expect("defaults");
    assert_eq!(settings, EndpointSettings::default());
    assert_eq!(settings.email_field, "field_0");
    assert_eq!(
        settings.honeypot_field,
        "hpc4b27b6e-eb3b-11e9-be00-06b4694bee2a"
    );
    assert_eq!(settings.success_display_interval(), Duration::from_millis(4000));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        r#"
form_action = "https://forms.example.test/subscribe"
success_display_ms = 2500
request_timeout_secs = "5"
"#,
    );

    let settings = load_settings_from(Some(&path), no_env).expect("load");
    assert_eq!(settings.form_action, "https://forms.example.test/subscribe");
    assert_eq!(settings.success_display_ms, 2500);
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    assert_eq!(settings.email_field, "field_0");

    if let Some(parent) = path.parent() {
        fs::remove_dir_all(parent).expect("cleanup");
    }
}

#[test]
fn app_prefixed_env_wins_over_landing_prefixed_env() {
    let settings = load_settings_from(None, |name| match name {
        "LANDING_FORM_ACTION" => Some("https://landing.example.test/form".to_string()),
        "APP__FORM_ACTION" => Some("https://app.example.test/form".to_string()),
        "LANDING_EMAIL_FIELD" => Some("field_9".to_string()),
        _ => None,
    })
    .expect("load");

    assert_eq!(settings.form_action, "https://app.example.test/form");
    assert_eq!(settings.email_field, "field_9");
}

#[test]
fn blank_env_values_are_ignored() {
    let settings = load_settings_from(None, |name| {
        (name == "APP__FORM_ACTION").then(|| "   ".to_string())
    })
    .expect("load");
    assert_eq!(settings.form_action, DEFAULT_FORM_ACTION);
}

#[test]
fn rejects_non_http_form_action() {
    let err = load_settings_from(None, |name| {
        (name == "APP__FORM_ACTION").then(|| "ftp://example.test/form".to_string())
    })
    .expect_err("must reject");
    assert!(err.to_string().contains("unsupported scheme"), "{err}");

    let err = load_settings_from(None, |name| {
        (name == "APP__FORM_ACTION").then(|| "not a url".to_string())
    })
    .expect_err("must reject");
    assert!(err.to_string().contains("not a valid http(s) url"), "{err}");
}

#[test]
fn rejects_zero_display_interval() {
    let err = load_settings_from(None, |name| {
        (name == "LANDING_SUCCESS_DISPLAY_MS").then(|| "0".to_string())
    })
    .expect_err("must reject");
    assert!(err.to_string().contains("success_display_ms"), "{err}");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let missing = env::temp_dir().join("landing_settings_test_missing").join("landing.toml");
    let err = load_settings_from(Some(&missing), no_env).expect_err("must fail");
    assert!(err.to_string().contains("failed to read settings file"), "{err}");
}
