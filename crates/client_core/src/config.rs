use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::links::DEFAULT_EPISODE_HOST;

pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub episode_host: String,
    pub link_toast_duration_ms: u64,
    pub login_toast_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4040/api".into(),
            episode_host: DEFAULT_EPISODE_HOST.into(),
            link_toast_duration_ms: 3000,
            login_toast_duration_ms: 700,
        }
    }
}

/// Defaults, then `client.toml` in the working directory, then `APP__*`
/// environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        }
    }
    apply_env(&mut settings);
    settings
}

/// Reads a settings file strictly; unlike `load_settings` a missing or
/// malformed file is an error.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;

    let mut settings = Settings::default();
    apply_file_values(&mut settings, &file_cfg);
    Ok(settings)
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("episode_host").and_then(toml::Value::as_str) {
        settings.episode_host = v.to_string();
    }
    if let Some(v) = file_cfg.get("link_toast_duration_ms").and_then(as_millis) {
        settings.link_toast_duration_ms = v;
    }
    if let Some(v) = file_cfg.get("login_toast_duration_ms").and_then(as_millis) {
        settings.login_toast_duration_ms = v;
    }
}

fn apply_env(settings: &mut Settings) {
    if let Ok(v) = std::env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("APP__EPISODE_HOST") {
        settings.episode_host = v;
    }

    if let Ok(v) = std::env::var("APP__LINK_TOAST_DURATION_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.link_toast_duration_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__LOGIN_TOAST_DURATION_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.login_toast_duration_ms = parsed;
        }
    }
}

fn as_millis(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(v) => u64::try_from(*v).ok(),
        toml::Value::String(v) => v.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
