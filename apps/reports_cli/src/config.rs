use std::{collections::HashMap, fs, path::PathBuf};

use shared::domain::CURRENT_USER;

pub const SETTINGS_FILE: &str = "reports.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub snapshot_path: PathBuf,
    pub default_engineer: String,
    pub default_author: String,
    pub log_filter: String,
    pub seed_on_empty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: "./data/session.json".into(),
            default_engineer: CURRENT_USER.into(),
            default_author: CURRENT_USER.into(),
            log_filter: "info".into(),
            seed_on_empty: true,
        }
    }
}

/// Defaults, then `reports.toml`, then environment variables.
///
/// Runs before logging is set up, so a settings file that fails to parse is
/// handed back for the caller to report once the subscriber exists.
pub fn load_settings() -> (Settings, Option<toml::de::Error>) {
    let mut settings = Settings::default();

    let file_error = fs::read_to_string(SETTINGS_FILE)
        .ok()
        .and_then(|raw| apply_file_config(&mut settings, &raw).err());
    apply_env(&mut settings, |key| std::env::var(key).ok());

    (settings, file_error)
}

/// Leaves `settings` untouched when `raw` is not valid TOML.
pub(crate) fn apply_file_config(
    settings: &mut Settings,
    raw: &str,
) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    let text = |key: &str| {
        file_cfg
            .get(key)
            .and_then(toml::Value::as_str)
            .map(str::to_string)
    };
    if let Some(v) = text("snapshot_path") {
        settings.snapshot_path = v.into();
    }
    if let Some(v) = text("default_engineer") {
        settings.default_engineer = v;
    }
    if let Some(v) = text("default_author") {
        settings.default_author = v;
    }
    if let Some(v) = text("log_filter") {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.get("seed_on_empty").and_then(toml::Value::as_bool) {
        settings.seed_on_empty = v;
    }
    Ok(())
}

/// Later keys win over earlier ones for the same setting.
pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    for key in ["SNAPSHOT_PATH", "APP__SNAPSHOT_PATH"] {
        if let Some(v) = non_empty(key) {
            settings.snapshot_path = v.into();
        }
    }
    for key in ["DEFAULT_ENGINEER", "APP__DEFAULT_ENGINEER"] {
        if let Some(v) = non_empty(key) {
            settings.default_engineer = v;
        }
    }
    for key in ["DEFAULT_AUTHOR", "APP__DEFAULT_AUTHOR"] {
        if let Some(v) = non_empty(key) {
            settings.default_author = v;
        }
    }
    for key in ["RUST_LOG", "APP__LOG_FILTER"] {
        if let Some(v) = non_empty(key) {
            settings.log_filter = v;
        }
    }
    if let Some(v) = non_empty("APP__SEED_ON_EMPTY") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.seed_on_empty = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
