use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::completion::DEFAULT_COMPLETE_TIMEOUT;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "display.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub feed_path: String,
    pub complete_path: String,
    pub complete_timeout: Duration,
    pub log_filter: String,
    pub html_output: Option<PathBuf>,
    pub milk_colors: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            feed_path: "/newOrder".into(),
            complete_path: "/complete".into(),
            complete_timeout: DEFAULT_COMPLETE_TIMEOUT,
            log_filter: "info".into(),
            html_output: None,
            milk_colors: HashMap::new(),
        }
    }
}

/// Keys accepted in `display.toml`. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    feed_path: Option<String>,
    complete_path: Option<String>,
    complete_timeout_secs: Option<u64>,
    log_filter: Option<String>,
    html_output: Option<PathBuf>,
    #[serde(default)]
    milk_colors: HashMap<String, String>,
}

/// Defaults, then the config file, then `APP__*` environment overrides.
///
/// An explicitly requested config file must exist; the default one may be
/// absent.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = explicit_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit_path.is_none() => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.feed_path {
        settings.feed_path = v;
    }
    if let Some(v) = file_cfg.complete_path {
        settings.complete_path = v;
    }
    if let Some(v) = file_cfg.complete_timeout_secs {
        settings.complete_timeout = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if file_cfg.html_output.is_some() {
        settings.html_output = file_cfg.html_output;
    }
    settings.milk_colors.extend(file_cfg.milk_colors);
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ORDER_BOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__FEED_PATH") {
        settings.feed_path = v;
    }
    if let Some(v) = var("APP__COMPLETE_PATH") {
        settings.complete_path = v;
    }
    if let Some(v) = var("APP__COMPLETE_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.complete_timeout = Duration::from_secs(parsed);
        }
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__HTML_OUTPUT") {
        settings.html_output = Some(PathBuf::from(v));
    }
}
