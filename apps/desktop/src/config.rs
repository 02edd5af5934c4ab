use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "desktop.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub outbound_queue_capacity: usize,
    pub render: bool,
    pub input_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            outbound_queue_capacity: 256,
            render: true,
            input_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    log_filter: Option<String>,
    outbound_queue_capacity: Option<usize>,
    render: Option<bool>,
    input_path: Option<PathBuf>,
}

/// Defaults, then the config file, then `APP__*` environment overrides.
///
/// A missing default file is fine; a missing file that was asked for by path
/// is an error.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_file_settings(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            settings.merge_file(file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && config_path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

fn parse_file_settings(raw: &str) -> anyhow::Result<FileSettings> {
    Ok(toml::from_str::<FileSettings>(raw)?)
}

fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    } else if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__OUTBOUND_QUEUE_CAPACITY") {
        settings.outbound_queue_capacity = v
            .parse()
            .with_context(|| format!("APP__OUTBOUND_QUEUE_CAPACITY is not a number: '{v}'"))?;
    }

    if let Some(v) = lookup("APP__RENDER") {
        settings.render = parse_flag(&v)
            .with_context(|| format!("APP__RENDER is not a boolean: '{v}'"))?;
    }

    if let Some(v) = lookup("APP__INPUT_PATH") {
        settings.input_path = Some(PathBuf::from(v));
    }

    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    fn merge_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        if let Some(v) = file_cfg.outbound_queue_capacity {
            self.outbound_queue_capacity = v;
        }
        if let Some(v) = file_cfg.render {
            self.render = v;
        }
        if let Some(v) = file_cfg.input_path {
            self.input_path = Some(v);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.outbound_queue_capacity > 0,
            "outbound_queue_capacity must be at least 1"
        );
        ensure!(!self.log_filter.trim().is_empty(), "log_filter must not be empty");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
