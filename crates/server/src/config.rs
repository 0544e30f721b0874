use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use timetable::SourceKind;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub timetable_source: SourceKind,
    pub scheduler_seed: Option<u64>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            timetable_source: SourceKind::Sample,
            scheduler_seed: None,
            catalog_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    timetable_source: Option<String>,
    scheduler_seed: Option<u64>,
    catalog_path: Option<PathBuf>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file when it exists, then environment
/// variables.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.timetable_source {
            settings.timetable_source = v.parse()?;
        }
        if let Some(v) = file_cfg.scheduler_seed {
            settings.scheduler_seed = Some(v);
        }
        if let Some(v) = file_cfg.catalog_path {
            settings.catalog_path = Some(v);
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__TIMETABLE_SOURCE") {
        settings.timetable_source = v.parse()?;
    }

    if let Some(v) = env("APP__SCHEDULER_SEED") {
        let seed = v
            .parse::<u64>()
            .with_context(|| format!("APP__SCHEDULER_SEED must be an unsigned integer, got '{v}'"))?;
        settings.scheduler_seed = Some(seed);
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        let v = v.trim();
        settings.catalog_path = (!v.is_empty()).then(|| PathBuf::from(v));
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
