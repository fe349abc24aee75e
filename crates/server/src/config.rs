use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::{domain::Post, protocol::PostsDocument};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub data_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3500".into(),
            data_file: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("DATA_FILE") {
        settings.data_file = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("APP__DATA_FILE") {
        settings.data_file = Some(PathBuf::from(v));
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("bind_addr") {
            settings.server_bind = v.clone();
        }
        if let Some(v) = file_cfg.get("data_file") {
            settings.data_file = Some(PathBuf::from(v));
        }
    }
}

/// Reads the seed collection. A missing file is an empty collection; its
/// parent directory is created so later writes succeed.
pub fn load_posts(path: &Path) -> anyhow::Result<Vec<Post>> {
    if !path.exists() {
        ensure_parent_dir_exists(path)?;
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file '{}'", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: PostsDocument = serde_json::from_str(&raw)
        .with_context(|| format!("data file '{}' is not a posts document", path.display()))?;
    Ok(document.posts)
}

fn ensure_parent_dir_exists(path: &Path) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for data file '{}'",
            parent.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
