//! Installed language-pack metadata.
//!
//! Each installed pack is one JSON file, `<locales dir>/<lang>.json`. The
//! translation content itself is managed elsewhere; this store only tracks
//! which packs are present and at which version.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default directory for locale metadata, relative to the working directory.
pub const DEFAULT_LOCALES_DIR: &str = "locales";

/// Registry package that ships the pack for `lang`.
pub fn package_name(lang: &str) -> String {
    format!("@lifeforge/lang-{}", lang)
}

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Invalid language code \"{0}\"")]
    InvalidLang(String),

    #[error("Language pack \"{0}\" is not installed")]
    NotInstalled(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed locale metadata: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleMeta {
    pub lang: String,
    pub package: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub installed_at: DateTime<Utc>,
}

/// Language tags like `en`, `ms`, `zh-CN`, `zh-Hant-TW`.
pub fn validate_lang(lang: &str) -> Result<(), LocaleError> {
    let mut parts = lang.split('-');
    let primary_ok = parts
        .next()
        .map(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_lowercase()))
        .unwrap_or(false);
    let rest_ok = parts.all(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()));
    if primary_ok && rest_ok {
        Ok(())
    } else {
        Err(LocaleError::InvalidLang(lang.to_string()))
    }
}

pub struct LocaleStore {
    dir: PathBuf,
}

impl LocaleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn meta_path(&self, lang: &str) -> PathBuf {
        self.dir.join(format!("{}.json", lang))
    }

    /// Installed packs, sorted by language code. Unreadable or malformed
    /// files are skipped with a warning.
    pub fn list(&self) -> Result<Vec<LocaleMeta>, LocaleError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(LocaleError::from)
                .and_then(|raw| serde_json::from_str::<LocaleMeta>(&raw).map_err(LocaleError::from));
            match parsed {
                Ok(meta) => out.push(meta),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping locale metadata"),
            }
        }
        out.sort_by(|a, b| a.lang.cmp(&b.lang));
        Ok(out)
    }

    pub fn get(&self, lang: &str) -> Result<Option<LocaleMeta>, LocaleError> {
        validate_lang(lang)?;
        let path = self.meta_path(lang);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write (or overwrite) the metadata file for `meta.lang`.
    pub fn install(&self, meta: &LocaleMeta) -> Result<PathBuf, LocaleError> {
        validate_lang(&meta.lang)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.meta_path(&meta.lang);
        std::fs::write(&path, serde_json::to_string_pretty(meta)? + "\n")?;
        tracing::info!(lang = %meta.lang, version = %meta.version, "locale pack installed");
        Ok(path)
    }

    pub fn uninstall(&self, lang: &str) -> Result<(), LocaleError> {
        validate_lang(lang)?;
        let path = self.meta_path(lang);
        if !path.is_file() {
            return Err(LocaleError::NotInstalled(lang.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }
}
