//! `forge modules create`: module directory scaffolding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::manifest::{validate_module_name, ModuleManifest};

#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Invalid module name: {0}")]
    InvalidName(String),

    #[error("Category must not be empty")]
    EmptyCategory,

    #[error("Directory already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("git init failed: {0}")]
    Git(String),
}

#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub name: String,
    pub category: String,
    pub icon: String,
    pub togglable: bool,
}

impl ScaffoldRequest {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            icon: "tabler:box".to_string(),
            togglable: true,
        }
    }

    fn manifest(&self) -> ModuleManifest {
        let mut routes = BTreeMap::new();
        routes.insert(format!("/{}", self.name), to_pascal_case(&self.name));
        ModuleManifest {
            name: self.name.clone(),
            display_name: Some(to_title_case(&self.name)),
            icon: self.icon.clone(),
            category: self.category.trim().to_string(),
            togglable: self.togglable,
            routes,
        }
    }
}

/// Write the scaffold for `req` into `<base_dir>/<name>` and return the
/// created files (relative to the module root). Refuses to touch an existing
/// directory.
pub fn scaffold_module(base_dir: &Path, req: &ScaffoldRequest) -> Result<Vec<PathBuf>, ScaffoldError> {
    validate_module_name(&req.name).map_err(ScaffoldError::InvalidName)?;
    if req.category.trim().is_empty() {
        return Err(ScaffoldError::EmptyCategory);
    }

    let root = base_dir.join(&req.name);
    if root.exists() {
        return Err(ScaffoldError::AlreadyExists(root));
    }

    let files: Vec<(PathBuf, String)> = vec![
        (PathBuf::from("manifest.yaml"), serde_yaml::to_string(&req.manifest())?),
        (PathBuf::from("server").join("mod.rs"), server_template(&req.name)),
        (PathBuf::from("locales").join("en.json"), locale_template(&req.name)),
        (PathBuf::from("README.md"), format!("# {}\n", to_title_case(&req.name))),
        (PathBuf::from(".gitignore"), "/target\nnode_modules/\n".to_string()),
    ];

    for (relative, contents) in &files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
    }

    tracing::info!(module = %req.name, path = %root.display(), "module scaffold written");
    Ok(files.into_iter().map(|(relative, _)| relative).collect())
}

/// Run `git init` inside `dir`.
pub fn init_git(dir: &Path) -> Result<(), ScaffoldError> {
    let output = Command::new("git")
        .arg("init")
        .current_dir(dir)
        .output()
        .map_err(|e| ScaffoldError::Git(e.to_string()))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ScaffoldError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

fn server_template(name: &str) -> String {
    format!(
        r#"use lifeforge_core::error::ServerError;
use lifeforge_core::rpc::{{Empty, RequestContext, Route, Router, RouterError}};

async fn ping(_ctx: RequestContext, _input: Empty) -> Result<&'static str, ServerError> {{
    Ok("{name}")
}}

pub fn router() -> Result<Router, RouterError> {{
    Router::new().route(
        "ping",
        Route::query("Check that the {name} module is mounted")
            .input::<Empty>()
            .callback(ping),
    )
}}
"#
    )
}

fn locale_template(name: &str) -> String {
    let doc = serde_json::json!({ "title": to_title_case(name) });
    serde_json::to_string_pretty(&doc).unwrap_or_default() + "\n"
}

fn to_title_case(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_pascal_case(name: &str) -> String {
    name.split('-').map(capitalize).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
