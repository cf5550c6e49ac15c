//! `forge modules`: scaffold and inspect app modules.

use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{Input, Select};
use lifeforge_core::modules::scaffold::{init_git, scaffold_module, ScaffoldRequest};
use lifeforge_core::modules::{builtin, discover_sources, ModuleRegistry, DEFAULT_CATEGORY_ORDER};

/// `forge modules create`. Missing name or category are prompted for.
pub fn create(
    name: Option<String>,
    category: Option<String>,
    dir: &Path,
    git: bool,
) -> Result<(), String> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Module name (kebab-case)")
            .interact_text()
            .map_err(|e| format!("Prompt cancelled: {}", e))?,
    };
    let category = match category {
        Some(category) => category,
        None => {
            let idx = Select::new()
                .with_prompt("Category")
                .items(DEFAULT_CATEGORY_ORDER)
                .default(0)
                .interact()
                .map_err(|e| format!("Prompt cancelled: {}", e))?;
            DEFAULT_CATEGORY_ORDER[idx].to_string()
        }
    };

    let root = create_module(dir, &ScaffoldRequest::new(name, category), git)?;
    println!("{} Created {}", style("✓").green(), root.display());
    Ok(())
}

/// Write the scaffold and optionally `git init` it. Returns the module root.
pub fn create_module(dir: &Path, req: &ScaffoldRequest, git: bool) -> Result<PathBuf, String> {
    let files = scaffold_module(dir, req).map_err(|e| e.to_string())?;
    let root = dir.join(&req.name);
    for file in &files {
        println!("  {}", file.display());
    }

    if git {
        init_git(&root).map_err(|e| e.to_string())?;
        tracing::info!(module = %req.name, "initialized git repository");
    }
    Ok(root)
}

/// `forge modules list`. Built-in manifests plus any under `dir`.
pub fn list(dir: Option<&Path>) -> Result<(), String> {
    let registry = load_registry(dir)?;
    if registry.is_empty() {
        println!("No modules found.");
        return Ok(());
    }

    println!("{:<16} {:<14} {:<10} ROUTES", "NAME", "CATEGORY", "TOGGLABLE");
    for manifest in registry.modules() {
        let routes: Vec<&str> = manifest.routes.keys().map(|r| r.as_str()).collect();
        println!(
            "{:<16} {:<14} {:<10} {}",
            manifest.name,
            manifest.category,
            if manifest.togglable { "yes" } else { "no" },
            routes.join(", ")
        );
    }
    Ok(())
}

pub fn load_registry(dir: Option<&Path>) -> Result<ModuleRegistry, String> {
    let mut sources = builtin::sources();
    if let Some(dir) = dir {
        sources.extend(discover_sources(dir));
    }
    ModuleRegistry::load(sources, DEFAULT_CATEGORY_ORDER).map_err(|e| e.to_string())
}
