//! Module federation registry.
//!
//! Every pluggable app ships a YAML manifest. The built-in manifests are
//! embedded at compile time (see [`builtin`]); a development tree can also
//! be scanned with [`discover_sources`]. [`ModuleRegistry::load`] aggregates
//! them once at startup into:
//!
//! - an ordered module list (configured category order, then name),
//! - the client route table (path → module/component),
//! - the sidebar navigation, grouped by category.
//!
//! Malformed manifests are skipped with a warning. Duplicate module names and
//! duplicate client routes abort the load.

pub mod builtin;
pub mod manifest;
pub mod scaffold;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use manifest::{validate_module_name, ModuleManifest};

/// Category order used when none is configured.
pub const DEFAULT_CATEGORY_ORDER: &[&str] = &["Productivity", "Lifestyle", "Information", "System"];

const MANIFEST_FILENAME: &str = "manifest.yaml";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate module name \"{name}\" (declared by {first} and {second})")]
    DuplicateModule {
        name: String,
        first: String,
        second: String,
    },

    #[error("Duplicate client route \"{path}\" (declared by modules {first} and {second})")]
    DuplicateRoute {
        path: String,
        first: String,
        second: String,
    },
}

/// Raw manifest text plus where it came from (used in diagnostics).
#[derive(Debug, Clone)]
pub struct ManifestSource {
    pub origin: String,
    pub contents: String,
}

impl ManifestSource {
    pub fn new(origin: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientRoute {
    pub path: String,
    pub module: String,
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub name: String,
    pub title: String,
    pub icon: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCategory {
    pub category: String,
    pub items: Vec<NavigationItem>,
}

/// Immutable aggregate of all loaded manifests.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleManifest>,
    category_order: Vec<String>,
    routes: BTreeMap<String, ClientRoute>,
}

impl ModuleRegistry {
    /// Parse, validate and aggregate manifests.
    pub fn load<I, S>(sources: I, category_order: &[S]) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = ManifestSource>,
        S: AsRef<str>,
    {
        let mut by_name: HashMap<String, String> = HashMap::new();
        let mut modules = Vec::new();

        for source in sources {
            let manifest = match serde_yaml::from_str::<ModuleManifest>(&source.contents) {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::warn!(origin = %source.origin, error = %e, "skipping malformed module manifest");
                    continue;
                }
            };
            if let Err(reason) = manifest.validate() {
                tracing::warn!(origin = %source.origin, %reason, "skipping invalid module manifest");
                continue;
            }
            if let Some(first) = by_name.get(&manifest.name) {
                return Err(RegistryError::DuplicateModule {
                    name: manifest.name.clone(),
                    first: first.clone(),
                    second: source.origin,
                });
            }
            by_name.insert(manifest.name.clone(), source.origin);
            modules.push(manifest);
        }

        let mut routes: BTreeMap<String, ClientRoute> = BTreeMap::new();
        for manifest in &modules {
            for (path, component) in &manifest.routes {
                if let Some(existing) = routes.get(path) {
                    return Err(RegistryError::DuplicateRoute {
                        path: path.clone(),
                        first: existing.module.clone(),
                        second: manifest.name.clone(),
                    });
                }
                routes.insert(
                    path.clone(),
                    ClientRoute {
                        path: path.clone(),
                        module: manifest.name.clone(),
                        component: component.clone(),
                    },
                );
            }
        }

        let category_order: Vec<String> = category_order.iter().map(|c| c.as_ref().to_string()).collect();
        modules.sort_by(|a, b| {
            category_rank(&category_order, &a.category)
                .cmp(&category_rank(&category_order, &b.category))
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::info!("Loaded {} module manifests", modules.len());
        Ok(Self {
            modules,
            category_order,
            routes,
        })
    }

    /// Registry over the manifests compiled into the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::load(builtin::sources(), DEFAULT_CATEGORY_ORDER)
    }

    pub fn modules(&self) -> &[ModuleManifest] {
        &self.modules
    }

    pub fn get(&self, name: &str) -> Option<&ModuleManifest> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn category_order(&self) -> &[String] {
        &self.category_order
    }

    /// Client route table for the router.
    pub fn route_table(&self) -> &BTreeMap<String, ClientRoute> {
        &self.routes
    }

    /// Whether a module is enabled given the persisted toggle flags.
    /// Non-togglable modules are always on; togglable ones default to on.
    pub fn is_enabled(manifest: &ModuleManifest, flags: &HashMap<String, bool>) -> bool {
        !manifest.togglable || flags.get(&manifest.name).copied().unwrap_or(true)
    }

    /// Sidebar tree grouped by category, in configured category order.
    /// Categories not in the order list follow, alphabetically.
    pub fn navigation(&self, flags: &HashMap<String, bool>) -> Vec<NavigationCategory> {
        let mut out: Vec<NavigationCategory> = Vec::new();
        for manifest in &self.modules {
            if !Self::is_enabled(manifest, flags) {
                continue;
            }
            let item = NavigationItem {
                name: manifest.name.clone(),
                title: manifest.title().to_string(),
                icon: manifest.icon.clone(),
                path: manifest.entry_path(),
            };
            // Modules are already sorted by category rank, so a category's
            // items are contiguous.
            match out.last_mut() {
                Some(group) if group.category == manifest.category => group.items.push(item),
                _ => out.push(NavigationCategory {
                    category: manifest.category.clone(),
                    items: vec![item],
                }),
            }
        }
        out
    }
}

/// Rank for sorting: configured categories by position, others after them
/// in alphabetical order.
fn category_rank<'a>(order: &[String], category: &'a str) -> (usize, &'a str) {
    match order.iter().position(|c| c == category) {
        Some(idx) => (idx, ""),
        None => (order.len(), category),
    }
}

/// Read `<dir>/*/manifest.yaml`. Unreadable files are skipped with a warning.
pub fn discover_sources(dir: &Path) -> Vec<ManifestSource> {
    // `dir` is literal; only the module directory level is a wildcard.
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped)
        .join("*")
        .join(MANIFEST_FILENAME)
        .to_string_lossy()
        .to_string();

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(%pattern, error = %e, "invalid manifest glob pattern");
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    for entry in paths.flatten() {
        match std::fs::read_to_string(&entry) {
            Ok(contents) => sources.push(ManifestSource::new(entry.to_string_lossy(), contents)),
            Err(e) => {
                tracing::warn!(path = %entry.display(), error = %e, "failed to read module manifest")
            }
        }
    }
    sources
}
