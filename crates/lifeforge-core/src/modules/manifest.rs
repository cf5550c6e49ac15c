use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Static descriptor of one pluggable app.
///
/// ```yaml
/// name: blog
/// displayName: Blog
/// icon: tabler:article
/// category: Productivity
/// togglable: true
/// routes:
///   /blog: BlogEntries
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub icon: String,
    pub category: String,
    #[serde(default)]
    pub togglable: bool,
    /// Client route path → lazily loaded component name.
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl ModuleManifest {
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// First declared route, used as the sidebar link.
    pub fn entry_path(&self) -> String {
        self.routes
            .keys()
            .min_by_key(|p| p.len())
            .cloned()
            .unwrap_or_else(|| format!("/{}", self.name))
    }

    /// Check the fields serde cannot: naming and route shape.
    pub fn validate(&self) -> Result<(), String> {
        validate_module_name(&self.name)?;
        if self.icon.trim().is_empty() {
            return Err("icon must not be empty".into());
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".into());
        }
        for (path, component) in &self.routes {
            if !path.starts_with('/') {
                return Err(format!("route \"{}\" must start with '/'", path));
            }
            if component.trim().is_empty() {
                return Err(format!("route \"{}\" has no component", path));
            }
        }
        Ok(())
    }
}

/// Module names are kebab-case: lowercase ASCII letters, digits and single
/// dashes, starting with a letter.
pub fn validate_module_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("module name must not be empty".into());
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(format!("module name \"{}\" must start with a lowercase letter", name));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        || name.ends_with('-')
        || name.contains("--")
    {
        return Err(format!("module name \"{}\" must be kebab-case", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names() {
        assert!(validate_module_name("books-library").is_ok());
        assert!(validate_module_name("blog2").is_ok());
        for bad in ["", "Blog", "2blog", "blog-", "books--library", "books_library"] {
            assert!(validate_module_name(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn entry_path_prefers_the_shortest_route() {
        let manifest: ModuleManifest = serde_yaml::from_str(
            "name: blog\nicon: tabler:article\ncategory: Productivity\nroutes:\n  /blog/:id: Editor\n  /blog: Entries\n",
        )
        .unwrap();
        assert_eq!(manifest.entry_path(), "/blog");
        assert_eq!(manifest.title(), "blog");
        assert!(!manifest.togglable);
    }

    #[test]
    fn routes_must_be_absolute() {
        let manifest: ModuleManifest = serde_yaml::from_str(
            "name: blog\nicon: tabler:article\ncategory: Productivity\nroutes:\n  blog: Entries\n",
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }
}
