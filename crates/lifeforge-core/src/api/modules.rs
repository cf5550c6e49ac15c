use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modules::{ModuleManifest, NavigationCategory};
use crate::rpc::{Empty, Endpoint, Input, RouteKind};

/// A manifest plus its current enable flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub name: String,
    pub title: String,
    pub icon: String,
    pub category: String,
    pub togglable: bool,
    pub enabled: bool,
    pub routes: BTreeMap<String, String>,
}

impl ModuleSummary {
    pub fn new(manifest: &ModuleManifest, enabled: bool) -> Self {
        Self {
            name: manifest.name.clone(),
            title: manifest.title().to_string(),
            icon: manifest.icon.clone(),
            category: manifest.category.clone(),
            togglable: manifest.togglable,
            enabled,
            routes: manifest.routes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToggleParams {
    pub name: String,
    /// Target state; flips the current one when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Input for ToggleParams {
    fn validate(&self) -> Result<(), String> {
        crate::modules::validate_module_name(&self.name)
    }
}

/// `modules.list`
pub struct List;

impl Endpoint for List {
    const PATH: &'static str = "modules.list";
    const KIND: RouteKind = RouteKind::Query;
    type Input = Empty;
    type Output = Vec<ModuleSummary>;
}

/// `modules.toggle`
pub struct Toggle;

impl Endpoint for Toggle {
    const PATH: &'static str = "modules.toggle";
    const KIND: RouteKind = RouteKind::Mutation;
    type Input = ToggleParams;
    type Output = ModuleSummary;
}

/// `modules.navigation`
pub struct Navigation;

impl Endpoint for Navigation {
    const PATH: &'static str = "modules.navigation";
    const KIND: RouteKind = RouteKind::Query;
    type Input = Empty;
    type Output = Vec<NavigationCategory>;
}
