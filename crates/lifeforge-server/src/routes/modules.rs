//! `modules`: installed apps, their enable flags and the sidebar tree.

use lifeforge_core::api::modules::{List, ModuleSummary, Navigation, Toggle, ToggleParams};
use lifeforge_core::modules::NavigationCategory;
use lifeforge_core::rpc::{Empty, RequestContext, Route, Router, RouterError};
use lifeforge_core::{ModuleRegistry, ServerError};

pub fn router() -> Result<Router, RouterError> {
    Router::new()
        .route(
            "list",
            Route::endpoint::<List>("List installed modules with their enable flag").callback(list),
        )?
        .route(
            "toggle",
            Route::endpoint::<Toggle>("Enable or disable a togglable module").callback(toggle),
        )?
        .route(
            "navigation",
            Route::endpoint::<Navigation>("Sidebar entries grouped by category")
                .callback(navigation),
        )
}

async fn list(ctx: RequestContext, _input: Empty) -> Result<Vec<ModuleSummary>, ServerError> {
    let flags = ctx.state().settings_store.module_flags().await?;
    Ok(ctx
        .state()
        .modules
        .modules()
        .iter()
        .map(|m| ModuleSummary::new(m, ModuleRegistry::is_enabled(m, &flags)))
        .collect())
}

async fn toggle(ctx: RequestContext, params: ToggleParams) -> Result<ModuleSummary, ServerError> {
    let state = ctx.state();
    let manifest = state
        .modules
        .get(&params.name)
        .ok_or_else(|| ServerError::NotFound(format!("Module not found: {}", params.name)))?;
    if !manifest.togglable {
        return Err(ServerError::BadRequest(format!(
            "Module {} cannot be toggled",
            manifest.name
        )));
    }

    let current = state
        .settings_store
        .module_enabled(&manifest.name)
        .await?
        .unwrap_or(true);
    let enabled = params.enabled.unwrap_or(!current);
    state
        .settings_store
        .set_module_enabled(&manifest.name, enabled)
        .await?;

    tracing::info!(module = %manifest.name, enabled, "module toggled");
    Ok(ModuleSummary::new(manifest, enabled))
}

async fn navigation(
    ctx: RequestContext,
    _input: Empty,
) -> Result<Vec<NavigationCategory>, ServerError> {
    let flags = ctx.state().settings_store.module_flags().await?;
    Ok(ctx.state().modules.navigation(&flags))
}
