//! `apiKeys`: upstream credentials used by other modules.
//!
//! Listing is open but masks key material; writes require the master key.

use chrono::Utc;
use lifeforge_core::api::api_keys::{Delete, DeleteParams, DeleteResult, List, Set, SetParams};
use lifeforge_core::models::ApiKeyEntry;
use lifeforge_core::rpc::{Empty, RequestContext, Route, Router, RouterError};
use lifeforge_core::ServerError;

pub fn router() -> Result<Router, RouterError> {
    Router::new()
        .route(
            "list",
            Route::endpoint::<List>("List stored API keys (masked)").callback(list),
        )?
        .route(
            "set",
            Route::endpoint::<Set>("Create or replace an API key")
                .protected()
                .callback(set),
        )?
        .route(
            "delete",
            Route::endpoint::<Delete>("Remove an API key")
                .protected()
                .callback(delete),
        )
}

async fn list(ctx: RequestContext, _input: Empty) -> Result<Vec<ApiKeyEntry>, ServerError> {
    let entries = ctx.state().api_key_store.list().await?;
    Ok(entries.iter().map(ApiKeyEntry::masked).collect())
}

async fn set(ctx: RequestContext, params: SetParams) -> Result<ApiKeyEntry, ServerError> {
    let store = &ctx.state().api_key_store;
    let existing = store.get(&params.id).await?;
    let entry = match existing {
        Some(mut existing) => {
            existing.name = params.name;
            existing.key = params.key;
            existing.updated_at = Utc::now();
            existing
        }
        None => ApiKeyEntry::new(params.id, params.name, params.key),
    };
    store.save(&entry).await?;

    tracing::info!(id = %entry.id, "api key stored");
    Ok(entry.masked())
}

async fn delete(ctx: RequestContext, params: DeleteParams) -> Result<DeleteResult, ServerError> {
    let deleted = ctx.state().api_key_store.delete(&params.id).await?;
    Ok(DeleteResult {
        id: params.id,
        deleted,
    })
}
