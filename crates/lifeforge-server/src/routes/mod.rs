//! App module routers.
//!
//! Each module contributes one [`Router`]; [`app_router`] composes them into
//! the application tree. Top-level keys become the first path segment
//! (`locations.search` → `/api/locations/search`).

pub mod api_keys;
pub mod locations;
pub mod modules;

use lifeforge_core::rpc::{Router, RouterError};

pub fn app_router() -> Result<Router, RouterError> {
    Router::compose([
        ("locations", locations::router()?),
        ("modules", modules::router()?),
        ("apiKeys", api_keys::router()?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_tree_contains_every_module() {
        let router = app_router().unwrap();
        let expected = locations::router().unwrap().route_count()
            + modules::router().unwrap().route_count()
            + api_keys::router().unwrap().route_count();
        assert_eq!(router.route_count(), expected);

        let table = router.into_table();
        for path in [
            "locations.search",
            "modules.list",
            "modules.toggle",
            "modules.navigation",
            "apiKeys.list",
            "apiKeys.set",
            "apiKeys.delete",
        ] {
            assert!(table.contains(path), "missing {}", path);
        }
    }
}
