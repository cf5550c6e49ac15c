//! `forge locales`: manage installed language packs.

use chrono::Utc;
use console::style;
use lifeforge_core::locales::{package_name, validate_lang, LocaleMeta, LocaleStore};
use lifeforge_core::registry::RegistryClient;

pub fn list(store: &LocaleStore) -> Result<(), String> {
    let installed = store.list().map_err(|e| e.to_string())?;
    if installed.is_empty() {
        println!("No language packs installed in {}", store.dir().display());
        return Ok(());
    }
    for meta in installed {
        println!(
            "{:<8} {:<28} {:<10} {}",
            meta.lang,
            meta.package,
            meta.version,
            meta.display_name.unwrap_or_default()
        );
    }
    Ok(())
}

/// Resolve the pack's latest version from the registry and record it.
pub async fn install(
    registry: &RegistryClient,
    store: &LocaleStore,
    lang: &str,
) -> Result<LocaleMeta, String> {
    validate_lang(lang).map_err(|e| e.to_string())?;

    let package = package_name(lang);
    let info = registry
        .package_info(&package)
        .await
        .map_err(|e| e.to_string())?;
    let version = info
        .latest_version()
        .ok_or_else(|| format!("{} has no published version", package))?
        .to_string();

    let meta = LocaleMeta {
        lang: lang.to_string(),
        package,
        version,
        display_name: info.description.clone(),
        installed_at: Utc::now(),
    };
    store.install(&meta).map_err(|e| e.to_string())?;

    println!(
        "{} Installed {}@{}",
        style("✓").green(),
        meta.package,
        meta.version
    );
    Ok(meta)
}

pub fn uninstall(store: &LocaleStore, lang: &str) -> Result<(), String> {
    store.uninstall(lang).map_err(|e| e.to_string())?;
    println!("{} Removed {}", style("✓").green(), package_name(lang));
    Ok(())
}
