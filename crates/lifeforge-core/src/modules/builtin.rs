//! Manifests compiled into the binary.

use super::ManifestSource;

macro_rules! builtin_manifest {
    ($name:literal) => {
        (
            concat!("builtin:", $name),
            include_str!(concat!("../../manifests/", $name, ".yaml")),
        )
    };
}

const BUILTIN: &[(&str, &str)] = &[
    builtin_manifest!("blog"),
    builtin_manifest!("books-library"),
    builtin_manifest!("calendar"),
    builtin_manifest!("modules"),
    builtin_manifest!("movies"),
    builtin_manifest!("music"),
    builtin_manifest!("settings"),
];

pub fn sources() -> Vec<ManifestSource> {
    BUILTIN
        .iter()
        .map(|(origin, contents)| ManifestSource::new(*origin, *contents))
        .collect()
}
