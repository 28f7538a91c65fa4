// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog manifest assembly.
//!
//! The manifest is a compact JSON array of [`ExtensionMetadata`] written to
//! `<dir>/index.json`, ascending by `id`. Artifacts are scanned in file-name
//! order so that the same directory always yields the same bytes.

use std::path::{Path, PathBuf};

use extpack_core::{ArtifactLoader, ExtensionMetadata, ExtpackError};
use tracing::{info, warn};

use crate::introspect::Introspector;

/// File name of the catalog manifest.
pub const MANIFEST_FILE: &str = "index.json";

/// Outcome of one catalog assembly.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub manifest_path: PathBuf,
    /// Entries in manifest order.
    pub entries: Vec<ExtensionMetadata>,
    /// Artifact file names that could not be introspected.
    pub skipped: Vec<String>,
}

/// List artifact files in `dir` with the given extension, sorted by file name.
pub async fn scan_artifacts(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ExtpackError> {
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtpackError::DirectoryNotFound {
                path: dir.to_path_buf(),
            }
        } else {
            ExtpackError::Discovery {
                path: dir.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut artifacts = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ExtpackError::Discovery {
            path: dir.to_path_buf(),
            source: e,
        })?
    {
        let path = entry.path();
        let matches = path.extension().is_some_and(|ext| ext == extension);
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if matches && is_file {
            artifacts.push(path);
        }
    }

    artifacts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(artifacts)
}

/// Stable ascending sort by `id`.
pub fn sort_entries(entries: &mut [ExtensionMetadata]) {
    entries.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Serialize entries as the compact manifest array.
pub fn render_manifest(entries: &[ExtensionMetadata]) -> Result<String, ExtpackError> {
    serde_json::to_string(entries)
        .map_err(|e| ExtpackError::Internal(format!("failed to serialize manifest: {e}")))
}

/// Introspect every artifact in `dir` and write `<dir>/index.json`.
///
/// Artifacts that fail introspection are logged and left out. Whatever is in
/// the directory is cataloged, including artifacts from earlier builds.
pub async fn assemble_catalog<L: ArtifactLoader>(
    dir: &Path,
    extension: &str,
    introspector: &Introspector<L>,
) -> Result<Catalog, ExtpackError> {
    let artifacts = scan_artifacts(dir, extension).await?;

    let mut entries = Vec::with_capacity(artifacts.len());
    let mut skipped = Vec::new();
    for artifact in &artifacts {
        match introspector.introspect(artifact).await {
            Ok(metadata) => entries.push(metadata),
            Err(e) => {
                warn!(artifact = %artifact.display(), error = %e, "skipping artifact");
                skipped.push(
                    artifact
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                );
            }
        }
    }

    sort_entries(&mut entries);
    let manifest = render_manifest(&entries)?;

    let manifest_path = dir.join(MANIFEST_FILE);
    tokio::fs::write(&manifest_path, manifest)
        .await
        .map_err(|e| ExtpackError::ManifestWrite {
            path: manifest_path.clone(),
            source: e,
        })?;

    info!(
        manifest = %manifest_path.display(),
        entries = entries.len(),
        skipped = skipped.len(),
        "catalog written"
    );

    Ok(Catalog {
        manifest_path,
        entries,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use extpack_core::Languages;
    use extpack_test_utils::{fixtures, StaticLoader};
    use proptest::prelude::*;

    #[tokio::test]
    async fn scan_filters_by_extension_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["zeta.mjs", "alpha.mjs", "index.json", "notes.txt", "beta.mjs.map"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }
        std::fs::create_dir_all(tmp.path().join("dir.mjs")).unwrap();

        let found = scan_artifacts(tmp.path(), "mjs").await.unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.mjs", "zeta.mjs"]);
    }

    #[tokio::test]
    async fn scan_missing_dir_is_directory_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan_artifacts(&tmp.path().join("dist"), "mjs").await.unwrap_err();
        assert!(matches!(err, ExtpackError::DirectoryNotFound { .. }));
    }

    #[test]
    fn manifest_is_compact_with_exact_fields() {
        let mut meta = fixtures::metadata(1, "A");
        meta.languages = Languages::Multi(vec!["en".into(), "id".into()]);
        let json = render_manifest(&[meta]).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"A","url":"https://a.example","version":"1.0.0","icon":"https://a.example/icon.png","languages":["en","id"],"nsfw":false}]"#
        );
    }

    #[test]
    fn empty_manifest_is_empty_array() {
        assert_eq!(render_manifest(&[]).unwrap(), "[]");
    }

    #[tokio::test]
    async fn assembles_sorted_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fixtures::write_artifacts(tmp.path(), &["a", "b", "c"]);
        let loader = StaticLoader::new()
            .with("a.mjs", fixtures::metadata(30, "A"))
            .with("b.mjs", fixtures::metadata(10, "B"))
            .with("c.mjs", fixtures::metadata(20, "C"));

        let catalog = assemble_catalog(tmp.path(), "mjs", &Introspector::new(loader))
            .await
            .unwrap();

        let ids: Vec<i64> = catalog.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(catalog.manifest_path, tmp.path().join(MANIFEST_FILE));

        let written = std::fs::read_to_string(&catalog.manifest_path).unwrap();
        let parsed: Vec<ExtensionMetadata> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, catalog.entries);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failing_artifact_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fixtures::write_artifacts(tmp.path(), &["good", "broken"]);
        let loader = StaticLoader::new()
            .with("good.mjs", fixtures::metadata(1, "Good"))
            .failing("broken.mjs");

        let catalog = assemble_catalog(tmp.path(), "mjs", &Introspector::new(loader))
            .await
            .unwrap();

        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(catalog.skipped, vec!["broken.mjs"]);
        assert!(logs_contain("skipping artifact"));
    }

    #[tokio::test]
    async fn empty_dir_writes_empty_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = assemble_catalog(tmp.path(), "mjs", &Introspector::new(StaticLoader::new()))
            .await
            .unwrap();
        assert!(catalog.entries.is_empty());
        assert_eq!(std::fs::read_to_string(catalog.manifest_path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn reassembly_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        fixtures::write_artifacts(tmp.path(), &["x", "y", "z"]);
        let loader = StaticLoader::new()
            .with("x.mjs", fixtures::metadata(2, "X"))
            .with("y.mjs", fixtures::metadata(2, "Y"))
            .with("z.mjs", fixtures::metadata(1, "Z"));
        let introspector = Introspector::new(loader);

        let first = assemble_catalog(tmp.path(), "mjs", &introspector).await.unwrap();
        let first_bytes = std::fs::read(&first.manifest_path).unwrap();
        let second = assemble_catalog(tmp.path(), "mjs", &introspector).await.unwrap();
        let second_bytes = std::fs::read(&second.manifest_path).unwrap();
        assert_eq!(first_bytes, second_bytes);

        let names: Vec<_> = second.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "X", "Y"]);
    }

    fn entries_strategy() -> impl Strategy<Value = Vec<ExtensionMetadata>> {
        prop::collection::vec((-5i64..5, "[a-z]{1,6}"), 0..24).prop_map(|items| {
            items
                .into_iter()
                .map(|(id, name)| fixtures::metadata(id, &name))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn sorted_entries_ascend_by_id(mut entries in entries_strategy()) {
            sort_entries(&mut entries);
            prop_assert!(entries.windows(2).all(|w| w[0].id <= w[1].id));
        }

        #[test]
        fn sort_keeps_relative_order_of_equal_ids(entries in entries_strategy()) {
            let mut sorted = entries.clone();
            sort_entries(&mut sorted);

            for id in -5i64..5 {
                let before: Vec<&str> = entries.iter().filter(|e| e.id == id).map(|e| e.name.as_str()).collect();
                let after: Vec<&str> = sorted.iter().filter(|e| e.id == id).map(|e| e.name.as_str()).collect();
                prop_assert_eq!(before, after);
            }
        }

        #[test]
        fn sorting_is_idempotent(mut entries in entries_strategy()) {
            sort_entries(&mut entries);
            let once = render_manifest(&entries).unwrap();
            sort_entries(&mut entries);
            prop_assert_eq!(once, render_manifest(&entries).unwrap());
        }
    }
}
