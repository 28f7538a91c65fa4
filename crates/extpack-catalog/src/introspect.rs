// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata introspection of compiled artifacts.
//!
//! The introspector knows nothing about how an artifact is executed; it asks
//! an [`ArtifactLoader`] for a constructed instance and reads its contract
//! fields. [`NodeLoader`] is the production loader: it imports the artifact
//! in a Node.js subprocess and prints the fields as JSON.

use std::path::Path;

use async_trait::async_trait;
use extpack_core::{ArtifactLoader, ExtensionMetadata, ExtpackError, MetadataSource};
use tokio::process::Command;
use tracing::{debug, warn};
use url::Url;

/// Inline ES module run by the runtime. `process.argv[1]` is the artifact URL.
const DESCRIBE_SCRIPT: &str = r#"
const mod = await import(process.argv[1]);
const Extension = mod.default;
const ext = new Extension();
const { id, name, url, version, icon, languages, nsfw } = ext;
process.stdout.write(JSON.stringify({ id, name, url, version, icon, languages, nsfw }));
"#;

/// Recovers [`ExtensionMetadata`] from compiled artifacts.
pub struct Introspector<L> {
    loader: L,
}

impl<L: ArtifactLoader> Introspector<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load `artifact`, construct its default export and read its metadata.
    ///
    /// Every failure is reported as [`ExtpackError::Introspection`].
    pub async fn introspect(&self, artifact: &Path) -> Result<ExtensionMetadata, ExtpackError> {
        let label = artifact_label(artifact);
        let source = self
            .loader
            .load(artifact)
            .await
            .map_err(|e| as_introspection(&label, e))?;
        let metadata = source.describe().map_err(|e| as_introspection(&label, e))?;

        if let Err(e) = metadata.parsed_version() {
            warn!(
                artifact = %label,
                version = %metadata.version,
                error = %e,
                "extension version is not valid semver"
            );
        }
        debug!(artifact = %label, id = metadata.id, source_name = %metadata.name, "introspected artifact");
        Ok(metadata)
    }
}

fn artifact_label(artifact: &Path) -> String {
    artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| artifact.display().to_string())
}

fn as_introspection(label: &str, err: ExtpackError) -> ExtpackError {
    match err {
        ExtpackError::Introspection { .. } => err,
        other => ExtpackError::Introspection {
            artifact: label.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Absolute `file://` URL for an artifact path.
pub fn artifact_url(artifact: &Path) -> Result<Url, ExtpackError> {
    let label = artifact_label(artifact);
    let absolute = std::path::absolute(artifact).map_err(|e| ExtpackError::Introspection {
        artifact: label.clone(),
        reason: format!("cannot resolve path: {e}"),
    })?;
    Url::from_file_path(&absolute).map_err(|()| ExtpackError::Introspection {
        artifact: label,
        reason: format!("{} cannot be expressed as a file URL", absolute.display()),
    })
}

/// Loads artifacts by importing them in a Node.js subprocess.
#[derive(Debug, Clone)]
pub struct NodeLoader {
    program: String,
}

impl NodeLoader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NodeLoader {
    fn default() -> Self {
        Self::new("node")
    }
}

#[async_trait]
impl ArtifactLoader for NodeLoader {
    async fn load(&self, artifact: &Path) -> Result<Box<dyn MetadataSource>, ExtpackError> {
        let label = artifact_label(artifact);
        let url = artifact_url(artifact)?;

        let output = Command::new(&self.program)
            .arg("--input-type=module")
            .arg("-e")
            .arg(DESCRIBE_SCRIPT)
            .arg(url.as_str())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtpackError::Introspection {
                artifact: label.clone(),
                reason: format!("failed to run {}: {e}", self.program),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", self.program, output.status),
                text => text.to_string(),
            };
            return Err(ExtpackError::Introspection {
                artifact: label,
                reason,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Box::new(JsonMetadataSource::parse(&label, &stdout)?))
    }
}

/// Metadata printed by the runtime, decoded on [`MetadataSource::describe`].
#[derive(Debug, Clone)]
pub struct JsonMetadataSource {
    artifact: String,
    raw: serde_json::Value,
}

impl JsonMetadataSource {
    pub fn parse(artifact: &str, text: &str) -> Result<Self, ExtpackError> {
        let raw = serde_json::from_str(text.trim()).map_err(|e| ExtpackError::Introspection {
            artifact: artifact.to_string(),
            reason: format!("runtime printed invalid JSON: {e}"),
        })?;
        Ok(Self {
            artifact: artifact.to_string(),
            raw,
        })
    }
}

impl MetadataSource for JsonMetadataSource {
    fn describe(&self) -> Result<ExtensionMetadata, ExtpackError> {
        serde_json::from_value(self.raw.clone()).map_err(|e| ExtpackError::Introspection {
            artifact: self.artifact.clone(),
            reason: format!("extension does not declare the source contract: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extpack_core::Languages;
    use extpack_test_utils::{fixtures, StaticLoader};

    #[test]
    fn json_source_decodes_contract_fields() {
        let text = r#"{"id":3,"name":"MangaDex","url":"https://mangadex.org","version":"0.2.1","icon":"https://mangadex.org/favicon.ico","languages":"all","nsfw":false}"#;
        let source = JsonMetadataSource::parse("mangadex.mjs", text).unwrap();
        let meta = source.describe().unwrap();
        assert_eq!(meta.id, 3);
        assert_eq!(meta.languages, Languages::All);
    }

    #[test]
    fn missing_field_is_introspection_error() {
        let text = r#"{"id":3,"name":"MangaDex","url":"u","version":"1.0.0","icon":"i","nsfw":false}"#;
        let source = JsonMetadataSource::parse("mangadex.mjs", text).unwrap();
        let err = source.describe().unwrap_err();
        match err {
            ExtpackError::Introspection { artifact, reason } => {
                assert_eq!(artifact, "mangadex.mjs");
                assert!(reason.contains("languages"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_output_is_introspection_error() {
        let err = JsonMetadataSource::parse("x.mjs", "TypeError: not a constructor").unwrap_err();
        assert!(matches!(err, ExtpackError::Introspection { .. }));
    }

    #[test]
    fn artifact_url_is_absolute_file_url() {
        let tmp = tempfile::tempdir().unwrap();
        let url = artifact_url(&tmp.path().join("dist").join("a b.mjs")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.as_str().ends_with("/dist/a%20b.mjs"), "url: {url}");
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = artifact_url(Path::new("dist/a.mjs")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.to_file_path().unwrap().is_absolute());
    }

    #[tokio::test]
    async fn introspector_uses_loader() {
        let loader = StaticLoader::new().with("a.mjs", fixtures::metadata(5, "Alpha"));
        let introspector = Introspector::new(loader);
        let meta = introspector.introspect(Path::new("/dist/a.mjs")).await.unwrap();
        assert_eq!(meta.name, "Alpha");
    }

    #[tokio::test]
    async fn loader_failures_become_introspection_errors() {
        let introspector = Introspector::new(StaticLoader::new());
        let err = introspector
            .introspect(Path::new("/dist/unknown.mjs"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtpackError::Introspection { ref artifact, .. } if artifact == "unknown.mjs"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn invalid_semver_only_warns() {
        let mut meta = fixtures::metadata(9, "Loose");
        meta.version = "v2".to_string();
        let introspector = Introspector::new(StaticLoader::new().with("loose.mjs", meta));
        let meta = introspector
            .introspect(Path::new("/dist/loose.mjs"))
            .await
            .unwrap();
        assert_eq!(meta.version, "v2");
        assert!(logs_contain("not valid semver"));
    }

    #[tokio::test]
    async fn missing_runtime_is_introspection_error() {
        let loader = NodeLoader::new("extpack-no-such-runtime");
        let err = loader.load(Path::new("dist/a.mjs")).await.err().unwrap();
        assert!(matches!(err, ExtpackError::Introspection { ref reason, .. } if reason.contains("extpack-no-such-runtime")));
    }

    /// Stand-in runtime: checks the argv shape, then answers by artifact name.
    #[cfg(unix)]
    fn stub_runtime(dir: &Path) -> NodeLoader {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-node");
        std::fs::write(
            &script,
            r#"#!/bin/sh
[ "$#" -eq 4 ] && [ "$1" = "--input-type=module" ] && [ "$2" = "-e" ] || { echo "bad argv: $*" >&2; exit 2; }
case "$3" in *'process.argv[1]'*) ;; *) echo "script ignores argv[1]" >&2; exit 2;; esac
url="$4"
case "$url" in file:///*) ;; *) echo "not a file url: $url" >&2; exit 2;; esac
case "$url" in
  *throws.mjs) echo "Error: boom" >&2; exit 1;;
  *silent.mjs) exit 3;;
  *missing.mjs) printf '{"id":1,"url":"u","version":"1.0.0","icon":"i","languages":"all","nsfw":false}';;
  *) printf '{"id":7,"name":"%s","url":"https://x.example","version":"1.0.0","icon":"i","languages":["en","id"],"nsfw":true}' "${url##*/}";;
esac
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        NodeLoader::new(script.display().to_string())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runtime_stdout_is_decoded() {
        let tmp = tempfile::tempdir().unwrap();
        let introspector = Introspector::new(stub_runtime(tmp.path()));

        let meta = introspector
            .introspect(&tmp.path().join("dist").join("ok.mjs"))
            .await
            .unwrap();

        assert_eq!(meta.id, 7);
        assert_eq!(meta.name, "ok.mjs");
        assert_eq!(meta.languages, Languages::Multi(vec!["en".into(), "id".into()]));
        assert!(meta.nsfw);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runtime_stderr_becomes_reason() {
        let tmp = tempfile::tempdir().unwrap();
        let introspector = Introspector::new(stub_runtime(tmp.path()));

        let err = introspector
            .introspect(&tmp.path().join("throws.mjs"))
            .await
            .unwrap_err();
        match err {
            ExtpackError::Introspection { artifact, reason } => {
                assert_eq!(artifact, "throws.mjs");
                assert_eq!(reason, "Error: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_runtime_failure_reports_exit_status() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = stub_runtime(tmp.path());

        let err = loader.load(&tmp.path().join("silent.mjs")).await.err().unwrap();
        assert!(matches!(err, ExtpackError::Introspection { ref reason, .. } if reason.contains("fake-node exited with")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runtime_missing_field_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let introspector = Introspector::new(stub_runtime(tmp.path()));

        let err = introspector
            .introspect(&tmp.path().join("missing.mjs"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtpackError::Introspection { ref reason, .. } if reason.contains("missing field `name`")));
    }

    /// Imports a real module with the real runtime; skipped without `node`.
    #[tokio::test]
    async fn node_reads_default_export_when_installed() {
        let has_node = std::process::Command::new("node")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success());
        if !has_node {
            return;
        }

        let tmp = tempfile::tempdir().unwrap();
        let artifact = tmp.path().join("real.mjs");
        std::fs::write(
            &artifact,
            r#"export default class {
  constructor() {
    this.id = 11;
    this.name = "Real";
    this.url = "https://real.example";
    this.version = "2.0.0";
    this.icon = "https://real.example/icon.png";
    this.languages = "en";
    this.nsfw = false;
  }
}
"#,
        )
        .unwrap();

        let meta = Introspector::new(NodeLoader::default())
            .introspect(&artifact)
            .await
            .unwrap();
        assert_eq!(meta.id, 11);
        assert_eq!(meta.languages, Languages::Single("en".into()));
    }
}
