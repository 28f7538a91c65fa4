// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! esbuild adapter.
//!
//! The bundler runs as a subprocess. For on-disk output it writes into the
//! lease's staging directory and whatever it produced is then moved into the
//! destination [`OutputFs`]. For ephemeral output no `--outfile` is passed:
//! esbuild prints the bundle to stdout and it is written straight into the
//! destination, so nothing touches the disk. Failures are surfaced as [`ExtpackError::Compile`] with the
//! `[ERROR]` messages esbuild printed.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::LazyLock;
use std::time::Instant;

use async_trait::async_trait;
use extpack_core::{
    ArtifactDescriptor, BuildOutput, CompileOptions, CompileRequest, Compiler, ExtpackError,
};
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

static ERROR_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:✘[ \t]*)?\[ERROR\][ \t]*(.*?)[ \t\r]*$").unwrap());

static ERROR_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]+(\S[^\n]*?:\d+:\d+):[ \t\r]*$").unwrap());

/// Compiles build targets by shelling out to `esbuild`.
#[derive(Debug, Clone)]
pub struct EsbuildCompiler {
    program: String,
    extra_args: Vec<String>,
}

impl EsbuildCompiler {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for EsbuildCompiler {
    fn default() -> Self {
        Self::new("esbuild", Vec::new())
    }
}

/// Render compile options into esbuild's argv. Without `outfile` the bundle
/// goes to stdout.
pub fn esbuild_args(
    entry: &Path,
    options: &CompileOptions,
    outfile: Option<&Path>,
    extra_args: &[String],
) -> Vec<String> {
    let mut args = vec![
        entry.display().to_string(),
        "--bundle".to_string(),
        format!("--format={}", options.output_format),
        format!("--platform={}", options.context),
    ];
    if options.scope_hoist {
        args.push("--tree-shaking=true".to_string());
    }
    if let Some(outfile) = outfile {
        args.push(format!("--outfile={}", outfile.display()));
    }
    args.push("--log-level=error".to_string());
    if options.source_maps {
        args.push("--sourcemap".to_string());
    }
    if !options.include_node_modules {
        args.push("--packages=external".to_string());
    }
    args.extend(extra_args.iter().cloned());
    args
}

/// Extract one diagnostic per `[ERROR]` block, prefixed with its location
/// when esbuild printed one.
///
/// Falls back to the non-empty stderr lines, then to the exit status.
pub fn parse_diagnostics(stderr: &str, status: Option<ExitStatus>) -> Vec<String> {
    let headers: Vec<_> = ERROR_HEADER.captures_iter(stderr).collect();
    let mut diagnostics = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(message)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let block_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(stderr.len(), |m| m.start());
        let block = &stderr[whole.end()..block_end];

        match ERROR_LOCATION.captures(block).and_then(|c| c.get(1)) {
            Some(location) => diagnostics.push(format!("{}: {}", location.as_str(), message.as_str())),
            None => diagnostics.push(message.as_str().to_string()),
        }
    }

    if diagnostics.is_empty() {
        diagnostics = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    if diagnostics.is_empty() {
        diagnostics.push(match status {
            Some(status) => format!("bundler exited with {status}"),
            None => "bundler failed without output".to_string(),
        });
    }

    diagnostics
}

impl EsbuildCompiler {
    fn failure(&self, target: &str, diagnostics: Vec<String>) -> ExtpackError {
        ExtpackError::Compile {
            target: target.to_string(),
            diagnostics,
        }
    }

    /// Move every file the bundler left in `staging` into the output filesystem.
    async fn collect_staged(
        &self,
        request: &CompileRequest<'_>,
    ) -> Result<Vec<ArtifactDescriptor>, ExtpackError> {
        let mut staged: Vec<(String, PathBuf)> = Vec::new();
        let mut dir = tokio::fs::read_dir(request.staging).await.map_err(|e| {
            ExtpackError::io(format!("failed to read {}", request.staging.display()), e)
        })?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| ExtpackError::io("failed to list staged output", e))?
        {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file {
                staged.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
        }
        staged.sort();

        let mut artifacts = Vec::with_capacity(staged.len());
        for (name, path) in staged {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| ExtpackError::io(format!("failed to read {}", path.display()), e))?;
            let dest = request.options.dist_dir.join(&name);
            request.output.write(&dest, bytes).await?;
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "failed to clear staged file");
            }
            artifacts.push(ArtifactDescriptor { name, path: dest });
        }
        Ok(artifacts)
    }

    /// Write the bundle esbuild printed on stdout into the output filesystem.
    async fn collect_stdout(
        &self,
        request: &CompileRequest<'_>,
        stdout: Vec<u8>,
    ) -> Result<Vec<ArtifactDescriptor>, ExtpackError> {
        if stdout.is_empty() {
            return Ok(Vec::new());
        }
        let dest = request.options.output_path();
        request.output.write(&dest, stdout).await?;
        Ok(vec![ArtifactDescriptor {
            name: request.options.dist_entry.clone(),
            path: dest,
        }])
    }
}

#[async_trait]
impl Compiler for EsbuildCompiler {
    async fn compile(&self, request: CompileRequest<'_>) -> Result<BuildOutput, ExtpackError> {
        let target = &request.target.name;
        let started = Instant::now();
        let outfile = (!request.output.is_ephemeral())
            .then(|| request.staging.join(&request.options.dist_entry));
        let args = esbuild_args(
            &request.target.entry,
            request.options,
            outfile.as_deref(),
            &self.extra_args,
        );

        debug!(target_name = %target, program = %self.program, ?args, "invoking bundler");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                self.failure(target, vec![format!("failed to run {}: {e}", self.program)])
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(target, parse_diagnostics(&stderr, Some(output.status))));
        }

        let artifacts = match outfile {
            Some(_) => self.collect_staged(&request).await?,
            None => self.collect_stdout(&request, output.stdout).await?,
        };
        if artifacts.is_empty() {
            return Err(self.failure(target, vec!["bundler produced no output".to_string()]));
        }

        Ok(BuildOutput {
            artifacts,
            build_time: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extpack_core::{BuildTarget, OutputFs};

    use crate::outfs::{DiskFs, MemoryFs};

    #[cfg(unix)]
    fn fake_bundler(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join(name);
        std::fs::write(&script, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn options(dist: &Path) -> CompileOptions {
        let target = BuildTarget::new("src/a/index.ts", "a");
        CompileOptions::library(&target, dist, Path::new(".extpack-cache"))
    }

    #[test]
    fn default_args_for_library_build() {
        let opts = options(Path::new("dist"));
        let args = esbuild_args(
            Path::new("src/a/index.ts"),
            &opts,
            Some(Path::new("/stage/a.mjs")),
            &[],
        );
        assert_eq!(
            args,
            vec![
                "src/a/index.ts",
                "--bundle",
                "--format=esm",
                "--platform=node",
                "--tree-shaking=true",
                "--outfile=/stage/a.mjs",
                "--log-level=error",
            ]
        );
    }

    #[test]
    fn optional_flags_follow_options() {
        let mut opts = options(Path::new("dist"));
        opts.source_maps = true;
        opts.include_node_modules = false;
        let extra = vec!["--minify".to_string()];
        let args = esbuild_args(Path::new("e.ts"), &opts, Some(Path::new("o.mjs")), &extra);
        assert!(args.contains(&"--sourcemap".to_string()));
        assert!(args.contains(&"--packages=external".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--minify"));
    }

    #[test]
    fn stdout_build_has_no_outfile() {
        let opts = options(Path::new("dist"));
        let args = esbuild_args(Path::new("src/a/index.ts"), &opts, None, &[]);
        assert!(args.iter().all(|a| !a.starts_with("--outfile")));
        assert!(args.contains(&"--bundle".to_string()));
    }

    #[test]
    fn parses_error_blocks_with_locations() {
        let stderr = "\u{2718} [ERROR] Could not resolve \"missing-lib\"\n\n    src/a/index.ts:1:17:\n      1 \u{2502} import x from \"missing-lib\";\n        \u{2575}                  ~~~~~~~~~~~~~\n\n\u{2718} [ERROR] Expected \";\" but found \"}\"\n\n    src/a/util.ts:4:2:\n      4 \u{2502} }\n\n2 errors\n";
        let diagnostics = parse_diagnostics(stderr, None);
        assert_eq!(
            diagnostics,
            vec![
                "src/a/index.ts:1:17: Could not resolve \"missing-lib\"",
                "src/a/util.ts:4:2: Expected \";\" but found \"}\"",
            ]
        );
    }

    #[test]
    fn error_without_location_keeps_message() {
        let diagnostics = parse_diagnostics("[ERROR] Must use \"outdir\" with multiple files\n", None);
        assert_eq!(diagnostics, vec!["Must use \"outdir\" with multiple files"]);
    }

    #[test]
    fn falls_back_to_stderr_lines() {
        let diagnostics = parse_diagnostics("\nsegfault\n  core dumped \n", None);
        assert_eq!(diagnostics, vec!["segfault", "core dumped"]);
    }

    #[test]
    fn falls_back_to_status_text() {
        let diagnostics = parse_diagnostics("", None);
        assert_eq!(diagnostics, vec!["bundler failed without output"]);
    }

    #[tokio::test]
    async fn missing_program_is_compile_error() {
        let staging = tempfile::tempdir().unwrap();
        let target = BuildTarget::new("src/a/index.ts", "a");
        let opts = options(Path::new("/dist"));
        let out = MemoryFs::new();
        let compiler = EsbuildCompiler::new("extpack-no-such-bundler", Vec::new());

        let err = compiler
            .compile(CompileRequest {
                target: &target,
                options: &opts,
                output: &out,
                staging: staging.path(),
            })
            .await
            .unwrap_err();

        match err {
            ExtpackError::Compile { target, diagnostics } => {
                assert_eq!(target, "a");
                assert!(diagnostics[0].contains("extpack-no-such-bundler"));
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(out.is_empty().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn staged_output_moves_into_disk_output() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("stage");
        std::fs::create_dir_all(&staging).unwrap();
        let dist = tmp.path().join("dist");

        // Writes a module to the --outfile path.
        let script = fake_bundler(
            tmp.path(),
            "fake-esbuild",
            "for a in \"$@\"; do case \"$a\" in --outfile=*) printf 'export default 1' > \"${a#--outfile=}\";; esac; done\n",
        );

        let target = BuildTarget::new(tmp.path().join("index.ts"), "a");
        let opts = options(&dist);
        let compiler = EsbuildCompiler::new(script.display().to_string(), Vec::new());

        let built = compiler
            .compile(CompileRequest {
                target: &target,
                options: &opts,
                output: &DiskFs,
                staging: &staging,
            })
            .await
            .unwrap();

        assert_eq!(built.artifacts.len(), 1);
        assert_eq!(built.artifacts[0].name, "a.mjs");
        assert_eq!(built.artifacts[0].path, dist.join("a.mjs"));
        assert_eq!(std::fs::read_to_string(dist.join("a.mjs")).unwrap(), "export default 1");
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn memory_output_is_read_from_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("stage");
        std::fs::create_dir_all(&staging).unwrap();

        // Refuses --outfile and prints the bundle instead.
        let script = fake_bundler(
            tmp.path(),
            "stdout-esbuild",
            "for a in \"$@\"; do case \"$a\" in --outfile=*) echo \"[ERROR] unexpected $a\" >&2; exit 9;; esac; done\nprintf 'export default 2'\n",
        );

        let target = BuildTarget::new(tmp.path().join("index.ts"), "a");
        let opts = options(Path::new("/dist"));
        let out = MemoryFs::new();
        let compiler = EsbuildCompiler::new(script.display().to_string(), Vec::new());

        let built = compiler
            .compile(CompileRequest {
                target: &target,
                options: &opts,
                output: &out,
                staging: &staging,
            })
            .await
            .unwrap();

        assert_eq!(built.artifacts.len(), 1);
        assert_eq!(built.artifacts[0].name, "a.mjs");
        assert_eq!(
            out.read_to_string(Path::new("/dist/a.mjs")).await.unwrap(),
            "export default 2"
        );
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
        assert!(!Path::new("/dist/a.mjs").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_stdout_bundler_is_compile_error() {
        let tmp = tempfile::tempdir().unwrap();
        let script = fake_bundler(tmp.path(), "quiet-esbuild", "exit 0\n");

        let target = BuildTarget::new("index.ts", "q");
        let opts = options(Path::new("/dist"));
        let out = MemoryFs::new();
        let compiler = EsbuildCompiler::new(script.display().to_string(), Vec::new());

        let err = compiler
            .compile(CompileRequest {
                target: &target,
                options: &opts,
                output: &out,
                staging: tmp.path(),
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, ExtpackError::Compile { ref diagnostics, .. } if diagnostics == &vec!["bundler produced no output".to_string()])
        );
        assert!(out.is_empty().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_bundler_reports_diagnostics() {
        let tmp = tempfile::tempdir().unwrap();
        let script = fake_bundler(
            tmp.path(),
            "broken-esbuild",
            "echo '[ERROR] Could not resolve \"x\"' >&2\nexit 1\n",
        );

        let target = BuildTarget::new("index.ts", "b");
        let opts = options(Path::new("/dist"));
        let out = MemoryFs::new();
        let compiler = EsbuildCompiler::new(script.display().to_string(), Vec::new());

        let err = compiler
            .compile(CompileRequest {
                target: &target,
                options: &opts,
                output: &out,
                staging: tmp.path(),
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, ExtpackError::Compile { ref diagnostics, .. } if diagnostics == &vec!["Could not resolve \"x\"".to_string()])
        );
    }
}
