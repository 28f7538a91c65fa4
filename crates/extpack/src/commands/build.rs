// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `extpack build`: compile every discovered extension to disk and report
//! its metadata. A failing extension is logged and skipped.

use std::path::Path;

use colored::Colorize;
use extpack_bundler::{discover_targets, project_name, DiskFs, WorkerPool};
use extpack_catalog::Introspector;
use extpack_config::ExtpackConfig;
use extpack_core::{
    ArtifactLoader, BuildTarget, CompileOptions, CompileRequest, Compiler, ExtensionMetadata,
    ExtpackError,
};
use tracing::{info, warn};

use super::resolve;

/// What a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Metadata of every artifact that compiled and introspected cleanly.
    pub built: Vec<ExtensionMetadata>,
    /// Targets skipped because compilation or introspection failed.
    pub failed: Vec<String>,
}

pub async fn run_build<C: Compiler, L: ArtifactLoader>(
    config: &ExtpackConfig,
    project_dir: &Path,
    compiler: &C,
    introspector: &Introspector<L>,
) -> Result<BuildReport, ExtpackError> {
    let source_dir = resolve(project_dir, &config.paths.source_dir);
    let dist_dir = resolve(project_dir, &config.paths.dist_dir);
    let cache_dir = resolve(project_dir, &config.paths.cache_dir);

    let root_name = project_name(project_dir);
    let targets = discover_targets(&source_dir, &config.discovery.entry_file, &root_name).await?;
    println!(
        "{} {} extension(s) from {}",
        "Building".bold(),
        targets.len(),
        source_dir.display()
    );

    let plan = Plan {
        dist_dir: &dist_dir,
        cache_dir: &cache_dir,
        extension: &config.discovery.artifact_extension,
    };
    let pool = WorkerPool::new(1, &cache_dir)?;
    let mut report = BuildReport::default();
    let outcome = build_all(&plan, &targets, &pool, compiler, introspector, &mut report).await;
    pool.end();
    outcome?;

    info!(
        built = report.built.len(),
        failed = report.failed.len(),
        "build finished"
    );
    Ok(report)
}

struct Plan<'a> {
    dist_dir: &'a Path,
    cache_dir: &'a Path,
    extension: &'a str,
}

async fn build_all<C: Compiler, L: ArtifactLoader>(
    plan: &Plan<'_>,
    targets: &[BuildTarget],
    pool: &WorkerPool,
    compiler: &C,
    introspector: &Introspector<L>,
    report: &mut BuildReport,
) -> Result<(), ExtpackError> {
    for target in targets {
        let options = CompileOptions::library(target, plan.dist_dir, plan.cache_dir)
            .with_extension(plan.extension);
        let compiled = {
            let lease = pool.acquire().await?;
            compiler
                .compile(CompileRequest {
                    target,
                    options: &options,
                    output: &DiskFs,
                    staging: lease.staging(),
                })
                .await
        };

        let built = match compiled {
            Ok(built) => built,
            Err(e) => {
                warn!(target_name = %target.name, error = %e, "skipping extension");
                eprintln!("{} {}: {e}", "✗".red(), target.name);
                report.failed.push(target.name.clone());
                continue;
            }
        };

        let modules = built
            .artifacts
            .iter()
            .filter(|a| a.path.extension().is_some_and(|ext| ext == plan.extension));
        for artifact in modules {
            match introspector.introspect(&artifact.path).await {
                Ok(metadata) => {
                    info!(
                        target_name = %target.name,
                        id = metadata.id,
                        source_name = %metadata.name,
                        version = %metadata.version,
                        elapsed_ms = built.build_time.as_millis() as u64,
                        "built extension"
                    );
                    println!(
                        "{} {} ({} v{}, id {})",
                        "✓".green(),
                        artifact.name,
                        metadata.name,
                        metadata.version,
                        metadata.id
                    );
                    report.built.push(metadata);
                }
                Err(e) => {
                    warn!(target_name = %target.name, error = %e, "skipping extension");
                    eprintln!("{} {}: {e}", "✗".red(), target.name);
                    report.failed.push(target.name.clone());
                }
            }
        }
    }
    Ok(())
}
