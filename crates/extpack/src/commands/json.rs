// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `extpack json`: write the catalog manifest for an output directory.

use std::path::Path;

use colored::Colorize;
use extpack_catalog::{assemble_catalog, Catalog, Introspector};
use extpack_core::{ArtifactLoader, ExtpackError};

pub async fn run_json<L: ArtifactLoader>(
    dir: &Path,
    extension: &str,
    introspector: &Introspector<L>,
) -> Result<Catalog, ExtpackError> {
    let catalog = assemble_catalog(dir, extension, introspector).await?;

    for skipped in &catalog.skipped {
        eprintln!("{} {skipped}: skipped", "✗".red());
    }
    println!(
        "{} {} entr{} to {}",
        "Wrote".bold(),
        catalog.entries.len(),
        if catalog.entries.len() == 1 { "y" } else { "ies" },
        catalog.manifest_path.display()
    );
    Ok(catalog)
}
