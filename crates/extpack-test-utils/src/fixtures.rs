// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture builders. These panic on I/O failure since they only run in tests.

use std::path::Path;

use extpack_core::{ExtensionMetadata, Languages};

/// Metadata for a source called `name`, hosted at `https://<name>.example`.
pub fn metadata(id: i64, name: &str) -> ExtensionMetadata {
    let url = format!("https://{}.example", name.to_lowercase());
    ExtensionMetadata {
        id,
        name: name.to_string(),
        icon: format!("{url}/icon.png"),
        url,
        version: "1.0.0".to_string(),
        languages: Languages::Single("en".to_string()),
        nsfw: false,
    }
}

/// Create `<root>/<name>/index.ts` for each name.
pub fn write_extension_tree(root: &Path, names: &[&str]) {
    for name in names {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("create {}: {e}", dir.display()));
        write(&dir.join("index.ts"), "export default class {}\n");
    }
}

/// Create `<root>/<name>.test.ts` for each name.
pub fn write_test_tree(root: &Path, names: &[&str]) {
    std::fs::create_dir_all(root).unwrap_or_else(|e| panic!("create {}: {e}", root.display()));
    for name in names {
        write(&root.join(format!("{name}.test.ts")), "import Source from '../src';\n");
    }
}

/// Create empty `<dir>/<name>.mjs` artifacts.
pub fn write_artifacts(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap_or_else(|e| panic!("create {}: {e}", dir.display()));
    for name in names {
        write(&dir.join(format!("{name}.mjs")), "export default class {}\n");
    }
}

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}
