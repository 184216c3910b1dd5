//! Source tree fixtures.

use std::fs;
use std::path::Path;

/// Create empty-bodied source files at the given relative paths under `root`.
pub fn create_source_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("// {}\n", file)).unwrap();
    }
}
