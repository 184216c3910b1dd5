//! Unity build header generation.
//!
//! The whole application is compiled as a single translation unit. The
//! platform entry file includes a generated header, and that header includes
//! every selected `.c`/`.cpp` file of the project:
//!
//! ```text
//! #pragma once
//! #include "../base/memory.cpp"
//! #include "../engine/engine.cpp"
//! ```
//!
//! Include paths are relative to the platform directory that holds the
//! header, hence the `../` prefix, and always use forward slashes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

mod whitelist;

pub use whitelist::{FolderWhitelist, DEFAULT_FOLDERS};

/// First line of every generated header.
pub const HEADER_GUARD: &str = "#pragma once";

/// Prefix joined to every relative source path in an include directive.
pub const INCLUDE_PREFIX: &str = "../";

/// Errors from header generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to scan source tree `{}`", .root.display())]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("output directory `{}` does not exist", .dir.display())]
    OutputDirectoryMissing { dir: PathBuf },

    #[error("failed to write unity header `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Language of a native source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    /// `.c`
    C,
    /// `.cpp`
    Cxx,
}

impl SourceKind {
    /// Classify a path by its exact extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "c" => Some(SourceKind::C),
            "cpp" => Some(SourceKind::Cxx),
            _ => None,
        }
    }
}

/// A source file selected for the unity build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Path relative to the source root, with `/` separators.
    pub relative: String,
    pub kind: SourceKind,
}

impl SourceFile {
    /// The include directive for this file.
    pub fn include_directive(&self) -> String {
        format!("#include \"{}{}\"", INCLUDE_PREFIX, self.relative)
    }
}

/// Order of include directives in the generated header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeOrder {
    /// Lexicographic by relative path. Reproducible across machines.
    #[default]
    Sorted,
    /// Directory enumeration order as reported by the filesystem.
    Filesystem,
}

impl fmt::Display for IncludeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeOrder::Sorted => f.write_str("sorted"),
            IncludeOrder::Filesystem => f.write_str("filesystem"),
        }
    }
}

impl FromStr for IncludeOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sorted" => Ok(IncludeOrder::Sorted),
            "filesystem" | "fs" => Ok(IncludeOrder::Filesystem),
            _ => Err(format!(
                "unknown include order '{}'; expected 'sorted' or 'filesystem'",
                s
            )),
        }
    }
}

/// Result of a successful generation pass.
#[derive(Debug, Clone)]
pub struct UnityHeader {
    pub path: PathBuf,
    pub files: Vec<SourceFile>,
    pub contents: String,
}

/// Whether a relative path is part of the unity build.
///
/// A file is selected iff it has a native source extension and its
/// forward-slash relative path starts with a whitelisted folder name.
pub fn is_selected(relative: &str, whitelist: &FolderWhitelist) -> bool {
    SourceKind::from_path(Path::new(relative)).is_some() && whitelist.matches(relative)
}

/// Find every source file under `root` selected by `whitelist`.
pub fn discover_sources(
    root: &Path,
    whitelist: &FolderWhitelist,
    order: IncludeOrder,
) -> Result<Vec<SourceFile>, GenerateError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|source| GenerateError::Scan {
            root: root.to_path_buf(),
            source,
        })?;

        if !is_source_candidate(&entry) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let Some(relative) = to_forward_slashes(relative) else {
            tracing::warn!(
                "skipping `{}`: path is not valid UTF-8",
                entry.path().display()
            );
            continue;
        };

        if !whitelist.matches(&relative) {
            continue;
        }
        if let Some(kind) = SourceKind::from_path(entry.path()) {
            files.push(SourceFile { relative, kind });
        }
    }

    if order == IncludeOrder::Sorted {
        files.sort_by(|a, b| a.relative.cmp(&b.relative));
    }

    Ok(files)
}

/// Render the header text for a list of files.
pub fn render_header(files: &[SourceFile]) -> String {
    let includes: Vec<String> = files.iter().map(SourceFile::include_directive).collect();
    format!("{}\n{}", HEADER_GUARD, includes.join("\n"))
}

/// Scan `root` and (over)write the unity header at `output`.
///
/// The directory containing `output` must already exist.
pub fn write_unity_header(
    root: &Path,
    output: &Path,
    whitelist: &FolderWhitelist,
    order: IncludeOrder,
) -> Result<UnityHeader, GenerateError> {
    if let Some(dir) = output.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(GenerateError::OutputDirectoryMissing {
                dir: dir.to_path_buf(),
            });
        }
    }

    let files = discover_sources(root, whitelist, order)?;
    let contents = render_header(&files);

    fs::write(output, &contents).map_err(|source| GenerateError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "wrote {} includes to {} (folders: {})",
        files.len(),
        output.display(),
        whitelist.folders().join(", ")
    );

    Ok(UnityHeader {
        path: output.to_path_buf(),
        files,
        contents,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Regular files, plus symlinks that resolve to one. Directory symlinks are
/// never descended into.
fn is_source_candidate(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// `None` if any component is not valid UTF-8.
fn to_forward_slashes(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
