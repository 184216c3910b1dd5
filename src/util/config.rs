//! Settings file support.
//!
//! A project can keep defaults in `.bowtie/config.toml` next to where the
//! build is launched. Command-line flags and environment variables override
//! anything set here.
//!
//! ```toml
//! [header]
//! extra_folders = ["opengl_renderer"]
//! order = "sorted"
//!
//! [build]
//! output_dir = "bin"
//! dependencies = "luajit"
//! library_variants = "matching"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{DependencySet, LibraryVariantMapping, TargetPlatform};
use crate::unity::IncludeOrder;
use crate::util::fs::read_to_string;

/// Location of the project settings file, relative to the working directory.
pub const PROJECT_SETTINGS: &str = ".bowtie/config.toml";

/// bowtie-build settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub header: HeaderSettings,
    pub build: BuildSettings,
}

/// Unity header settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    /// Folders added to the default whitelist. Replaces the built-in extra
    /// folder when present.
    pub extra_folders: Option<Vec<String>>,
    pub order: Option<IncludeOrder>,
}

/// Build settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub platform: Option<TargetPlatform>,
    pub output_dir: Option<PathBuf>,
    pub dependencies: Option<DependencySet>,
    pub library_variants: Option<LibraryVariantMapping>,
    /// Compiler program override
    pub cc: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse settings: {}", path.display()))
    }

    /// Load settings, falling back to defaults if the file is missing or
    /// malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("ignoring settings from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
