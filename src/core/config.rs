//! Resolved build configuration.
//!
//! A [`BuildConfig`] is assembled once at startup from CLI arguments, the
//! environment and the optional settings file. Nothing below the CLI layer
//! reads the process environment; everything flows through this value.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::platform::TargetPlatform;
use crate::unity::IncludeOrder;

/// Positional token that selects a release build.
pub const RELEASE_TOKEN: &str = "release";

/// Positional token that requests running the binary after a build.
pub const RUN_TOKEN: &str = "run";

/// Extra folder added to the unity build by default.
pub const DEFAULT_EXTRA_FOLDER: &str = "opengl_renderer";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "bin";

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Release,
    #[default]
    Debug,
}

impl BuildMode {
    /// Mode selected by the first positional argument.
    ///
    /// Only an exact `release` selects a release build; anything else,
    /// including no argument at all, is a debug build.
    pub fn from_positional(args: &[String]) -> Self {
        match args.first() {
            Some(first) if first == RELEASE_TOKEN => BuildMode::Release,
            _ => BuildMode::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Release => "release",
            BuildMode::Debug => "debug",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `run` appears in either of the first two positional slots.
pub fn run_requested(args: &[String]) -> bool {
    args.iter().take(2).any(|arg| arg == RUN_TOKEN)
}

/// A prebuilt third-party library that lives under the library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLibrary {
    pub name: &'static str,
    /// Include directory, relative to the library root.
    pub include_subdir: &'static str,
    /// Directory holding the per-variant `release`/`debug` lib folders.
    pub lib_subdir: &'static str,
    /// Import library name without extension.
    pub link_name: &'static str,
}

/// The LuaJIT scripting runtime.
pub const LUAJIT: ExternalLibrary = ExternalLibrary {
    name: "luajit",
    include_subdir: "luajit/include",
    lib_subdir: "luajit/lib",
    link_name: "lua51",
};

/// Versioned set of external libraries a target links against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySet {
    /// Revision that embeds the LuaJIT scripting runtime.
    #[default]
    LuaJit,
    /// Revision without any external libraries.
    None,
}

impl DependencySet {
    /// Libraries this revision links on the given platform.
    ///
    /// The scripting runtime is only shipped for the Windows target.
    pub fn libraries(&self, platform: TargetPlatform) -> Vec<ExternalLibrary> {
        match (self, platform) {
            (DependencySet::LuaJit, TargetPlatform::Windows) => vec![LUAJIT],
            _ => Vec::new(),
        }
    }
}

impl FromStr for DependencySet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "luajit" => Ok(DependencySet::LuaJit),
            "none" => Ok(DependencySet::None),
            _ => Err(format!(
                "unknown dependency set '{}'; expected 'luajit' or 'none'",
                s
            )),
        }
    }
}

/// Maps a build mode to the library variant subdirectory it links from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryVariantMapping {
    /// Release links `release` libraries, debug links `debug` libraries.
    #[default]
    Matching,
    /// Release links `debug` libraries and vice versa, as older build
    /// scripts did.
    Inverted,
}

impl LibraryVariantMapping {
    pub fn subdir(&self, mode: BuildMode) -> &'static str {
        match (self, mode) {
            (LibraryVariantMapping::Matching, BuildMode::Release)
            | (LibraryVariantMapping::Inverted, BuildMode::Debug) => "release",
            (LibraryVariantMapping::Matching, BuildMode::Debug)
            | (LibraryVariantMapping::Inverted, BuildMode::Release) => "debug",
        }
    }
}

impl FromStr for LibraryVariantMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "matching" => Ok(LibraryVariantMapping::Matching),
            "inverted" => Ok(LibraryVariantMapping::Inverted),
            _ => Err(format!(
                "unknown library variant mapping '{}'; expected 'matching' or 'inverted'",
                s
            )),
        }
    }
}

/// Resolved configuration for a single build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub platform: TargetPlatform,
    pub mode: BuildMode,
    /// Run the produced binary after a successful build.
    pub run: bool,
    /// Root of the application source tree.
    pub source_dir: PathBuf,
    /// Root of the prebuilt third-party libraries.
    pub libs_dir: Option<PathBuf>,
    /// Directory receiving the executable. Created if absent.
    pub output_dir: PathBuf,
    /// Visual Studio common tools directory, used to locate `vcvarsall.bat`.
    pub vs_tools_dir: Option<PathBuf>,
    /// Folders added to the default unity build whitelist.
    pub extra_folders: Vec<String>,
    pub include_order: IncludeOrder,
    pub dependencies: DependencySet,
    pub library_variants: LibraryVariantMapping,
    /// Compiler program override.
    pub compiler: Option<PathBuf>,
}

impl BuildConfig {
    /// A debug configuration with defaults for everything but the platform
    /// and source root.
    pub fn new(platform: TargetPlatform, source_dir: impl Into<PathBuf>) -> Self {
        BuildConfig {
            platform,
            mode: BuildMode::Debug,
            run: false,
            source_dir: source_dir.into(),
            libs_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            vs_tools_dir: None,
            extra_folders: vec![DEFAULT_EXTRA_FOLDER.to_string()],
            include_order: IncludeOrder::default(),
            dependencies: DependencySet::default(),
            library_variants: LibraryVariantMapping::default(),
            compiler: None,
        }
    }

    /// Path of the generated unity header.
    pub fn unity_header_path(&self) -> PathBuf {
        self.source_dir.join(self.platform.unity_header())
    }

    /// Path of the entry translation unit.
    pub fn entry_source_path(&self) -> PathBuf {
        self.source_dir.join(self.platform.entry_source())
    }

    /// Path of the produced executable.
    pub fn executable_path(&self) -> PathBuf {
        self.output_dir.join(self.platform.executable_name())
    }

    /// Compiler program, honoring the override.
    pub fn compiler_program(&self) -> PathBuf {
        self.compiler
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.platform.default_compiler()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mode_from_positional() {
        assert_eq!(BuildMode::from_positional(&[]), BuildMode::Debug);
        assert_eq!(BuildMode::from_positional(&args(&["release"])), BuildMode::Release);
        assert_eq!(BuildMode::from_positional(&args(&["release", "run"])), BuildMode::Release);
        assert_eq!(BuildMode::from_positional(&args(&["run", "release"])), BuildMode::Debug);
        assert_eq!(BuildMode::from_positional(&args(&["Release"])), BuildMode::Debug);
        assert_eq!(BuildMode::from_positional(&args(&["debug"])), BuildMode::Debug);
    }

    #[test]
    fn test_run_in_either_slot() {
        assert!(run_requested(&args(&["run"])));
        assert!(run_requested(&args(&["release", "run"])));
        assert!(run_requested(&args(&["debug", "run"])));
        assert!(!run_requested(&args(&["release"])));
        assert!(!run_requested(&args(&["a", "b", "run"])));
        assert!(!run_requested(&[]));
    }

    #[test]
    fn test_library_variant_mapping() {
        let matching = LibraryVariantMapping::Matching;
        assert_eq!(matching.subdir(BuildMode::Release), "release");
        assert_eq!(matching.subdir(BuildMode::Debug), "debug");

        let inverted = LibraryVariantMapping::Inverted;
        assert_eq!(inverted.subdir(BuildMode::Release), "debug");
        assert_eq!(inverted.subdir(BuildMode::Debug), "release");
    }

    #[test]
    fn test_dependency_sets() {
        assert_eq!(
            DependencySet::LuaJit.libraries(TargetPlatform::Windows),
            vec![LUAJIT]
        );
        assert!(DependencySet::LuaJit.libraries(TargetPlatform::X11).is_empty());
        assert!(DependencySet::None.libraries(TargetPlatform::Windows).is_empty());
    }

    #[test]
    fn test_config_paths() {
        let mut config = BuildConfig::new(TargetPlatform::X11, "/src");
        config.output_dir = PathBuf::from("out");

        assert_eq!(
            config.unity_header_path(),
            PathBuf::from("/src/bowtie_linux/source_include.h")
        );
        assert_eq!(config.executable_path(), PathBuf::from("out/bowtie"));
        assert_eq!(config.compiler_program(), PathBuf::from("clang++"));

        config.compiler = Some(PathBuf::from("/opt/llvm/bin/clang++"));
        assert_eq!(
            config.compiler_program(),
            PathBuf::from("/opt/llvm/bin/clang++")
        );
    }
}
