//! Compiler and linker flag composition.
//!
//! Flags are kept as typed values in platform tables and only turned into
//! command-line strings by a [`Driver`](super::toolchain::Driver) at the
//! invocation boundary. Composition is a pure function of [`BuildConfig`].

use std::path::{Path, PathBuf};

use crate::builder::errors::BuildError;
use crate::core::{BuildConfig, BuildMode, ExternalLibrary, TargetPlatform};

/// Headers force-included into the unity translation unit, relative to the
/// source root.
pub const FORCED_INCLUDES: [&str; 2] = ["base/types.h", "base/assert.h"];

const X11_CXX_STANDARD: &str = "c++11";
const X11_DISABLED_WARNINGS: [&str; 3] =
    ["unknown-pragmas", "address-of-temporary", "missing-braces"];
const X11_DEFINES: [&str; 2] = ["LINUX", "GLEW_STATIC"];
const X11_LIBRARY_DIRS: [&str; 1] = ["/usr/X11R6/lib"];
const X11_LIBRARIES: [&str; 4] = ["dl", "X11", "Xft", "GL"];

const WINDOWS_DEFINES: [&str; 5] = [
    "WINDOWS",
    "GLEW_STATIC",
    "UNICODE",
    "_UNICODE",
    "_CRT_SECURE_NO_WARNINGS",
];
const WINDOWS_DISABLED_WARNINGS: [&str; 3] = ["4996", "4238", "4530"];
const WINDOWS_IGNORED_LINKER_WARNINGS: [u32; 1] = [4098];
/// Linked before the dependency libraries.
const WINDOWS_LEADING_LIBRARIES: [&str; 1] = ["user32"];
const WINDOWS_LIBRARIES: [&str; 3] = ["opengl32", "Gdi32", "dbghelp"];
const WINDOWS_SUBSYSTEM: &str = "windows";
const WINDOWS_ENTRY: &str = "mainCRTStartup";

/// C runtime library selection (MSVC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeLibrary {
    /// Static multithreaded runtime.
    MultiThreaded,
    /// Static multithreaded debug runtime.
    MultiThreadedDebug,
}

/// A single compiler option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompilerFlag {
    /// Language standard, e.g. `c++11`.
    Standard(&'static str),
    /// Treat every input as C++.
    ForceCxx,
    /// Enable the toolchain's broad warning set.
    WarningsAll,
    WarningsAsErrors,
    /// Disable a warning by toolchain-specific name or code.
    DisableWarning(String),
    Define {
        name: String,
        value: Option<String>,
    },
    IncludeDir(PathBuf),
    /// Include a header before the first line of the translation unit.
    ForceInclude(PathBuf),
    WholeProgramOptimization,
    Optimize,
    DebugInfo,
    Runtime(RuntimeLibrary),
}

impl CompilerFlag {
    pub fn define(name: impl Into<String>) -> Self {
        CompilerFlag::Define {
            name: name.into(),
            value: None,
        }
    }
}

/// A single linker option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkerFlag {
    LibraryDir(PathBuf),
    /// Library name without prefix or extension.
    Library(String),
    Output(PathBuf),
    Subsystem(&'static str),
    Entry(&'static str),
    NoIncremental,
    IgnoreWarning(u32),
}

/// Ordered compiler and linker flags for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub compiler: Vec<CompilerFlag>,
    pub linker: Vec<LinkerFlag>,
}

/// Compose the flags for `config`.
pub fn compose_flags(config: &BuildConfig) -> Result<FlagSet, BuildError> {
    let libraries = config.dependencies.libraries(config.platform);

    let libs_dir = match (libraries.first(), config.libs_dir.as_deref()) {
        (Some(library), None) => {
            return Err(BuildError::MissingLibraryRoot {
                platform: config.platform,
                library: library.name,
            })
        }
        (_, dir) => dir,
    };

    let flags = match config.platform {
        TargetPlatform::X11 => x11_flags(config),
        TargetPlatform::Windows => windows_flags(config, libs_dir, &libraries),
    };

    tracing::debug!(
        "composed {} compiler and {} linker flags for {} {}",
        flags.compiler.len(),
        flags.linker.len(),
        config.platform,
        config.mode
    );

    Ok(flags)
}

/// Flags contributed by the build mode alone.
pub fn mode_flags(platform: TargetPlatform, mode: BuildMode) -> Vec<CompilerFlag> {
    match (platform, mode) {
        // The X11 build has no release/debug distinction yet.
        (TargetPlatform::X11, _) => Vec::new(),
        (TargetPlatform::Windows, BuildMode::Release) => vec![
            CompilerFlag::WholeProgramOptimization,
            CompilerFlag::Optimize,
            CompilerFlag::Runtime(RuntimeLibrary::MultiThreaded),
            CompilerFlag::define("NDEBUG"),
        ],
        (TargetPlatform::Windows, BuildMode::Debug) => vec![
            CompilerFlag::DebugInfo,
            CompilerFlag::Runtime(RuntimeLibrary::MultiThreadedDebug),
            CompilerFlag::define("DEBUG"),
        ],
    }
}

fn source_flags(source_dir: &Path) -> Vec<CompilerFlag> {
    let mut flags = vec![CompilerFlag::IncludeDir(source_dir.to_path_buf())];
    flags.extend(
        FORCED_INCLUDES
            .iter()
            .map(|header| CompilerFlag::ForceInclude(source_dir.join(header))),
    );
    flags
}

fn x11_flags(config: &BuildConfig) -> FlagSet {
    let mut compiler = vec![
        CompilerFlag::Standard(X11_CXX_STANDARD),
        CompilerFlag::ForceCxx,
        CompilerFlag::WarningsAll,
        CompilerFlag::WarningsAsErrors,
    ];
    compiler.extend(
        X11_DISABLED_WARNINGS
            .iter()
            .map(|w| CompilerFlag::DisableWarning(w.to_string())),
    );
    compiler.extend(X11_DEFINES.iter().map(|d| CompilerFlag::define(*d)));
    compiler.extend(source_flags(&config.source_dir));
    compiler.extend(mode_flags(TargetPlatform::X11, config.mode));

    let mut linker: Vec<LinkerFlag> = X11_LIBRARY_DIRS
        .iter()
        .map(|dir| LinkerFlag::LibraryDir(PathBuf::from(dir)))
        .collect();
    linker.extend(X11_LIBRARIES.iter().map(|lib| LinkerFlag::Library(lib.to_string())));
    linker.push(LinkerFlag::Output(config.executable_path()));

    FlagSet { compiler, linker }
}

fn windows_flags(
    config: &BuildConfig,
    libs_dir: Option<&Path>,
    libraries: &[ExternalLibrary],
) -> FlagSet {
    let mut compiler = vec![
        CompilerFlag::WarningsAll,
        CompilerFlag::WarningsAsErrors,
        CompilerFlag::ForceCxx,
    ];
    let mut linker = Vec::new();

    if let Some(libs_dir) = libs_dir {
        let variant = config.library_variants.subdir(config.mode);
        for library in libraries {
            compiler.push(CompilerFlag::IncludeDir(libs_dir.join(library.include_subdir)));
            linker.push(LinkerFlag::LibraryDir(
                libs_dir.join(library.lib_subdir).join(variant),
            ));
        }
    }

    compiler.extend(WINDOWS_DEFINES.iter().map(|d| CompilerFlag::define(*d)));
    compiler.extend(
        WINDOWS_DISABLED_WARNINGS
            .iter()
            .map(|w| CompilerFlag::DisableWarning(w.to_string())),
    );
    compiler.extend(source_flags(&config.source_dir));
    compiler.extend(mode_flags(TargetPlatform::Windows, config.mode));

    linker.push(LinkerFlag::Subsystem(WINDOWS_SUBSYSTEM));
    linker.push(LinkerFlag::Entry(WINDOWS_ENTRY));
    linker.push(LinkerFlag::NoIncremental);
    linker.extend(
        WINDOWS_IGNORED_LINKER_WARNINGS
            .iter()
            .map(|code| LinkerFlag::IgnoreWarning(*code)),
    );
    linker.extend(
        WINDOWS_LEADING_LIBRARIES
            .iter()
            .map(|lib| LinkerFlag::Library(lib.to_string())),
    );
    linker.extend(
        libraries
            .iter()
            .map(|library| LinkerFlag::Library(library.link_name.to_string())),
    );
    linker.extend(WINDOWS_LIBRARIES.iter().map(|lib| LinkerFlag::Library(lib.to_string())));
    linker.push(LinkerFlag::Output(config.executable_path()));

    FlagSet { compiler, linker }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::{DependencySet, LibraryVariantMapping};

    fn windows_config(mode: BuildMode) -> BuildConfig {
        let mut config = BuildConfig::new(TargetPlatform::Windows, "src");
        config.mode = mode;
        config.libs_dir = Some(PathBuf::from("libs"));
        config
    }

    fn difference<T: Clone + Eq + std::hash::Hash>(a: &[T], b: &[T]) -> HashSet<T> {
        let b: HashSet<&T> = b.iter().collect();
        a.iter().filter(|x| !b.contains(x)).cloned().collect()
    }

    #[test]
    fn test_x11_flags() {
        let mut config = BuildConfig::new(TargetPlatform::X11, "src");
        config.output_dir = PathBuf::from("out");
        let flags = compose_flags(&config).unwrap();

        assert_eq!(flags.compiler[0], CompilerFlag::Standard("c++11"));
        assert!(flags.compiler.contains(&CompilerFlag::define("LINUX")));
        assert!(flags.compiler.contains(&CompilerFlag::define("GLEW_STATIC")));
        assert!(flags
            .compiler
            .contains(&CompilerFlag::IncludeDir(PathBuf::from("src"))));
        assert!(flags
            .compiler
            .contains(&CompilerFlag::ForceInclude(Path::new("src").join("base/types.h"))));
        assert!(flags
            .compiler
            .contains(&CompilerFlag::ForceInclude(Path::new("src").join("base/assert.h"))));
        assert_eq!(
            flags.linker.last(),
            Some(&LinkerFlag::Output(PathBuf::from("out").join("bowtie")))
        );
        assert!(flags.linker.contains(&LinkerFlag::Library("GL".to_string())));
    }

    #[test]
    fn test_x11_modes_are_identical() {
        let mut release = BuildConfig::new(TargetPlatform::X11, "src");
        release.mode = BuildMode::Release;
        let debug = BuildConfig::new(TargetPlatform::X11, "src");

        assert_eq!(compose_flags(&release).unwrap(), compose_flags(&debug).unwrap());
    }

    #[test]
    fn test_x11_does_not_need_library_root() {
        let config = BuildConfig::new(TargetPlatform::X11, "src");
        assert!(config.libs_dir.is_none());
        assert!(compose_flags(&config).is_ok());
    }

    #[test]
    fn test_windows_release_debug_differ_only_in_mode_flags() {
        let release = compose_flags(&windows_config(BuildMode::Release)).unwrap();
        let debug = compose_flags(&windows_config(BuildMode::Debug)).unwrap();

        let release_only = difference(&release.compiler, &debug.compiler);
        let debug_only = difference(&debug.compiler, &release.compiler);

        assert_eq!(
            release_only,
            mode_flags(TargetPlatform::Windows, BuildMode::Release)
                .into_iter()
                .collect::<HashSet<_>>()
        );
        assert_eq!(
            debug_only,
            mode_flags(TargetPlatform::Windows, BuildMode::Debug)
                .into_iter()
                .collect::<HashSet<_>>()
        );

        let libs = Path::new("libs").join("luajit/lib");
        assert_eq!(
            difference(&release.linker, &debug.linker),
            HashSet::from([LinkerFlag::LibraryDir(libs.join("release"))])
        );
        assert_eq!(
            difference(&debug.linker, &release.linker),
            HashSet::from([LinkerFlag::LibraryDir(libs.join("debug"))])
        );
    }

    #[test]
    fn test_windows_inverted_library_variants() {
        let mut config = windows_config(BuildMode::Release);
        config.library_variants = LibraryVariantMapping::Inverted;
        let flags = compose_flags(&config).unwrap();

        assert_eq!(
            flags.linker[0],
            LinkerFlag::LibraryDir(Path::new("libs").join("luajit/lib").join("debug"))
        );

        config.mode = BuildMode::Debug;
        let flags = compose_flags(&config).unwrap();
        assert_eq!(
            flags.linker[0],
            LinkerFlag::LibraryDir(Path::new("libs").join("luajit/lib").join("release"))
        );
    }

    #[test]
    fn test_windows_luajit_dependency() {
        let flags = compose_flags(&windows_config(BuildMode::Debug)).unwrap();

        assert!(flags
            .compiler
            .contains(&CompilerFlag::IncludeDir(Path::new("libs").join("luajit/include"))));
        assert!(flags.linker.contains(&LinkerFlag::Library("lua51".to_string())));
    }

    #[test]
    fn test_windows_dependency_libraries_follow_user32() {
        let flags = compose_flags(&windows_config(BuildMode::Debug)).unwrap();
        let libs: Vec<&str> = flags
            .linker
            .iter()
            .filter_map(|flag| match flag {
                LinkerFlag::Library(lib) => Some(lib.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(libs, vec!["user32", "lua51", "opengl32", "Gdi32", "dbghelp"]);

        let mut config = windows_config(BuildMode::Debug);
        config.dependencies = DependencySet::None;
        let flags = compose_flags(&config).unwrap();
        assert_eq!(
            flags
                .linker
                .iter()
                .filter(|flag| matches!(flag, LinkerFlag::Library(_)))
                .count(),
            4
        );
    }

    #[test]
    fn test_windows_without_scripting_runtime() {
        let mut config = windows_config(BuildMode::Debug);
        config.dependencies = DependencySet::None;
        config.libs_dir = None;
        let flags = compose_flags(&config).unwrap();

        assert!(!flags.linker.contains(&LinkerFlag::Library("lua51".to_string())));
        assert!(!flags
            .linker
            .iter()
            .any(|flag| matches!(flag, LinkerFlag::LibraryDir(_))));
        assert_eq!(
            flags
                .compiler
                .iter()
                .filter(|flag| matches!(flag, CompilerFlag::IncludeDir(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_windows_requires_library_root_for_luajit() {
        let mut config = windows_config(BuildMode::Debug);
        config.libs_dir = None;

        let err = compose_flags(&config).unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingLibraryRoot {
                library: "luajit",
                ..
            }
        ));
    }

    #[test]
    fn test_windows_entry_and_output() {
        let flags = compose_flags(&windows_config(BuildMode::Debug)).unwrap();

        assert!(flags.linker.contains(&LinkerFlag::Subsystem("windows")));
        assert!(flags.linker.contains(&LinkerFlag::Entry("mainCRTStartup")));
        assert_eq!(
            flags.linker.last(),
            Some(&LinkerFlag::Output(PathBuf::from("bin").join("bowtie.exe")))
        );
    }
}
