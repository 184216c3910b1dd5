//! Clang (GCC-compatible) command-line syntax.

use std::path::{Path, PathBuf};

use crate::builder::flags::{CompilerFlag, FlagSet, LinkerFlag};

use super::{CommandSpec, Driver};

/// Clang driver: compiles and links in a single invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClangDriver;

impl Driver for ClangDriver {
    fn compiler_args(&self, flag: &CompilerFlag) -> Vec<String> {
        match flag {
            CompilerFlag::Standard(std) => vec![format!("-std={}", std)],
            CompilerFlag::ForceCxx => vec!["-x".to_string(), "c++".to_string()],
            CompilerFlag::WarningsAll => vec!["-Wall".to_string()],
            CompilerFlag::WarningsAsErrors => vec!["-Werror".to_string()],
            CompilerFlag::DisableWarning(name) => vec![format!("-Wno-{}", name)],
            CompilerFlag::Define { name, value } => match value {
                Some(v) => vec![format!("-D{}={}", name, v)],
                None => vec![format!("-D{}", name)],
            },
            CompilerFlag::IncludeDir(dir) => vec![format!("-I{}", dir.display())],
            CompilerFlag::ForceInclude(header) => {
                vec!["-include".to_string(), header.display().to_string()]
            }
            CompilerFlag::WholeProgramOptimization => vec!["-flto".to_string()],
            CompilerFlag::Optimize => vec!["-O2".to_string()],
            CompilerFlag::DebugInfo => vec!["-g".to_string()],
            // Runtime selection is an MSVC concept
            CompilerFlag::Runtime(_) => Vec::new(),
        }
    }

    fn linker_args(&self, flag: &LinkerFlag) -> Vec<String> {
        match flag {
            LinkerFlag::LibraryDir(dir) => vec![format!("-L{}", dir.display())],
            LinkerFlag::Library(lib) => vec![format!("-l{}", lib)],
            LinkerFlag::Output(path) => vec!["-o".to_string(), path.display().to_string()],
            LinkerFlag::Subsystem(_)
            | LinkerFlag::Entry(_)
            | LinkerFlag::NoIncremental
            | LinkerFlag::IgnoreWarning(_) => Vec::new(),
        }
    }

    fn command(&self, program: PathBuf, entry: &Path, flags: &FlagSet) -> CommandSpec {
        let mut cmd = CommandSpec::new(program);

        for flag in &flags.compiler {
            cmd = cmd.args(self.compiler_args(flag));
        }

        cmd = cmd.arg(entry.display().to_string());

        for flag in &flags.linker {
            cmd = cmd.args(self.linker_args(flag));
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::flags::compose_flags;
    use crate::core::{BuildConfig, TargetPlatform};

    #[test]
    fn test_x11_command_line() {
        let mut config = BuildConfig::new(TargetPlatform::X11, "/src");
        config.output_dir = PathBuf::from("bin");
        let flags = compose_flags(&config).unwrap();

        let cmd = ClangDriver.command(
            PathBuf::from("clang++"),
            Path::new("/src/bowtie_linux/bowtie_linux.cpp"),
            &flags,
        );

        let types_h = Path::new("/src").join("base/types.h").display().to_string();
        let assert_h = Path::new("/src").join("base/assert.h").display().to_string();
        let output = Path::new("bin").join("bowtie").display().to_string();

        let expected: Vec<String> = [
            "-std=c++11",
            "-x",
            "c++",
            "-Wall",
            "-Werror",
            "-Wno-unknown-pragmas",
            "-Wno-address-of-temporary",
            "-Wno-missing-braces",
            "-DLINUX",
            "-DGLEW_STATIC",
            "-I/src",
            "-include",
            types_h.as_str(),
            "-include",
            assert_h.as_str(),
            "/src/bowtie_linux/bowtie_linux.cpp",
            "-L/usr/X11R6/lib",
            "-ldl",
            "-lX11",
            "-lXft",
            "-lGL",
            "-o",
            output.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(cmd.program, PathBuf::from("clang++"));
        assert_eq!(cmd.args, expected);
    }

    #[test]
    fn test_define_with_value() {
        let flag = CompilerFlag::Define {
            name: "VERSION".to_string(),
            value: Some("3".to_string()),
        };
        assert_eq!(ClangDriver.compiler_args(&flag), vec!["-DVERSION=3"]);
    }

    #[test]
    fn test_msvc_only_flags_are_dropped() {
        assert!(ClangDriver.linker_args(&LinkerFlag::NoIncremental).is_empty());
        assert!(ClangDriver
            .linker_args(&LinkerFlag::Entry("mainCRTStartup"))
            .is_empty());
    }
}
