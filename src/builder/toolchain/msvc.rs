//! MSVC command-line syntax.

use std::path::{Path, PathBuf};

use crate::builder::flags::{CompilerFlag, FlagSet, LinkerFlag, RuntimeLibrary};

use super::{CommandSpec, Driver};

/// `cl.exe` driver: compiler flags, the entry source, then `/link` followed
/// by linker flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsvcDriver;

impl Driver for MsvcDriver {
    fn compiler_args(&self, flag: &CompilerFlag) -> Vec<String> {
        let arg = match flag {
            // cl.exe has no C++11 mode and compiles C++14 at minimum.
            CompilerFlag::Standard(_) => return Vec::new(),
            CompilerFlag::ForceCxx => "/TP".to_string(),
            CompilerFlag::WarningsAll => "/W4".to_string(),
            CompilerFlag::WarningsAsErrors => "/WX".to_string(),
            CompilerFlag::DisableWarning(code) => format!("/wd{}", code),
            CompilerFlag::Define { name, value } => match value {
                Some(v) => format!("/D{}={}", name, v),
                None => format!("/D{}", name),
            },
            CompilerFlag::IncludeDir(dir) => format!("/I{}", dir.display()),
            CompilerFlag::ForceInclude(header) => format!("/FI{}", header.display()),
            CompilerFlag::WholeProgramOptimization => "/GL".to_string(),
            CompilerFlag::Optimize => "/O2".to_string(),
            CompilerFlag::DebugInfo => "/Zi".to_string(),
            CompilerFlag::Runtime(RuntimeLibrary::MultiThreaded) => "/MT".to_string(),
            CompilerFlag::Runtime(RuntimeLibrary::MultiThreadedDebug) => "/MTd".to_string(),
        };
        vec![arg]
    }

    fn linker_args(&self, flag: &LinkerFlag) -> Vec<String> {
        let arg = match flag {
            LinkerFlag::LibraryDir(dir) => format!("/libpath:{}", dir.display()),
            LinkerFlag::Library(lib) => format!("{}.lib", lib),
            LinkerFlag::Output(path) => format!("/out:{}", path.display()),
            LinkerFlag::Subsystem(subsystem) => format!("/subsystem:{}", subsystem),
            LinkerFlag::Entry(entry) => format!("/entry:{}", entry),
            LinkerFlag::NoIncremental => "/incremental:no".to_string(),
            LinkerFlag::IgnoreWarning(code) => format!("/ignore:{}", code),
        };
        vec![arg]
    }

    fn command(&self, program: PathBuf, entry: &Path, flags: &FlagSet) -> CommandSpec {
        let mut cmd = CommandSpec::new(program);

        for flag in &flags.compiler {
            cmd = cmd.args(self.compiler_args(flag));
        }

        cmd = cmd.arg(entry.display().to_string());
        cmd = cmd.arg("/link");

        for flag in &flags.linker {
            cmd = cmd.args(self.linker_args(flag));
        }

        cmd
    }
}
