//! Toolchain abstraction.
//!
//! Turning a [`FlagSet`] into a concrete command line is the job of a
//! [`Driver`] (clang or MSVC syntax). Running commands is the job of a
//! [`Toolchain`], which only ever reports exit statuses back to the caller.
//! [`ProcessToolchain`] spawns real processes; tests substitute a mock.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::Result;
use serde::Serialize;

use crate::builder::errors::BuildError;
use crate::builder::flags::{CompilerFlag, FlagSet, LinkerFlag};
use crate::core::{BuildConfig, TargetPlatform};

mod clang;
mod msvc;
mod process;

pub use clang::ClangDriver;
pub use msvc::MsvcDriver;
pub use process::{parse_environment, ProcessToolchain};

/// Architecture argument passed to `vcvarsall.bat`.
pub const VCVARS_ARCH: &str = "amd64";

/// A command to execute, with program, arguments, environment and working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "clang++", "cl.exe")
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Environment variables to set on top of the inherited environment
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Look up an environment override.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The command line as a single string, for display.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Exit status of a toolchain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn from_code(code: i32) -> Self {
        ToolStatus { code: Some(code) }
    }

    pub fn ok() -> Self {
        Self::from_code(0)
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        ToolStatus {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("termination by signal"),
        }
    }
}

/// Native build environment setup that must precede compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSetup {
    pub script: PathBuf,
    pub arch: String,
}

impl EnvironmentSetup {
    /// `vcvarsall.bat` located relative to a Visual Studio common tools
    /// directory (`<tools>/../../VC/vcvarsall.bat`).
    pub fn vcvarsall(tools_dir: &Path) -> Self {
        EnvironmentSetup {
            script: tools_dir
                .join("..")
                .join("..")
                .join("VC")
                .join("vcvarsall.bat"),
            arch: VCVARS_ARCH.to_string(),
        }
    }
}

/// Result of running an environment setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Setup succeeded; these variables must be applied to the compile step.
    Ready(Vec<(String, String)>),
    Failed(ToolStatus),
}

/// The concrete commands for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInvocation {
    pub setup: Option<EnvironmentSetup>,
    pub compile: CommandSpec,
}

/// Capability to run toolchain commands.
pub trait Toolchain {
    /// Run a native environment setup and capture the resulting environment.
    fn setup_environment(&self, setup: &EnvironmentSetup) -> Result<SetupOutcome>;

    /// Run a command to completion and report its exit status.
    ///
    /// `Err` means the command could not be started at all.
    fn invoke(&self, cmd: &CommandSpec) -> Result<ToolStatus>;
}

/// Renders typed flags in a specific compiler's command-line syntax.
pub trait Driver {
    fn compiler_args(&self, flag: &CompilerFlag) -> Vec<String>;

    fn linker_args(&self, flag: &LinkerFlag) -> Vec<String>;

    /// Full single-step compile-and-link command for `entry`.
    fn command(&self, program: PathBuf, entry: &Path, flags: &FlagSet) -> CommandSpec;
}

/// Build the invocation for `config` from already-composed flags.
pub fn invocation_for(
    config: &BuildConfig,
    flags: &FlagSet,
) -> Result<ToolchainInvocation, BuildError> {
    let program = config.compiler_program();
    let entry = config.entry_source_path();

    match config.platform {
        TargetPlatform::X11 => Ok(ToolchainInvocation {
            setup: None,
            compile: ClangDriver.command(program, &entry, flags),
        }),
        TargetPlatform::Windows => {
            let tools_dir = config
                .vs_tools_dir
                .as_deref()
                .ok_or(BuildError::MissingSetupScript)?;
            Ok(ToolchainInvocation {
                setup: Some(EnvironmentSetup::vcvarsall(tools_dir)),
                compile: MsvcDriver.command(program, &entry, flags),
            })
        }
    }
}

/// Command that launches the built executable from `output_dir`.
pub fn run_command(platform: TargetPlatform, output_dir: &Path) -> CommandSpec {
    CommandSpec::new(output_dir.join(platform.executable_name())).cwd(output_dir)
}
