//! Child process plumbing for the toolchain.
//!
//! [`ProcessBuilder`] is what `ProcessToolchain` lowers a `CommandSpec` into.
//! The compiler and the built binary run with inherited stdio through
//! [`ProcessBuilder::status`], so diagnostics reach the terminal unchanged.
//! The `vcvarsall.bat` environment capture needs the output and uses
//! [`ProcessBuilder::exec`].

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

/// A compiler, setup script or built binary waiting to be spawned.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    /// Kept as `OsString` so non-UTF-8 paths reach the child intact.
    args: Vec<OsString>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Overlay a variable on the inherited environment. Used to inject the
    /// captured MSVC `PATH`/`INCLUDE`/`LIB`.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run to completion with stdout and stderr captured.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Run to completion with inherited stdio. `Err` only when the program
    /// could not be spawned.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// The command line as echoed by `--verbose` and debug logs.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Resolve a compiler name such as `clang++` or `cl.exe` against `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// `clang++` is bare; `./clang++` and `/usr/bin/clang++` are not. Only bare
/// names are checked against `PATH` before spawning.
pub fn is_bare_command(program: &Path) -> bool {
    program.components().count() == 1 && !program.is_absolute()
}
