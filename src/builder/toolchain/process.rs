//! Toolchain backed by real subprocesses.

use std::io::Write;

use anyhow::{bail, Context, Result};

use crate::util::process::{find_executable, is_bare_command, ProcessBuilder};

use super::{CommandSpec, EnvironmentSetup, SetupOutcome, ToolStatus, Toolchain};

/// Variables carried from a `vcvarsall.bat` environment into the compile step.
const CAPTURED_VARIABLES: [&str; 5] = ["PATH", "INCLUDE", "LIB", "LIBPATH", "VSCMD_ARG_TGT_ARCH"];

/// Runs toolchain commands as child processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolchain;

impl Toolchain for ProcessToolchain {
    fn setup_environment(&self, setup: &EnvironmentSetup) -> Result<SetupOutcome> {
        tracing::debug!(
            "setting up build environment via {} {}",
            setup.script.display(),
            setup.arch
        );

        // A temporary batch file avoids cmd.exe quoting issues with the
        // script path.
        let mut batch = tempfile::Builder::new()
            .prefix("bowtie_vcvars")
            .suffix(".bat")
            .tempfile()
            .context("failed to create temporary batch file")?;
        write!(
            batch,
            "@echo off\r\ncall \"{}\" {} >nul 2>&1\r\nif errorlevel 1 exit /b 1\r\nset\r\n",
            setup.script.display(),
            setup.arch
        )
        .context("failed to write temporary batch file")?;
        let batch = batch.into_temp_path();

        let output = ProcessBuilder::new("cmd").arg("/c").arg(&*batch).exec()?;
        if !output.status.success() {
            tracing::debug!(
                "environment setup failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            return Ok(SetupOutcome::Failed(output.status.into()));
        }

        let env = parse_environment(&String::from_utf8_lossy(&output.stdout));
        if !env.iter().any(|(key, value)| key == "PATH" && !value.is_empty()) {
            bail!(
                "`{}` produced an empty PATH; the MSVC environment is not configured",
                setup.script.display()
            );
        }

        Ok(SetupOutcome::Ready(env))
    }

    fn invoke(&self, cmd: &CommandSpec) -> Result<ToolStatus> {
        // A PATH override means lookup happens against the child's PATH.
        if is_bare_command(&cmd.program) && cmd.env_var("PATH").is_none() {
            let name = cmd.program.to_string_lossy();
            if find_executable(&name).is_none() {
                bail!("`{}` was not found in PATH", name);
            }
        }

        let mut builder = ProcessBuilder::new(&cmd.program).args(&cmd.args);
        for (key, value) in &cmd.env {
            builder = builder.env(key, value);
        }
        if let Some(ref cwd) = cmd.cwd {
            builder = builder.cwd(cwd);
        }

        tracing::debug!("running {}", builder.display_command());
        let status = builder.status()?;
        Ok(status.into())
    }
}

/// Parse `set` output into the variables the compile step needs.
///
/// Keys are upper-cased; Windows reports `Path` but lookups expect `PATH`.
pub fn parse_environment(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_uppercase(), value.trim_end().to_string()))
        .filter(|(key, _)| CAPTURED_VARIABLES.contains(&key.as_str()))
        .collect()
}
