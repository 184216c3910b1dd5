//! The build pipeline.
//!
//! ```text
//! Start -> GeneratingHeader -> FlagsComposed -> Invoking -> Built -> Done
//!                                                                 \-> Running
//! ```
//!
//! Any error moves the build to `Failed` and stops it. Nothing after the
//! failing step runs, so the toolchain never sees a stale or missing header.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::builder::errors::BuildError;
use crate::builder::flags::compose_flags;
use crate::builder::toolchain::{
    invocation_for, run_command, CommandSpec, SetupOutcome, ToolStatus, Toolchain,
    ToolchainInvocation,
};
use crate::core::BuildConfig;
use crate::unity::{write_unity_header, FolderWhitelist, UnityHeader};
use crate::util::fs::normalize_path;
use crate::util::shell::{format_duration, Shell, Status};

/// Stages of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Start,
    GeneratingHeader,
    FlagsComposed,
    Invoking,
    Built,
    /// Terminal: built, no run requested.
    Done,
    /// Terminal: built and the binary was launched.
    Running,
    /// Terminal: a step failed.
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Start => "start",
            BuildStage::GeneratingHeader => "generating-header",
            BuildStage::FlagsComposed => "flags-composed",
            BuildStage::Invoking => "invoking",
            BuildStage::Built => "built",
            BuildStage::Done => "done",
            BuildStage::Running => "running",
            BuildStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub header: UnityHeader,
    pub invocation: ToolchainInvocation,
    /// Stages visited, in order.
    pub stages: Vec<BuildStage>,
    /// Status of the launched binary, if it was run and could be started.
    pub run_status: Option<ToolStatus>,
}

impl BuildReport {
    pub fn final_stage(&self) -> BuildStage {
        self.stages.last().copied().unwrap_or(BuildStage::Start)
    }
}

/// Drives one build from header generation to the optional run.
pub struct Orchestrator<'a> {
    config: &'a BuildConfig,
    toolchain: &'a dyn Toolchain,
    shell: &'a Shell,
    stages: Vec<BuildStage>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a BuildConfig, toolchain: &'a dyn Toolchain, shell: &'a Shell) -> Self {
        Orchestrator {
            config,
            toolchain,
            shell,
            stages: vec![BuildStage::Start],
        }
    }

    /// Run the build to completion.
    pub fn run(mut self) -> Result<BuildReport, BuildError> {
        match self.execute() {
            Ok((header, invocation, run_status)) => Ok(BuildReport {
                header,
                invocation,
                stages: self.stages,
                run_status,
            }),
            Err(err) => {
                self.enter(BuildStage::Failed);
                Err(err)
            }
        }
    }

    fn enter(&mut self, stage: BuildStage) {
        tracing::debug!("build stage: {}", stage);
        self.stages.push(stage);
    }

    fn execute(
        &mut self,
    ) -> Result<(UnityHeader, ToolchainInvocation, Option<ToolStatus>), BuildError> {
        let start = Instant::now();

        self.enter(BuildStage::GeneratingHeader);
        let header = self.generate_header()?;

        let flags = compose_flags(self.config)?;
        let mut invocation = invocation_for(self.config, &flags)?;
        self.enter(BuildStage::FlagsComposed);

        self.ensure_output_dir()?;

        self.enter(BuildStage::Invoking);
        invocation.compile = self.compile(&invocation)?;
        self.enter(BuildStage::Built);

        self.shell.status(
            Status::Finished,
            format!(
                "{} build of {} in {}",
                self.config.mode,
                self.config.executable_path().display(),
                format_duration(start.elapsed())
            ),
        );

        let run_status = if self.config.run {
            self.enter(BuildStage::Running);
            self.run_binary()
        } else {
            self.enter(BuildStage::Done);
            None
        };

        Ok((header, invocation, run_status))
    }

    fn generate_header(&self) -> Result<UnityHeader, BuildError> {
        let output = self.config.unity_header_path();
        self.shell.status(
            Status::Generating,
            format!("unity build source include {}", output.display()),
        );

        let whitelist = FolderWhitelist::with_extras(self.config.extra_folders.iter().cloned());
        let header = write_unity_header(
            &self.config.source_dir,
            &output,
            &whitelist,
            self.config.include_order,
        )?;

        self.shell.verbose(format!("{} source files included", header.files.len()));
        Ok(header)
    }

    fn ensure_output_dir(&self) -> Result<(), BuildError> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| BuildError::OutputDirectory {
            dir: dir.clone(),
            source,
        })
    }

    /// Run environment setup (if any) and the compiler. Returns the compile
    /// command as actually executed.
    fn compile(&self, invocation: &ToolchainInvocation) -> Result<CommandSpec, BuildError> {
        let mut compile = invocation.compile.clone();

        if let Some(ref setup) = invocation.setup {
            self.shell.status(
                Status::Preparing,
                format!("build environment ({} {})", setup.script.display(), setup.arch),
            );

            let failure = |reason: String| BuildError::EnvironmentSetup {
                script: setup.script.clone(),
                reason,
            };
            match self.toolchain.setup_environment(setup) {
                Ok(SetupOutcome::Ready(env)) => compile = compile.envs(env),
                Ok(SetupOutcome::Failed(status)) => return Err(failure(status.to_string())),
                Err(e) => return Err(failure(format!("{:#}", e))),
            }
        }

        let program = compile.program.display().to_string();
        self.shell.status(
            Status::Compiling,
            format!(
                "{} ({}, {})",
                self.config.entry_source_path().display(),
                self.config.platform,
                self.config.mode
            ),
        );
        self.shell.verbose(compile.display());

        let status = self.toolchain.invoke(&compile).map_err(|e| {
            BuildError::ToolchainUnavailable {
                program: program.clone(),
                reason: format!("{:#}", e),
            }
        })?;

        if !status.success() {
            return Err(BuildError::Toolchain { program, status });
        }

        Ok(compile)
    }

    /// Best-effort: failures are reported, never escalated.
    fn run_binary(&self) -> Option<ToolStatus> {
        let dir: PathBuf = normalize_path(&self.config.output_dir);
        let cmd = run_command(self.config.platform, &dir);
        self.shell.status(Status::Running, cmd.program.display());

        match self.toolchain.invoke(&cmd) {
            Ok(status) => {
                if !status.success() {
                    self.shell
                        .warn(format!("`{}` exited with {}", cmd.program.display(), status));
                }
                Some(status)
            }
            Err(e) => {
                self.shell
                    .warn(format!("could not run `{}`: {:#}", cmd.program.display(), e));
                None
            }
        }
    }
}
