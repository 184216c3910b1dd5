//! Test utilities and mocks for unit tests.
//!
//! [`MockToolchain`] stands in for the real compiler so the build pipeline
//! can be exercised without spawning processes. It records every call and
//! replays scripted exit statuses.

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::toolchain::{
    CommandSpec, EnvironmentSetup, SetupOutcome, ToolStatus, Toolchain,
};

// Re-export fixtures for convenience
pub use fixtures::*;

/// A call received by [`MockToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Setup(EnvironmentSetup),
    Invoke(CommandSpec),
}

/// Scripted behavior for environment setup.
#[derive(Debug, Clone)]
pub enum MockSetup {
    /// Succeed with these variables.
    Ready(Vec<(String, String)>),
    /// Complete with a non-zero exit code.
    Failed(i32),
    /// Fail to start.
    Error,
}

/// Recording toolchain with scripted results.
///
/// Invocations consume scripted exit codes in order; once the script runs
/// out every invocation succeeds.
#[derive(Debug)]
pub struct MockToolchain {
    setup: MockSetup,
    statuses: Mutex<VecDeque<i32>>,
    unavailable: bool,
    calls: Mutex<Vec<MockCall>>,
}

impl MockToolchain {
    /// A toolchain where everything succeeds.
    pub fn new() -> Self {
        MockToolchain {
            setup: MockSetup::Ready(Vec::new()),
            statuses: Mutex::new(VecDeque::new()),
            unavailable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the exit codes of successive invocations.
    pub fn with_statuses(self, codes: impl IntoIterator<Item = i32>) -> Self {
        *self.statuses.lock().unwrap() = codes.into_iter().collect();
        self
    }

    /// Script the environment setup result.
    pub fn with_setup(mut self, setup: MockSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Make every invocation fail to start.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for MockToolchain {
    fn setup_environment(&self, setup: &EnvironmentSetup) -> Result<SetupOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push(MockCall::Setup(setup.clone()));

        match &self.setup {
            MockSetup::Ready(env) => Ok(SetupOutcome::Ready(env.clone())),
            MockSetup::Failed(code) => Ok(SetupOutcome::Failed(ToolStatus::from_code(*code))),
            MockSetup::Error => bail!("mock: `{}` could not be started", setup.script.display()),
        }
    }

    fn invoke(&self, cmd: &CommandSpec) -> Result<ToolStatus> {
        self.calls.lock().unwrap().push(MockCall::Invoke(cmd.clone()));

        if self.unavailable {
            bail!("mock: `{}` was not found in PATH", cmd.program.display());
        }

        let code = self.statuses.lock().unwrap().pop_front().unwrap_or(0);
        Ok(ToolStatus::from_code(code))
    }
}
