//! `bowtie-build build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use bowtie_build::builder::{Orchestrator, ProcessToolchain};
use bowtie_build::util::Shell;

pub fn execute(args: BuildArgs, shell: &Shell) -> Result<()> {
    let settings = super::project_settings();
    let config = args.config.resolve(&args.positional, &settings);
    tracing::debug!("resolved build configuration: {:?}", config);

    let report = Orchestrator::new(&config, &ProcessToolchain, shell).run()?;

    if let Some(status) = report.run_status {
        tracing::debug!("{} exited with {}", config.platform.executable_name(), status);
    }

    Ok(())
}
