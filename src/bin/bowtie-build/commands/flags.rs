//! `bowtie-build flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use bowtie_build::builder::{compose_flags, invocation_for};

pub fn execute(args: FlagsArgs) -> Result<()> {
    let settings = super::project_settings();
    let config = args.config.resolve(&args.positional, &settings);

    let flags = compose_flags(&config)?;
    let invocation = invocation_for(&config, &flags)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&invocation)?);
        return Ok(());
    }

    println!("# {} {} build", config.platform, config.mode);

    if let Some(setup) = &invocation.setup {
        println!("# Environment setup:");
        println!("  \"{}\" {}", setup.script.display(), setup.arch);
    }

    println!("# Compile and link:");
    println!("  {}", invocation.compile.display());

    Ok(())
}
