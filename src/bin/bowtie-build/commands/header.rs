//! `bowtie-build header` command
//!
//! Standalone unity header generation, without compiling anything.

use anyhow::Result;

use crate::cli::HeaderArgs;
use bowtie_build::unity::{write_unity_header, FolderWhitelist};
use bowtie_build::util::shell::{Shell, Status};

pub fn execute(args: HeaderArgs, shell: &Shell) -> Result<()> {
    let whitelist = FolderWhitelist::with_extras(args.extra_folders);

    let header = write_unity_header(&args.root, &args.output, &whitelist, args.order)?;

    shell.status(
        Status::Generated,
        format!(
            "{} ({} source files from {})",
            header.path.display(),
            header.files.len(),
            whitelist.folders().join(", ")
        ),
    );

    Ok(())
}
