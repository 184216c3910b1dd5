//! Build failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::toolchain::ToolStatus;
use crate::core::TargetPlatform;
use crate::unity::GenerateError;

/// A fatal build error. Every variant aborts the build with exit code 1.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to create the unity build source include")]
    HeaderGeneration(#[from] GenerateError),

    #[error(
        "the {platform} build links `{library}` but no library root is configured \
         (set BOWTIE_LIBS or pass --libs-dir)"
    )]
    MissingLibraryRoot {
        platform: TargetPlatform,
        library: &'static str,
    },

    #[error(
        "no Visual Studio tools directory is configured \
         (set VS110COMNTOOLS or pass --vs-tools)"
    )]
    MissingSetupScript,

    #[error("failed to create output directory `{}`", .dir.display())]
    OutputDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build environment setup via `{}` failed: {reason}", .script.display())]
    EnvironmentSetup { script: PathBuf, reason: String },

    #[error("could not run `{program}`: {reason}")]
    ToolchainUnavailable { program: String, reason: String },

    #[error("`{program}` failed with {status}")]
    Toolchain { program: String, status: ToolStatus },
}
