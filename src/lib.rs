//! bowtie-build - unity build orchestration for the bowtie application
//!
//! The build runs in two phases. First a single header that includes every
//! project source file is generated ([`unity`]). Then the platform toolchain
//! compiles the unity translation unit ([`builder`]).

pub mod builder;
pub mod core;
pub mod unity;
pub mod util;

/// Test utilities and mocks for unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, BuildReport, Orchestrator};
pub use core::{BuildConfig, BuildMode, TargetPlatform};
pub use unity::{write_unity_header, FolderWhitelist, IncludeOrder};
