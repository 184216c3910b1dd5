//! Core data structures for bowtie-build.
//!
//! - Target platforms and their fixed source layout
//! - Build modes, dependency revisions and the resolved [`BuildConfig`]

pub mod config;
pub mod platform;

pub use config::{
    run_requested, BuildConfig, BuildMode, DependencySet, ExternalLibrary,
    LibraryVariantMapping,
};
pub use platform::TargetPlatform;
