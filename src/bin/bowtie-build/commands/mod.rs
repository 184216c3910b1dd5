//! Command implementations

pub mod build;
pub mod completions;
pub mod flags;
pub mod header;

use std::path::Path;

use bowtie_build::util::config::PROJECT_SETTINGS;
use bowtie_build::util::Settings;

/// Project settings from the working directory, if any.
fn project_settings() -> Settings {
    Settings::load_or_default(Path::new(PROJECT_SETTINGS))
}
