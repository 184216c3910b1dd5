//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bowtie_build::core::{
    run_requested, BuildConfig, BuildMode, DependencySet, LibraryVariantMapping, TargetPlatform,
};
use bowtie_build::unity::IncludeOrder;
use bowtie_build::util::shell::ColorChoice;
use bowtie_build::util::Settings;

/// bowtie-build - unity build orchestration for the bowtie application
#[derive(Parser)]
#[command(name = "bowtie-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the unity header and compile the application
    Build(BuildArgs),

    /// Generate a unity build source include header
    Header(HeaderArgs),

    /// Show the toolchain commands a build would run
    Flags(FlagsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Configuration shared by every command that composes a build.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Target platform: windows or x11 (defaults to the host)
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<TargetPlatform>,

    /// Root of the application source tree
    #[arg(long, env = "BOWTIE_SOURCE", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Root of the prebuilt third-party libraries
    #[arg(long, env = "BOWTIE_LIBS", value_name = "DIR")]
    pub libs_dir: Option<PathBuf>,

    /// Directory receiving the executable [default: bin]
    #[arg(long, env = "BOWTIE_OUTPUT", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Visual Studio common tools directory (locates vcvarsall.bat)
    #[arg(long, env = "VS110COMNTOOLS", value_name = "DIR")]
    pub vs_tools: Option<PathBuf>,

    /// Compiler program to use instead of the platform default
    #[arg(long, value_name = "PROGRAM")]
    pub cc: Option<PathBuf>,

    /// Extra folder for the unity build (repeatable) [default: opengl_renderer]
    #[arg(long = "extra-folder", value_name = "NAME")]
    pub extra_folders: Vec<String>,

    /// Include order in the unity header: sorted or filesystem
    #[arg(long, value_name = "ORDER")]
    pub order: Option<IncludeOrder>,

    /// External library revision: luajit or none
    #[arg(long, value_name = "SET")]
    pub dependencies: Option<DependencySet>,

    /// Library variant per build mode: matching or inverted
    #[arg(long, value_name = "MAPPING")]
    pub library_variants: Option<LibraryVariantMapping>,
}

impl ConfigArgs {
    /// Resolve the build configuration.
    ///
    /// Precedence: command line, then environment (both handled by clap),
    /// then the settings file, then built-in defaults.
    pub fn resolve(&self, positional: &[String], settings: &Settings) -> BuildConfig {
        let platform = self
            .platform
            .or(settings.build.platform)
            .unwrap_or_else(TargetPlatform::host);
        let source_dir = self
            .source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = BuildConfig::new(platform, source_dir);
        config.mode = BuildMode::from_positional(positional);
        config.run = run_requested(positional);
        config.libs_dir = self.libs_dir.clone();
        config.vs_tools_dir = self.vs_tools.clone();

        if let Some(dir) = self
            .output_dir
            .clone()
            .or_else(|| settings.build.output_dir.clone())
        {
            config.output_dir = dir;
        }
        if !self.extra_folders.is_empty() {
            config.extra_folders = self.extra_folders.clone();
        } else if let Some(ref folders) = settings.header.extra_folders {
            config.extra_folders = folders.clone();
        }
        if let Some(order) = self.order.or(settings.header.order) {
            config.include_order = order;
        }
        if let Some(deps) = self.dependencies.or(settings.build.dependencies) {
            config.dependencies = deps;
        }
        if let Some(mapping) = self.library_variants.or(settings.build.library_variants) {
            config.library_variants = mapping;
        }
        config.compiler = self.cc.clone().or_else(|| settings.build.cc.clone());

        config
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// `release` selects a release build; `run` in either slot runs the
    /// binary after a successful build
    #[arg(value_name = "MODE|run", num_args = 0..=2)]
    pub positional: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct HeaderArgs {
    /// Header file to write; its directory must already exist
    pub output: PathBuf,

    /// Folders to include in addition to base, engine, game and os
    pub extra_folders: Vec<String>,

    /// Source tree to scan
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Include order: sorted or filesystem
    #[arg(long, default_value = "sorted", value_name = "ORDER")]
    pub order: IncludeOrder,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// `release` selects release flags
    #[arg(value_name = "MODE", num_args = 0..=2)]
    pub positional: Vec<String>,

    /// Print the invocation as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
