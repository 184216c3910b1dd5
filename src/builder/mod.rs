//! Build orchestration: flag composition, toolchain invocation and the
//! build pipeline that ties them to unity header generation.

pub mod errors;
pub mod flags;
pub mod orchestrator;
pub mod toolchain;

pub use errors::BuildError;
pub use flags::{compose_flags, CompilerFlag, FlagSet, LinkerFlag};
pub use orchestrator::{BuildReport, BuildStage, Orchestrator};
pub use toolchain::{
    invocation_for, CommandSpec, ProcessToolchain, ToolStatus, Toolchain, ToolchainInvocation,
};
