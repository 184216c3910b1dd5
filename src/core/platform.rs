//! The two supported target platforms.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target platform for a build.
///
/// Each platform owns a directory in the source tree that holds its entry
/// translation unit and receives the generated unity header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    /// Windows, built with MSVC (`cl.exe`).
    Windows,
    /// Linux/X11, built with clang.
    X11,
}

impl TargetPlatform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            TargetPlatform::Windows
        } else {
            TargetPlatform::X11
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Windows => "windows",
            TargetPlatform::X11 => "x11",
        }
    }

    /// Platform directory inside the source tree.
    pub fn source_subdir(&self) -> &'static str {
        match self {
            TargetPlatform::Windows => "bowtie_windows",
            TargetPlatform::X11 => "bowtie_linux",
        }
    }

    /// Entry translation unit, relative to the source root.
    pub fn entry_source(&self) -> PathBuf {
        let dir = self.source_subdir();
        PathBuf::from(dir).join(format!("{}.cpp", dir))
    }

    /// Generated unity header, relative to the source root.
    pub fn unity_header(&self) -> PathBuf {
        PathBuf::from(self.source_subdir()).join("source_include.h")
    }

    /// File name of the produced executable.
    pub fn executable_name(&self) -> &'static str {
        match self {
            TargetPlatform::Windows => "bowtie.exe",
            TargetPlatform::X11 => "bowtie",
        }
    }

    /// Default compiler driver for the platform.
    pub fn default_compiler(&self) -> &'static str {
        match self {
            TargetPlatform::Windows => "cl.exe",
            TargetPlatform::X11 => "clang++",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" | "msvc" => Ok(TargetPlatform::Windows),
            "x11" | "linux" => Ok(TargetPlatform::X11),
            _ => Err(format!(
                "unknown platform '{}'; expected 'windows' or 'x11'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_paths() {
        assert_eq!(
            TargetPlatform::X11.entry_source(),
            PathBuf::from("bowtie_linux").join("bowtie_linux.cpp")
        );
        assert_eq!(
            TargetPlatform::Windows.unity_header(),
            PathBuf::from("bowtie_windows").join("source_include.h")
        );
    }

    #[test]
    fn test_executable_names() {
        assert_eq!(TargetPlatform::X11.executable_name(), "bowtie");
        assert_eq!(TargetPlatform::Windows.executable_name(), "bowtie.exe");
    }

    #[test]
    fn test_parse() {
        assert_eq!("linux".parse::<TargetPlatform>().unwrap(), TargetPlatform::X11);
        assert_eq!("Windows".parse::<TargetPlatform>().unwrap(), TargetPlatform::Windows);
        assert!("macos".parse::<TargetPlatform>().is_err());
    }
}
