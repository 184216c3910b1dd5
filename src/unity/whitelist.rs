//! Top-level folders that take part in the unity build.

/// Folders that are always part of the unity build.
pub const DEFAULT_FOLDERS: [&str; 4] = ["base", "engine", "game", "os"];

/// Ordered, de-duplicated set of folder names used to select sources.
///
/// Selection is a plain prefix test on the relative path, so `os` also
/// selects files under a sibling such as `osx/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderWhitelist {
    folders: Vec<String>,
}

impl FolderWhitelist {
    /// The default folder set.
    pub fn defaults() -> Self {
        let mut whitelist = FolderWhitelist {
            folders: Vec::with_capacity(DEFAULT_FOLDERS.len()),
        };
        for folder in DEFAULT_FOLDERS {
            whitelist.push(folder);
        }
        whitelist
    }

    /// The default folder set plus `extras`, in the order given.
    pub fn with_extras<I, S>(extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut whitelist = Self::defaults();
        for extra in extras {
            whitelist.push(extra);
        }
        whitelist
    }

    /// Add a folder. Returns false if it was empty or already present.
    ///
    /// An empty name would be a prefix of every path, so it is rejected.
    pub fn push(&mut self, folder: impl Into<String>) -> bool {
        let folder = folder.into();
        if folder.is_empty() {
            tracing::warn!("ignoring empty folder name in unity build whitelist");
            return false;
        }
        if self.folders.contains(&folder) {
            return false;
        }
        self.folders.push(folder);
        true
    }

    /// Whether a forward-slash relative path falls under a whitelisted folder.
    pub fn matches(&self, relative: &str) -> bool {
        self.folders
            .iter()
            .any(|folder| relative.starts_with(folder.as_str()))
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }
}

impl Default for FolderWhitelist {
    fn default() -> Self {
        Self::defaults()
    }
}
