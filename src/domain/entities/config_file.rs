//! Config file entity

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of a config file inside a unit's staging tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Stable path relative to the unit's staging root, `/`-separated
    pub identity: String,
    /// Absolute location on disk
    pub path: PathBuf,
}

/// A config file with its raw content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub identity: String,
    pub path: PathBuf,
    pub content: String,
}

impl ConfigFile {
    pub fn new(file: FileRef, content: impl Into<String>) -> Self {
        Self {
            identity: file.identity,
            path: file.path,
            content: content.into(),
        }
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef {
            identity: self.identity.clone(),
            path: self.path.clone(),
        }
    }

    /// Same file with different content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            identity: self.identity.clone(),
            path: self.path.clone(),
            content: content.into(),
        }
    }
}

/// Convert a relative path to a `/`-separated identity
pub fn identity_from_relative(relative: &std::path::Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn identity_uses_forward_slashes() {
        let rel = Path::new("app").join("settings").join("unit.config");
        assert_eq!(identity_from_relative(&rel), "app/settings/unit.config");
    }

    #[test]
    fn with_content_keeps_location() {
        let file = ConfigFile::new(
            FileRef {
                identity: "unit.config".into(),
                path: PathBuf::from("/staging/621001/unit.config"),
            },
            "{}",
        );
        let updated = file.with_content("{\"a\":1}");
        assert_eq!(updated.path, file.path);
        assert_eq!(updated.content, "{\"a\":1}");
    }
}
