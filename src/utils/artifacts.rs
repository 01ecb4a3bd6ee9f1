//! Layout of a trained model directory

use std::path::{Path, PathBuf};

/// Weights file stem; the recorder adds the `.mpk` extension
pub const MODEL_STEM: &str = "model";
pub const SCALER_FILE: &str = "scaler.json";
pub const CONFIG_FILE: &str = "config.toml";

/// Paths of everything `train` writes and `predict` reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model weights path without extension
    pub fn model(&self) -> PathBuf {
        self.root.join(MODEL_STEM)
    }

    pub fn scaler(&self) -> PathBuf {
        self.root.join(SCALER_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Create the directory if needed
    pub fn create_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_layout() {
        let paths = ArtifactPaths::new("out");
        assert_eq!(paths.model(), Path::new("out").join("model"));
        assert_eq!(paths.scaler(), Path::new("out").join("scaler.json"));
        assert_eq!(paths.config(), Path::new("out").join("config.toml"));
    }

    #[test]
    fn test_create_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("nested").join("run"));
        paths.create_dir().unwrap();
        assert!(paths.root().is_dir());
    }
}
