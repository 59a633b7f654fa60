// Config File Path Resolution

use std::path::{Path, PathBuf};

const CONFIG_DIR_ENV: &str = "UNEVENTFUL_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "./config";

/// Root directory holding tasks.yaml, sms.yml and admins.yaml
#[derive(Debug, Clone)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve from UNEVENTFUL_CONFIG_DIR (default: ./config)
    pub fn from_env() -> Self {
        let root = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::new(shellexpand::tilde(&root).into_owned())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.root.join("tasks.yaml")
    }

    pub fn sms_path(&self) -> PathBuf {
        self.root.join("sms.yml")
    }

    pub fn admins_path(&self) -> PathBuf {
        self.root.join("admins.yaml")
    }
}
