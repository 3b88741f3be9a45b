//! Module and package discovery, plus name validation.
//!
//! A *module* is a top-level directory of the dotfiles root. Inside it,
//! every subdirectory except the reserved copy-only directory is a
//! *package* whose depth-1 entries are symlinked into `$HOME`.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::error::InstallError;

/// Reserved name of a module's copy-only directory.
pub const COPY_DIR: &str = "copy";

/// Marker file excluded from package walks and copy-only materialisation.
/// Keeps otherwise-empty directories under version control.
pub const IGNORE_MARKER: &str = ".keep";

/// Validate a module or package name before it touches the filesystem.
///
/// Rejects traversal sequences (`..`), absolute paths (leading `/`), and
/// Windows-style roots (leading `\`).
///
/// # Errors
///
/// Returns [`InstallError::InvalidName`] if the name is unsafe.
pub fn validate_name(name: &str) -> Result<(), InstallError> {
    if name.contains("..") || name.starts_with('/') || name.starts_with('\\') {
        return Err(InstallError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A discovered module: a named directory under the dotfiles root.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name as requested on the command line.
    pub name: String,
    /// Absolute path of the module directory.
    pub dir: PathBuf,
}

impl Module {
    /// Locate a module directory under `root`. Returns `None` when the
    /// directory does not exist (a non-fatal condition; the orchestrator
    /// warns and skips).
    #[must_use]
    pub fn locate(root: &Path, name: &str) -> Option<Self> {
        let dir = root.join(name);
        dir.is_dir().then(|| Self {
            name: name.to_string(),
            dir,
        })
    }

    /// The module's copy-only directory, if present.
    #[must_use]
    pub fn copy_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.join(COPY_DIR);
        dir.is_dir().then_some(dir)
    }

    /// List the module's package names: every subdirectory except the
    /// copy-only directory and hidden entries, sorted for deterministic
    /// processing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the module directory cannot be read.
    pub fn packages(&self) -> Result<Vec<String>> {
        let mut packages = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("reading module directory {}", self.dir.display()))?
        {
            let entry =
                entry.with_context(|| format!("reading entry in {}", self.dir.display()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name == COPY_DIR || name.starts_with('.') {
                continue;
            }
            if entry.path().is_dir() {
                packages.push(name);
            }
        }
        packages.sort();
        Ok(packages)
    }

    /// Absolute path of a package directory within this module.
    #[must_use]
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.dir.join(package)
    }
}

/// List available module names: subdirectories of the dotfiles root,
/// excluding hidden entries, sorted.
///
/// # Errors
///
/// Returns an error if the root directory cannot be read.
pub fn list_modules(root: &Path) -> Result<Vec<String>> {
    let mut modules = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("reading dotfiles root {}", root.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if entry.path().is_dir() {
            modules.push(name);
        }
    }
    modules.sort();
    Ok(modules)
}
