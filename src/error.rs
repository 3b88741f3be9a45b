//! Domain-specific error types for the installer.
//!
//! Internal modules return [`InstallError`] while the binary boundary
//! converts to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Containment policy
//!
//! `InvalidName` (for package names discovered on disk), `Backup`, `Copy`,
//! `Verification` and `ModuleNotFound` are contained at the package or
//! module level — logged, counted, and processing continues with the next
//! unit. `LinkInstall` and `Usage` (which covers invalid *requested*
//! module names) are fatal and terminate the whole run with exit code 1.

use thiserror::Error;

/// Error type covering every failure mode of the installer.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A module or package name contains a traversal sequence or an
    /// absolute-path marker.
    #[error("invalid name '{0}': path traversal or absolute path not allowed")]
    InvalidName(String),

    /// A requested module has no directory under the dotfiles root.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// Backup of a pre-existing target failed (directory creation, copy,
    /// or removal).
    #[error("backup failed for {path}: {detail}")]
    Backup {
        /// The target path that could not be backed up.
        path: String,
        /// Human-readable description of the underlying failure.
        detail: String,
    },

    /// An individual copy-only file or directory could not be copied.
    #[error("copy failed for {path}: {detail}")]
    Copy {
        /// The path that could not be copied.
        path: String,
        /// Human-readable description of the underlying failure.
        detail: String,
    },

    /// The external link-farm invocation failed. Fatal for the whole run.
    #[error("link installation failed for package '{package}': {detail}")]
    LinkInstall {
        /// The package whose links could not be installed.
        package: String,
        /// Stderr or error description from the link-farm tool.
        detail: String,
    },

    /// Post-install verification found missing or dangling links.
    #[error("verification failed for package '{package}': {broken} broken, {missing} missing")]
    Verification {
        /// The package that failed verification.
        package: String,
        /// Number of dangling symbolic links.
        broken: usize,
        /// Number of entries that are not symbolic links at all.
        missing: usize,
    },

    /// Bad command-line invocation.
    #[error("usage error: {0}")]
    Usage(String),
}
