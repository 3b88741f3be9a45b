//! Symlink state classification.
use std::path::{Path, PathBuf};

/// Observed state of a home path after link installation.
///
/// The three failure-relevant cases are mutually exclusive and exhaustive
/// for every top-level package entry: a target is either absent, a
/// symbolic link (valid or dangling), or a real file/directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// A symbolic link whose destination exists.
    Resolved(PathBuf),
    /// A symbolic link whose destination does not exist.
    Dangling(PathBuf),
    /// A real file or directory, not a symbolic link.
    NotALink,
    /// Nothing exists at the path.
    Absent,
}

/// Classify the path at `target`.
#[must_use]
pub fn link_state(target: &Path) -> LinkState {
    match std::fs::read_link(target) {
        Ok(dest) => {
            // `exists()` follows the link, so a dead destination reads as
            // absent even though the link itself is present.
            if target.exists() {
                LinkState::Resolved(dest)
            } else {
                LinkState::Dangling(dest)
            }
        }
        Err(_) => {
            if target.symlink_metadata().is_ok() {
                LinkState::NotALink
            } else {
                LinkState::Absent
            }
        }
    }
}
