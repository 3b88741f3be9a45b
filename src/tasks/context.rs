//! Shared run context threaded through every pipeline step.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::exec::Executor;
use crate::logging::Log;

/// Name of the backup root directory under `$HOME`.
pub const BACKUP_ROOT: &str = ".dotmod-backup";

/// Shared context for pipeline execution.
///
/// All accumulation (backup counts, per-unit results) is owned by the
/// orchestrator and updated via return values from the steps; the context
/// itself is immutable for the duration of a run.
pub struct Context {
    /// Root directory of the dotfiles tree (contains the modules).
    pub root: PathBuf,
    /// User's home directory path.
    pub home: PathBuf,
    /// Run-wide backup timestamp, `YYYYMMDDHHMMSS`.
    ///
    /// Second granularity means two runs starting within the same second
    /// share a backup directory; a known limitation inherited from the
    /// original design.
    pub timestamp: String,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Logger for output and unit recording.
    pub log: Arc<dyn Log>,
    /// Command executor for the link-farm delegation.
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("home", &self.home)
            .field("timestamp", &self.timestamp)
            .field("dry_run", &self.dry_run)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for a run, reading the home directory from
    /// the environment and fixing the backup timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME environment variable is not set.
    pub fn new(
        root: PathBuf,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;

        Ok(Self {
            root,
            home: PathBuf::from(home),
            timestamp: run_timestamp(),
            dry_run,
            log,
            executor,
        })
    }

    /// Backup directory for this run: `$HOME/.dotmod-backup/<timestamp>`.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.home.join(BACKUP_ROOT).join(&self.timestamp)
    }

    /// Home path a top-level package entry maps to.
    #[must_use]
    pub fn home_target(&self, entry_name: &std::ffi::OsStr) -> PathBuf {
        self.home.join(entry_name)
    }

    /// Home path a copy-only entry maps to, preserving its path relative
    /// to the copy-only directory.
    #[must_use]
    pub fn home_target_rel(&self, rel: &Path) -> PathBuf {
        self.home.join(rel)
    }
}

/// Format the current local time as `YYYYMMDDHHMMSS`, the run-wide backup
/// namespace (matching `date +%Y%m%d%H%M%S`).
#[must_use]
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::make_context;

    #[test]
    fn run_timestamp_has_correct_shape() {
        let ts = run_timestamp();
        assert_eq!(ts.len(), 14, "YYYYMMDDHHMMSS should be 14 chars");
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn backup_dir_is_namespaced_by_timestamp() {
        let (ctx, _tmp) = make_context();
        assert_eq!(
            ctx.backup_dir(),
            ctx.home.join(BACKUP_ROOT).join(&ctx.timestamp)
        );
    }

    #[test]
    fn home_target_joins_entry_name() {
        let (ctx, _tmp) = make_context();
        let target = ctx.home_target(std::ffi::OsStr::new("CLAUDE.md"));
        assert_eq!(target, ctx.home.join("CLAUDE.md"));
    }

    #[test]
    fn debug_format_includes_key_fields() {
        let (ctx, _tmp) = make_context();
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
        assert!(debug.contains("dry_run"));
        assert!(debug.contains("home"));
    }
}
