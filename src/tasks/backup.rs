//! Backup engine: relocate pre-existing targets into the run's backup tree.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::resources::fs::{copy_path, ensure_parent_dir};

use super::Context;

/// Relocate an existing target path into the backup tree for this run,
/// preserving its path relative to the home directory:
/// `<home>/.dotmod-backup/<timestamp>/<home-relative-path>`.
///
/// If the target is itself a symbolic link it is dereferenced first, so
/// the *content* is archived rather than a (possibly soon-dangling) link.
/// The original path is removed only after the copy succeeds; if removal
/// fails the original stays in place alongside the backup copy —
/// duplicated, not lost.
///
/// Under dry-run nothing is mutated; the planned relocation is reported.
///
/// # Errors
///
/// Returns [`InstallError::InvalidName`] if the target path contains a
/// traversal sequence, or [`InstallError::Backup`] if directory creation,
/// copy, or removal fails.
pub fn backup_target(ctx: &Context, target: &Path) -> Result<(), InstallError> {
    let target_str = target.to_string_lossy();
    if target_str.contains("..") {
        return Err(InstallError::InvalidName(target_str.to_string()));
    }

    let dest = backup_destination(ctx, target);

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would back up {} to {}",
            target.display(),
            dest.display()
        ));
        ctx.log.note_backups(&ctx.backup_dir(), true);
        return Ok(());
    }

    relocate(target, &dest).map_err(|e| InstallError::Backup {
        path: target.display().to_string(),
        detail: format!("{e:#}"),
    })?;

    // Noted here rather than in the orchestrator, so the summary still
    // points at the backup tree when a later step aborts the run.
    ctx.log.note_backups(&ctx.backup_dir(), false);

    ctx.log.debug(&format!(
        "backed up {} to {}",
        target.display(),
        dest.display()
    ));
    Ok(())
}

/// Compute where `target` will be archived for this run.
fn backup_destination(ctx: &Context, target: &Path) -> PathBuf {
    // Mirror the home-relative structure; fall back to the bare file name
    // for paths outside the home directory.
    let rel = target.strip_prefix(&ctx.home).map_or_else(
        |_| PathBuf::from(target.file_name().unwrap_or(target.as_os_str())),
        Path::to_path_buf,
    );
    ctx.backup_dir().join(rel)
}

/// Copy the (dereferenced) content of `target` to `dest`, then remove the
/// original.
fn relocate(target: &Path, dest: &Path) -> Result<()> {
    let meta = target
        .symlink_metadata()
        .with_context(|| format!("reading metadata: {}", target.display()))?;

    // Dereference before archiving so a link's content is preserved.
    let source = if meta.is_symlink() {
        std::fs::canonicalize(target)
            .with_context(|| format!("resolving symlink: {}", target.display()))?
    } else {
        target.to_path_buf()
    };

    ensure_parent_dir(dest)?;
    copy_path(&source, dest)?;

    if meta.is_symlink() || !meta.is_dir() {
        std::fs::remove_file(target)
            .with_context(|| format!("removing original: {}", target.display()))?;
    } else {
        std::fs::remove_dir_all(target)
            .with_context(|| format!("removing original: {}", target.display()))?;
    }
    Ok(())
}
