//! Copy-only materialiser: copy a module's `copy/` contents into `$HOME`,
//! never overwriting anything already present.
use std::path::Path;

use crate::error::InstallError;
use crate::modules::{IGNORE_MARKER, Module};
use crate::resources::fs::copy_dir_recursive;

use super::Context;

/// Counters returned by [`materialize`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Entries newly copied into the home directory.
    pub copied: u32,
    /// Entries left untouched because a target already existed
    /// (existence includes symbolic links).
    pub skipped: u32,
    /// Entries whose copy failed; reported and skipped, never aborting
    /// sibling copies.
    pub failed: u32,
}

impl CopyStats {
    const fn absorb(&mut self, other: Self) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Copy the contents of the module's copy-only directory into the home
/// directory. Directories are created first and populated file-by-file, so
/// a partial failure leaves a valid partial state. Pre-existing targets
/// are never overwritten. Returns counters; does nothing if the module has
/// no copy-only directory.
#[must_use]
pub fn materialize(ctx: &Context, module: &Module) -> CopyStats {
    let Some(copy_dir) = module.copy_dir() else {
        return CopyStats::default();
    };
    copy_tree(ctx, &copy_dir, Path::new(""))
}

/// Walk one level of the copy-only tree, recursing into directories.
fn copy_tree(ctx: &Context, dir: &Path, rel: &Path) -> CopyStats {
    let mut stats = CopyStats::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            ctx.log
                .error(&format!("cannot read {}: {e}", dir.display()));
            stats.failed += 1;
            return stats;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else {
            stats.failed += 1;
            continue;
        };
        if entry.file_name() == IGNORE_MARKER {
            continue;
        }

        let src = entry.path();
        let entry_rel = rel.join(entry.file_name());
        let target = ctx.home_target_rel(&entry_rel);

        if src.is_dir() {
            stats.absorb(copy_dir_entry(ctx, &src, &entry_rel, &target));
        } else {
            stats.absorb(copy_file_entry(ctx, &src, &target));
        }
    }

    stats
}

/// Handle one directory entry: create/reuse the target directory and
/// recurse, or skip the whole subtree when the target is occupied by
/// something that is not a real directory.
fn copy_dir_entry(ctx: &Context, src: &Path, rel: &Path, target: &Path) -> CopyStats {
    let mut stats = CopyStats::default();

    let occupied_by_non_dir = target
        .symlink_metadata()
        .is_ok_and(|m| m.is_symlink() || !m.is_dir());
    if occupied_by_non_dir {
        ctx.log.debug(&format!(
            "skipping {} (target exists and is not a directory)",
            target.display()
        ));
        stats.skipped += 1;
        return stats;
    }

    if !target.exists() {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would create directory {}", target.display()));
        } else if let Err(e) = std::fs::create_dir_all(target) {
            ctx.log
                .error(&format!("cannot create {}: {e}", target.display()));
            stats.failed += 1;
            return stats;
        }
    }

    stats.absorb(copy_tree(ctx, src, rel));
    stats
}

/// Handle one file entry: copy unless a target already exists.
fn copy_file_entry(ctx: &Context, src: &Path, target: &Path) -> CopyStats {
    let mut stats = CopyStats::default();

    // symlink_metadata succeeds for broken links too, so a dangling link
    // at the target still counts as "present" and is preserved.
    if target.symlink_metadata().is_ok() {
        ctx.log
            .debug(&format!("skipping {} (already exists)", target.display()));
        stats.skipped += 1;
        return stats;
    }

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would copy {} to {}",
            src.display(),
            target.display()
        ));
        stats.copied += 1;
        return stats;
    }

    match std::fs::copy(src, target) {
        Ok(_) => {
            ctx.log
                .debug(&format!("copied {} to {}", src.display(), target.display()));
            stats.copied += 1;
        }
        Err(e) => {
            let err = InstallError::Copy {
                path: target.display().to_string(),
                detail: e.to_string(),
            };
            ctx.log.error(&err.to_string());
            stats.failed += 1;
        }
    }
    stats
}
