//! Package preparer: back up anything that would collide with a link.
use crate::error::InstallError;
use crate::modules::{IGNORE_MARKER, Module, validate_name};

use super::{Context, backup};

/// Walk a package's immediate (depth-1) entries and back up every home
/// target that exists and is not itself a symbolic link. Targets that are
/// already symbolic links are left untouched: re-running the installer
/// must not re-backup links it created itself.
///
/// Returns the number of entries backed up (planned backups under
/// dry-run).
///
/// # Errors
///
/// Returns [`InstallError::InvalidName`] if the package name fails
/// validation, or [`InstallError::Backup`] if the package directory cannot
/// be read or a backup fails.
pub fn prepare_package(
    ctx: &Context,
    module: &Module,
    package: &str,
) -> Result<u32, InstallError> {
    validate_name(package)?;

    let package_dir = module.package_dir(package);
    let entries = std::fs::read_dir(&package_dir).map_err(|e| InstallError::Backup {
        path: package_dir.display().to_string(),
        detail: e.to_string(),
    })?;

    let mut backed_up = 0u32;
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::Backup {
            path: package_dir.display().to_string(),
            detail: e.to_string(),
        })?;
        if entry.file_name() == IGNORE_MARKER {
            continue;
        }

        let target = ctx.home_target(&entry.file_name());

        // Each target is in exactly one of three states: absent (nothing
        // to do), a symbolic link (already installed, leave it), or a real
        // file/directory (back it up before linking).
        let needs_backup = target
            .symlink_metadata()
            .is_ok_and(|m| !m.is_symlink());
        if needs_backup {
            backup::backup_target(ctx, &target)?;
            backed_up += 1;
        }
    }

    Ok(backed_up)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{dry_run_context, make_context, make_module};

    #[test]
    fn absent_targets_need_no_backup() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &["claude"]);
        std::fs::write(module.dir.join("claude/CLAUDE.md"), "cfg").unwrap();

        let backed_up = prepare_package(&ctx, &module, "claude").unwrap();
        assert_eq!(backed_up, 0);
    }

    #[test]
    fn colliding_regular_file_is_backed_up() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &["claude"]);
        std::fs::write(module.dir.join("claude/CLAUDE.md"), "cfg").unwrap();
        std::fs::write(ctx.home.join("CLAUDE.md"), "X").unwrap();

        let backed_up = prepare_package(&ctx, &module, "claude").unwrap();

        assert_eq!(backed_up, 1);
        assert!(!ctx.home.join("CLAUDE.md").exists());
        assert_eq!(
            std::fs::read_to_string(ctx.backup_dir().join("CLAUDE.md")).unwrap(),
            "X"
        );
    }

    #[cfg(unix)]
    #[test]
    fn existing_symlink_is_left_untouched() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &["claude"]);
        let source = module.dir.join("claude/CLAUDE.md");
        std::fs::write(&source, "cfg").unwrap();
        std::os::unix::fs::symlink(&source, ctx.home.join("CLAUDE.md")).unwrap();

        let backed_up = prepare_package(&ctx, &module, "claude").unwrap();

        assert_eq!(backed_up, 0, "an installed link must not be re-backed-up");
        assert!(ctx.home.join("CLAUDE.md").symlink_metadata().unwrap().is_symlink());
    }

    #[test]
    fn ignore_marker_is_excluded_from_the_walk() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &["claude"]);
        std::fs::write(module.dir.join("claude/.keep"), "").unwrap();
        std::fs::write(ctx.home.join(".keep"), "user data").unwrap();

        let backed_up = prepare_package(&ctx, &module, "claude").unwrap();
        assert_eq!(backed_up, 0, ".keep collisions must be ignored");
        assert!(ctx.home.join(".keep").exists());
    }

    #[test]
    fn invalid_package_name_is_rejected() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &[]);
        assert!(matches!(
            prepare_package(&ctx, &module, "../escape"),
            Err(InstallError::InvalidName(_))
        ));
    }

    #[test]
    fn missing_package_directory_is_a_backup_error() {
        let (ctx, _tmp) = make_context();
        let module = make_module(&ctx, "backend", &[]);
        assert!(matches!(
            prepare_package(&ctx, &module, "nope"),
            Err(InstallError::Backup { .. })
        ));
    }

    #[test]
    fn dry_run_counts_planned_backups_without_mutating() {
        let (ctx, _tmp) = dry_run_context();
        let module = make_module(&ctx, "backend", &["claude"]);
        std::fs::write(module.dir.join("claude/CLAUDE.md"), "cfg").unwrap();
        std::fs::write(ctx.home.join("CLAUDE.md"), "X").unwrap();

        let backed_up = prepare_package(&ctx, &module, "claude").unwrap();

        assert_eq!(backed_up, 1);
        assert_eq!(
            std::fs::read_to_string(ctx.home.join("CLAUDE.md")).unwrap(),
            "X"
        );
    }
}
