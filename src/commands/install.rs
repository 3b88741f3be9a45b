//! Module orchestrator: drive the install pipeline over requested modules.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::Cli;
use crate::error::InstallError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, TaskStatus};
use crate::modules::{Module, list_modules, validate_name};
use crate::tasks::{self, Context, PackageOutcome, copy_only, link};

/// Aggregated results of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Total targets relocated into the backup tree (planned relocations
    /// under dry-run).
    pub backups: u32,
    /// Packages installed and verified.
    pub installed: u32,
    /// Packages or copy steps that failed (contained failures).
    pub failed: u32,
    /// Modules skipped because their directory does not exist.
    pub skipped_modules: u32,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error on an unresolvable root, a missing link-farm tool, an
/// invalid requested module name, or a fatal link installation failure.
pub fn run(args: &Cli, log: &Arc<Logger>) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;

    let executor = Arc::new(SystemExecutor);
    if !args.dry_run && !executor.which(link::LINK_FARM) {
        anyhow::bail!(
            "'{}' not found on PATH; install it before running",
            link::LINK_FARM
        );
    }

    let ctx = Context::new(
        root,
        Arc::clone(log) as Arc<dyn Log>,
        args.dry_run,
        executor,
    )?;

    // The backup engine records the run-wide backup note itself, so the
    // summary is complete on the error path too.
    let result = run_modules(&ctx, &args.modules);
    log.print_summary();
    result.map(|_report| ()).map_err(Into::into)
}

/// Process the requested modules in caller-specified order, strictly
/// sequentially: the backup engine and the link farm both mutate the home
/// directory, and concurrent mutation could race on the same target path.
///
/// # Errors
///
/// Returns [`InstallError::InvalidName`] if a requested module name fails
/// validation (checked for every name before any mutation), or
/// [`InstallError::LinkInstall`] on a fatal link-farm failure.
pub fn run_modules(ctx: &Context, module_names: &[String]) -> Result<RunReport, InstallError> {
    // Requested names come straight from the command line; reject the
    // whole run before touching the filesystem if any of them is unsafe.
    for name in module_names {
        validate_name(name)?;
    }

    let mut report = RunReport::default();

    for name in module_names {
        let Some(module) = Module::locate(&ctx.root, name) else {
            let e = InstallError::ModuleNotFound(name.clone());
            ctx.log.warn(&format!("{e}, skipping"));
            ctx.log
                .record_task(name, TaskStatus::Skipped, Some("not found"));
            report.skipped_modules += 1;
            continue;
        };

        ctx.log.stage(&format!("Installing module {name}"));
        install_module(ctx, &module, &mut report)?;
    }

    Ok(report)
}

/// Run the copy-only step and the per-package pipeline for one module.
fn install_module(
    ctx: &Context,
    module: &Module,
    report: &mut RunReport,
) -> Result<(), InstallError> {
    if module.copy_dir().is_some() {
        let stats = copy_only::materialize(ctx, module);
        ctx.log.info(&format!(
            "copy-only: {} copied, {} skipped, {} failed",
            stats.copied, stats.skipped, stats.failed
        ));
        let unit = format!("{} (copy)", module.name);
        if stats.failed > 0 {
            report.failed += 1;
            ctx.log.record_task(
                &unit,
                TaskStatus::Failed,
                Some(&format!("{} copy failure(s)", stats.failed)),
            );
        } else if ctx.dry_run {
            ctx.log.record_task(&unit, TaskStatus::DryRun, None);
        } else {
            ctx.log.record_task(&unit, TaskStatus::Ok, None);
        }
    }

    let packages = match module.packages() {
        Ok(packages) => packages,
        Err(e) => {
            ctx.log.error(&format!("{e:#}"));
            ctx.log
                .record_task(&module.name, TaskStatus::Failed, Some(&format!("{e:#}")));
            report.failed += 1;
            return Ok(());
        }
    };

    for package in packages {
        let unit = format!("{}/{package}", module.name);
        ctx.log.info(&format!("package {package}"));

        match tasks::process_package(ctx, module, &package) {
            Ok(PackageOutcome::Installed { backed_up, linked }) => {
                report.backups += backed_up;
                report.installed += 1;
                ctx.log.record_task(
                    &unit,
                    TaskStatus::Ok,
                    Some(&format!("{linked} linked")),
                );
            }
            Ok(PackageOutcome::DryRun { backed_up }) => {
                report.backups += backed_up;
                ctx.log.record_task(&unit, TaskStatus::DryRun, None);
            }
            Ok(PackageOutcome::Failed(msg)) => {
                report.failed += 1;
                ctx.log.record_task(&unit, TaskStatus::Failed, Some(&msg));
            }
            Ok(PackageOutcome::VerifyFailed {
                backed_up,
                broken,
                missing,
            }) => {
                report.backups += backed_up;
                report.failed += 1;
                ctx.log.record_task(
                    &unit,
                    TaskStatus::Failed,
                    Some(&format!("verification: {broken} broken, {missing} missing")),
                );
            }
            Err(e) => {
                // Fatal: a link-farm failure aborts the entire run.
                ctx.log
                    .record_task(&unit, TaskStatus::Failed, Some(&e.to_string()));
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Resolve the dotfiles root directory from the CLI flag, the
/// `DOTMOD_ROOT` environment variable, or the current directory.
///
/// # Errors
///
/// Returns an error if no candidate contains any modules.
pub fn resolve_root(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root.to_path_buf());
    }

    if let Ok(root) = std::env::var("DOTMOD_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir()?;
    if list_modules(&cwd).is_ok_and(|m| !m.is_empty()) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine dotfiles root. Use --root or set DOTMOD_ROOT")
}
