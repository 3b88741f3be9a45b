//! The per-package pipeline: backup, copy, link, verify.
pub mod backup;
pub mod context;
pub mod copy_only;
pub mod link;
pub mod prepare;
pub mod verify;

pub use context::Context;

use crate::error::InstallError;
use crate::modules::Module;

/// Final state of one package after the prepare → install → verify
/// pipeline.
#[derive(Debug)]
pub enum PackageOutcome {
    /// Links installed and verified.
    Installed {
        /// Number of pre-existing targets relocated into the backup tree.
        backed_up: u32,
        /// Number of entries verified as resolved links.
        linked: u32,
    },
    /// Dry run: the plan was reported, nothing was changed.
    DryRun {
        /// Number of targets that would have been backed up.
        backed_up: u32,
    },
    /// Preparation or verification I/O failed; contained at the package
    /// level.
    Failed(String),
    /// Links were installed but verification found broken or missing
    /// links; contained, but surfaced distinctly in the summary.
    VerifyFailed {
        /// Number of pre-existing targets relocated into the backup tree.
        backed_up: u32,
        /// Number of dangling links found.
        broken: usize,
        /// Number of entries that are not links.
        missing: usize,
    },
}

/// Run the prepare → install → verify pipeline for one package.
///
/// Contained failures (invalid package name, backup or verification
/// trouble) are logged and returned as an outcome so the orchestrator can
/// continue with the next package. Only a link-farm failure propagates as
/// an error: it aborts the entire run.
///
/// # Errors
///
/// Returns [`InstallError::LinkInstall`] if the link-farm delegation
/// fails.
pub fn process_package(
    ctx: &Context,
    module: &Module,
    package: &str,
) -> Result<PackageOutcome, InstallError> {
    let backed_up = match prepare::prepare_package(ctx, module, package) {
        Ok(n) => n,
        Err(e) => {
            ctx.log.error(&e.to_string());
            return Ok(PackageOutcome::Failed(e.to_string()));
        }
    };
    if backed_up > 0 {
        ctx.log.info(&format!(
            "{backed_up} conflicting target(s) backed up"
        ));
    }

    link::install_package(ctx, module, package)?;

    if ctx.dry_run {
        return Ok(PackageOutcome::DryRun { backed_up });
    }

    let report = match verify::verify_package(ctx, module, package) {
        Ok(report) => report,
        Err(e) => {
            ctx.log.error(&format!("{e:#}"));
            return Ok(PackageOutcome::Failed(format!("{e:#}")));
        }
    };

    if report.passed() {
        ctx.log.debug(&format!(
            "verified {} link(s) for package {package}",
            report.resolved
        ));
        Ok(PackageOutcome::Installed {
            backed_up,
            linked: report.resolved,
        })
    } else {
        let e = InstallError::Verification {
            package: package.to_string(),
            broken: report.broken.len(),
            missing: report.missing.len(),
        };
        ctx.log.error(&e.to_string());
        Ok(PackageOutcome::VerifyFailed {
            backed_up,
            broken: report.broken.len(),
            missing: report.missing.len(),
        })
    }
}
