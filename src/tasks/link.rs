//! Link installer: delegate symlink creation to the external link farm.
use crate::error::InstallError;
use crate::modules::Module;

use super::Context;

/// Name of the external link-farm tool.
pub const LINK_FARM: &str = "stow";

/// Install one package's links by delegating to the link farm, scoped to
/// the module directory as source and the home directory as target:
/// `stow -d <module-dir> -t <home> <package>`.
///
/// A non-zero outcome is fatal for the entire run, not just this package:
/// a link-farm failure usually indicates a structural conflict the tool
/// cannot safely reason past.
///
/// # Errors
///
/// Returns [`InstallError::LinkInstall`] if the delegation fails.
pub fn install_package(ctx: &Context, module: &Module, package: &str) -> Result<(), InstallError> {
    let module_dir = module.dir.to_string_lossy();
    let home = ctx.home.to_string_lossy();

    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would run: {LINK_FARM} -d {module_dir} -t {home} {package}"
        ));
        return Ok(());
    }

    ctx.executor
        .run(LINK_FARM, &["-d", &module_dir, "-t", &home, package])
        .map_err(|e| InstallError::LinkInstall {
            package: package.to_string(),
            detail: format!("{e:#}"),
        })?;

    ctx.log
        .debug(&format!("linked package {package} via {LINK_FARM}"));
    Ok(())
}
