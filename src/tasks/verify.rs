//! Link verifier: confirm every package entry resolved to a valid link.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::modules::{IGNORE_MARKER, Module};
use crate::resources::{LinkState, link_state};

use super::Context;

/// Outcome of verifying one package's links.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Entries whose home path is a symbolic link with an existing
    /// destination.
    pub resolved: u32,
    /// Home paths that are symbolic links pointing at nothing.
    pub broken: Vec<PathBuf>,
    /// Home paths that are not symbolic links at all (or absent).
    pub missing: Vec<PathBuf>,
}

impl VerifyReport {
    /// Whether every entry verified cleanly.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.broken.is_empty() && self.missing.is_empty()
    }
}

/// Re-walk the same depth-1 entries the preparer examined and classify
/// each home path. Failures are reported per entry but never abort the
/// run; the caller surfaces the aggregate distinctly from a fatal link
/// installation failure.
///
/// # Errors
///
/// Returns an error if the package directory cannot be read.
pub fn verify_package(ctx: &Context, module: &Module, package: &str) -> Result<VerifyReport> {
    let package_dir = module.package_dir(package);
    let mut report = VerifyReport::default();

    for entry in std::fs::read_dir(&package_dir)
        .with_context(|| format!("reading package directory {}", package_dir.display()))?
    {
        let entry =
            entry.with_context(|| format!("reading entry in {}", package_dir.display()))?;
        if entry.file_name() == IGNORE_MARKER {
            continue;
        }

        let target = ctx.home_target(&entry.file_name());
        match link_state(&target) {
            LinkState::Resolved(_) => report.resolved += 1,
            LinkState::Dangling(dest) => {
                ctx.log.error(&format!(
                    "broken link: {} -> {}",
                    target.display(),
                    dest.display()
                ));
                report.broken.push(target);
            }
            LinkState::NotALink | LinkState::Absent => {
                ctx.log
                    .error(&format!("missing link: {}", target.display()));
                report.missing.push(target);
            }
        }
    }

    Ok(report)
}
