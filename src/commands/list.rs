//! The `--list` surface: print available modules.
use std::path::Path;

use anyhow::Result;

use crate::commands::install::resolve_root;
use crate::modules::list_modules;

/// Print available module names, one per line.
///
/// # Errors
///
/// Returns an error if the dotfiles root cannot be resolved or read.
pub fn run(root_flag: Option<&Path>) -> Result<()> {
    let root = resolve_root(root_flag)?;
    for module in list_modules(&root)? {
        println!("{module}");
    }
    Ok(())
}

/// Best-effort module listing appended to `--help` output. Silent when the
/// root cannot be resolved.
pub fn print_module_list(root_flag: Option<&Path>) {
    let Ok(root) = resolve_root(root_flag) else {
        return;
    };
    let Ok(modules) = list_modules(&root) else {
        return;
    };
    if modules.is_empty() {
        return;
    }
    println!("\nAvailable modules:");
    for module in modules {
        println!("  {module}");
    }
}
