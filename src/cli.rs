//! Command-line surface.
use clap::Parser;

/// Top-level CLI entry point for the module installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotmod",
    about = "Module-based dotfiles installer",
    version,
    arg_required_else_help = false
)]
pub struct Cli {
    /// Modules to install, in order
    pub modules: Vec<String>,

    /// Preview changes without applying
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// List available modules and exit
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the dotfiles root directory
    #[arg(long)]
    pub root: Option<std::path::PathBuf>,
}

/// Leniently extract a `--root` value from raw arguments.
///
/// Used on the `--help` path, where clap reports the help text as an error
/// before the parsed [`Cli`] exists, so the module listing appended to the
/// help output can still honour `--root`.
pub fn root_from_raw_args<I>(args: I) -> Option<std::path::PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--root" {
            return args.next().map(std::path::PathBuf::from);
        }
        if let Some(value) = arg.strip_prefix("--root=") {
            return Some(std::path::PathBuf::from(value));
        }
    }
    None
}
