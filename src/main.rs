//! Binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clap::error::ErrorKind;

use dotmod::cli::{self, Cli};
use dotmod::commands;
use dotmod::error::InstallError;
use dotmod::logging::{self, Logger};

fn main() -> ExitCode {
    // Harmless if it fails; older Windows consoles just keep plain output.
    let _ = enable_ansi_support::enable_ansi_support();
    logging::init_subscriber();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            if e.kind() == ErrorKind::DisplayHelp {
                let root = cli::root_from_raw_args(std::env::args());
                commands::list::print_module_list(root.as_deref());
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let log = Arc::new(Logger::new(args.verbose));

    if args.list {
        return match commands::list::run(args.root.as_deref()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log.error(&format!("{e:#}"));
                ExitCode::FAILURE
            }
        };
    }

    if args.modules.is_empty() {
        let e = InstallError::Usage(
            "no modules requested; pass module names or use --list to see what is available"
                .to_string(),
        );
        log.error(&e.to_string());
        return ExitCode::FAILURE;
    }

    match commands::install::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
