//! Structured console logger with dry-run awareness and summary collection.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Result of one unit of work (a package or a module's copy step), recorded
/// for the closing summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable unit name, e.g. `backend/claude`.
    pub name: String,
    /// Final status of the unit.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Unit completed successfully.
    Ok,
    /// Unit was skipped (e.g., module directory not found).
    Skipped,
    /// Unit ran in dry-run mode; no changes were applied.
    DryRun,
    /// Unit encountered an error and could not complete.
    Failed,
}

/// Run-wide record that backups happened (or would happen) during a run.
///
/// Recorded by the backup engine at the moment of relocation, not derived
/// from orchestrator counters, so the note survives a fatal abort later in
/// the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupNote {
    /// Files were relocated into the backup tree at this path.
    Saved(PathBuf),
    /// A dry run planned relocations into this path; nothing was written.
    Planned(PathBuf),
}

/// Abstraction over logging backends, so tasks can log without knowing the
/// concrete logger and tests can capture output.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a unit result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
    /// Record that a backup occurred (or, under dry-run, was planned)
    /// under `dir`.
    fn note_backups(&self, dir: &Path, planned: bool);
}

/// Implement the display methods of [`Log`] by delegating to inherent
/// methods of the same name on the implementing type.
///
/// `record_task` is **not** included because its signature differs from the
/// `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Console logger that records per-unit results and prints a closing
/// summary, including where backups were written when any occurred.
///
/// Every message is also mirrored to [`tracing`], so diagnostics can be
/// captured with `RUST_LOG` without changing console output.
#[derive(Debug)]
pub struct Logger {
    verbose: bool,
    tasks: Mutex<Vec<TaskEntry>>,
    backups: Mutex<Option<BackupNote>>,
}

impl Logger {
    /// Create a new logger. When `verbose` is set, debug messages are shown
    /// on the console.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            tasks: Mutex::new(Vec::new()),
            backups: Mutex::new(None),
        }
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dotmod::stage", "{msg}");
        println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
        println!("{msg}");
    }

    /// Log a debug message (console output only when verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
        if self.verbose {
            println!("\x1b[2m{msg}\x1b[0m");
        }
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
        eprintln!("\x1b[33mwarning:\x1b[0m {msg}");
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
        eprintln!("\x1b[31merror:\x1b[0m {msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dotmod::dry_run", "{msg}");
        println!("\x1b[37m~ {msg}\x1b[0m");
    }

    /// Record a unit result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Note that at least one backup occurred during this run (or was
    /// planned, under dry-run), so the summary can point the user at the
    /// backup tree.
    pub fn note_backups(&self, dir: &Path, planned: bool) {
        if let Ok(mut guard) = self.backups.lock() {
            *guard = Some(if planned {
                BackupNote::Planned(dir.to_path_buf())
            } else {
                BackupNote::Saved(dir.to_path_buf())
            });
        }
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed units.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Return the backup note, if any backup occurred or was planned.
    #[must_use]
    pub fn backup_note(&self) -> Option<BackupNote> {
        self.backups.lock().ok().and_then(|g| g.clone())
    }

    /// Print the summary of all recorded units.
    pub fn print_summary(&self) {
        let tasks = match self.tasks.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if tasks.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        println!();
        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} units: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        match self.backup_note() {
            Some(BackupNote::Saved(dir)) => self.info(&format!(
                "backups of replaced files saved under: {}",
                dir.display()
            )),
            Some(BackupNote::Planned(dir)) => self.info(&format!(
                "backups of replaced files would be saved under: {}",
                dir.display()
            )),
            None => self.info("no backups were needed"),
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }

    fn note_backups(&self, dir: &Path, planned: bool) {
        self.note_backups(dir, planned);
    }
}

/// Initialise the global tracing subscriber.
///
/// Console output is owned by [`Logger`]; the subscriber only surfaces
/// diagnostics on stderr when `RUST_LOG` enables them.
pub fn init_subscriber() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
