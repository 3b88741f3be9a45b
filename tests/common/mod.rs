// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles tree and home directory,
// plus a scripted executor, so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use dotmod::exec::{ExecResult, Executor};
use dotmod::logging::Logger;
use dotmod::tasks::Context;

/// Executor that records every command it is asked to run and, when
/// configured to, simulates the link farm by symlinking each package entry
/// into the home directory.
pub struct FakeLinkFarm {
    calls: Mutex<Vec<Vec<String>>>,
    create_links: bool,
    fail: bool,
}

impl FakeLinkFarm {
    /// Records commands and creates the links a real link farm would.
    pub fn linking() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            create_links: true,
            fail: false,
        }
    }

    /// Records commands without touching the filesystem.
    pub fn inert() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            create_links: false,
            fail: false,
        }
    }

    /// Fails every command.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            create_links: false,
            fail: true,
        }
    }

    /// All recorded invocations, each as `[program, arg, ...]`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("executor mutex").clone()
    }

    #[cfg(unix)]
    fn link_package(args: &[&str]) {
        // Expected shape: -d <module-dir> -t <home> <package>
        let module_dir = args
            .iter()
            .position(|a| *a == "-d")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .expect("-d <dir> argument");
        let home = args
            .iter()
            .position(|a| *a == "-t")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .expect("-t <dir> argument");
        let package = args.last().expect("package argument");

        let package_dir = module_dir.join(package);
        for entry in std::fs::read_dir(&package_dir).expect("read package dir") {
            let entry = entry.expect("package entry");
            let target = home.join(entry.file_name());
            if std::fs::symlink_metadata(&target).is_err() {
                std::os::unix::fs::symlink(entry.path(), &target).expect("create link");
            }
        }
    }
}

impl Executor for FakeLinkFarm {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(ToString::to_string));
        self.calls.lock().expect("executor mutex").push(call);

        if self.fail {
            anyhow::bail!("{program} failed (exit 1): simulated failure")
        }
        #[cfg(unix)]
        if self.create_links {
            Self::link_package(args);
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }

    fn run_in(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run(program, args)
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// An isolated dotfiles tree and home directory backed by a
/// [`tempfile::TempDir`], deleted on drop.
pub struct TestEnv {
    tmp: tempfile::TempDir,
    pub root: PathBuf,
    pub home: PathBuf,
    pub log: Arc<Logger>,
}

impl TestEnv {
    /// Build a [`Context`] over this environment with the given executor
    /// and dry-run flag.
    pub fn context(&self, executor: Arc<dyn Executor>, dry_run: bool) -> Context {
        Context {
            root: self.root.clone(),
            home: self.home.clone(),
            timestamp: "20260828120000".to_string(),
            dry_run,
            log: Arc::clone(&self.log) as _,
            executor,
        }
    }

    /// The backup directory a run over this environment would use.
    pub fn backup_dir(&self) -> PathBuf {
        self.home.join(".dotmod-backup").join("20260828120000")
    }
}

/// Fluent builder for [`TestEnv`].
pub struct TestEnvBuilder {
    env: TestEnv,
}

impl TestEnvBuilder {
    /// Begin building a new environment with empty `root/` and `home/`
    /// directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("root");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&root).expect("create root");
        std::fs::create_dir_all(&home).expect("create home");
        Self {
            env: TestEnv {
                tmp,
                root,
                home,
                log: Arc::new(Logger::new(false)),
            },
        }
    }

    /// Write a file inside a module package, creating the module and
    /// package directories as needed. `rel` is relative to the package.
    pub fn with_package_file(self, module: &str, package: &str, rel: &str, content: &str) -> Self {
        let path = self.env.root.join(module).join(package).join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create package parents");
        }
        std::fs::write(&path, content).expect("write package file");
        self
    }

    /// Write a file inside a module's copy-only directory. `rel` is
    /// relative to the copy-only directory.
    pub fn with_copy_file(self, module: &str, rel: &str, content: &str) -> Self {
        let path = self.env.root.join(module).join("copy").join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create copy parents");
        }
        std::fs::write(&path, content).expect("write copy file");
        self
    }

    /// Create an empty module directory.
    pub fn with_empty_module(self, module: &str) -> Self {
        std::fs::create_dir_all(self.env.root.join(module)).expect("create module dir");
        self
    }

    /// Write a file directly into the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        let path = self.env.home.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parents");
        }
        std::fs::write(&path, content).expect("write home file");
        self
    }

    /// Finish building and return the environment.
    pub fn build(self) -> TestEnv {
        self.env
    }
}
