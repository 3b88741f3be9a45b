//! Module-based dotfiles installer.
//!
//! Installs named modules of dotfiles into the user's home directory. Each
//! module groups one or more *packages* whose top-level entries become
//! symbolic links in `$HOME` (created via GNU Stow) and optionally one
//! *copy-only* directory whose contents are copied rather than linked.
//! Any pre-existing real file or directory that would collide with a link
//! is relocated into a timestamped backup tree first, so user data is
//! never destroyed.
//!
//! The crate is organised into four layers:
//!
//! - **[`modules`]** — name validation and module/package discovery
//! - **[`resources`]** — filesystem and symlink primitives
//! - **[`tasks`]** — the per-package pipeline: backup, copy, link, verify
//! - **[`commands`]** — top-level orchestration (`install`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod modules;
pub mod resources;
pub mod tasks;
