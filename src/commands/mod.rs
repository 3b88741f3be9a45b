//! Top-level command orchestration.
pub mod install;
pub mod list;
