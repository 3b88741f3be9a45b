//! Filesystem and symlink primitives shared by the task pipeline.
pub mod fs;
pub mod symlink;

pub use symlink::{LinkState, link_state};
