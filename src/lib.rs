//! Watch a tabletop mod project, rebuild its save file on edits, and verify
//! that remote assets referenced by the project are reachable.

pub mod assets;
pub mod build;
pub mod config;
pub mod console;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod paths;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;
