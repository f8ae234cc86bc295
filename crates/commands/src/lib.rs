//! Command implementations for the micro gateway CLI
//!
//! `setup` turns a label on the management API into a generated project,
//! `build` packages that project and `run` is reserved for a local launcher.

/// Command implementations module
pub mod commands;

/// Username, password and token acquisition
pub mod credentials;

/// Remote definition fetch
pub mod fetch;

/// Ordered artifact generation
pub mod pipeline;

#[cfg(test)]
pub mod test_helpers;

// Re-export all commands at the crate root for easier access
pub use commands::{build, run, setup};
