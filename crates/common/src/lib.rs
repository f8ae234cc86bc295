//! Common utilities for the micro gateway CLI
//!
//! Configuration files, the on-disk workspace layout and console interaction.
//!
//! The workspace location file and the config files are not locked. Running
//! several CLI invocations against one workspace at the same time is not
//! supported and may lose writes.

pub mod config;
pub mod ui;
pub mod workspace;

pub use config::{ConfigFile, ConfigSection, GlobalConfig, LabelConfig, TokenConfig};
pub use ui::{RealUserInterface, TestUserInterface};
pub use workspace::{CliHome, LabelLayout, WorkspaceLayout, WorkspaceManager};
