//! User interface and interaction
//!
//! CLI parsing, terminal rendering of the workspace, the load spinner and
//! shell completion generation.

pub mod cli;
pub mod color;
pub mod completion;
pub mod output;
pub mod progress;

pub use cli::{Cli, Commands, ExportFormat, LogoCommand, cli_to_config};
pub use completion::print_completions;
pub use output::{format_dashboard, state_message};
pub use progress::LoadSpinner;
