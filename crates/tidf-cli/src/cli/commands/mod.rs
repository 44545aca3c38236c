//! CLI command handlers, one per file.

mod completions;
mod list;
mod pull;

pub use completions::run_completions;
pub use list::{list_lines, run_list};
pub use pull::{exit_code, run_pull};
