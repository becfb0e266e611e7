mod claude_cli;

pub use claude_cli::{ClaudeCli, escape_prompt};
