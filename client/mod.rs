pub mod cli_args;
pub mod formatter;
pub mod prompt;

pub use cli_args::CliArgs;
pub use formatter::OutputFormatter;
pub use prompt::{PromptError, Prompter};
