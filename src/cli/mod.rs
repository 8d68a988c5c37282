// CLI interface components
pub mod batch_runner;
pub mod cli_args;
pub mod cli_runner;
pub mod output_formatter;

pub use batch_runner::*;
pub use cli_args::*;
pub use cli_runner::*;
pub use output_formatter::*;
