pub mod cli;
pub mod clients;
pub mod requests;
pub mod utils;

pub use cli::*;
pub use clients::*;
pub use requests::*;
pub use utils::*;
