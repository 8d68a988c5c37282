// Request construction for the remote capabilities
pub mod prompt_generator;
pub mod request_builder;

pub use prompt_generator::*;
pub use request_builder::*;
