// Remote capability clients
pub mod client_trait;
pub mod http_client;
pub mod mock_client;

pub use client_trait::*;
pub use http_client::*;
pub use mock_client::*;
