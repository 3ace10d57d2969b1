// fwsync-api: Async Rust client for the firewall provider REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ProviderClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
