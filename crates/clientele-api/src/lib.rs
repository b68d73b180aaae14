// clientele-api: Async Rust client for the customer and address REST service

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::CustomerClient;
pub use error::Error;
pub use transport::TransportConfig;
