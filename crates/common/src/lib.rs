//! Common types, protocol definitions, and errors for the `gencrypt` sealing service.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
