pub mod config;
pub mod error;
pub mod qa;
pub mod session;

// Re-export common error type
pub use error::{DocubrainError, Result};
