use thiserror::Error;

/// Failures while bootstrapping the core runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bridge required by the configuration was not provided.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
