use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Resource is no longer loaded")]
    ResourceUnloaded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the failure reflects a missing platform capability
    /// rather than a problem with a specific resource.
    pub fn is_platform_limitation(&self) -> bool {
        matches!(self, BridgeError::NotAvailable(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
