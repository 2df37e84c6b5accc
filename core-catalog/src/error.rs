use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Track not found: {id}")]
    NotFound { id: String },

    #[error("Invalid track {id}: {message}")]
    InvalidTrack { id: String, message: String },

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl CatalogError {
    pub fn not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
