use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core service already initialized")]
    AlreadyInitialized,

    #[error("Core service not initialized")]
    NotInitialized,

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),
}

impl CoreError {
    /// Returns `true` when the error is an unknown track id.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::Catalog(core_catalog::CatalogError::NotFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
