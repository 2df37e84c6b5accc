//! Process-wide service instance.
//!
//! UI layers that cannot thread a [`CoreService`] handle through their
//! component tree initialize it once at startup and fetch it with
//! [`current`]. [`shutdown`] tears the session down and clears the slot so a
//! later [`initialize`] starts fresh.

use crate::error::{CoreError, Result};
use crate::CoreService;
use core_runtime::config::CoreConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

static INSTANCE: RwLock<Option<Arc<CoreService>>> = RwLock::new(None);

/// Build the service and install it as the process-wide instance.
///
/// # Errors
/// [`CoreError::AlreadyInitialized`] when an instance is installed, or any
/// error from [`CoreService::new`].
pub async fn initialize(config: CoreConfig) -> Result<Arc<CoreService>> {
    if is_initialized() {
        return Err(CoreError::AlreadyInitialized);
    }

    let service = Arc::new(CoreService::new(config).await?);

    let installed = {
        let mut slot = INSTANCE.write();
        if slot.is_some() {
            false
        } else {
            *slot = Some(Arc::clone(&service));
            true
        }
    };

    if !installed {
        warn!("Concurrent initialization detected; discarding the second service");
        service.shutdown().await;
        return Err(CoreError::AlreadyInitialized);
    }

    info!("Core service instance installed");
    Ok(service)
}

/// The installed instance.
///
/// # Errors
/// [`CoreError::NotInitialized`] before [`initialize`] or after [`shutdown`].
pub fn current() -> Result<Arc<CoreService>> {
    INSTANCE.read().clone().ok_or(CoreError::NotInitialized)
}

pub fn is_initialized() -> bool {
    INSTANCE.read().is_some()
}

/// Shut down and remove the installed instance. No-op when none is
/// installed.
pub async fn shutdown() {
    let service = INSTANCE.write().take();
    if let Some(service) = service {
        service.shutdown().await;
        info!("Core service instance removed");
    }
}
