//! Runtime utilities for callers that live outside an async context.
//!
//! Host shells (FFI entry points, `main` functions of demos) use these to
//! drive core futures without naming Tokio themselves.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be constructed or if called from within an
/// existing runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Returns `true` when called from inside a running runtime.
pub fn in_runtime() -> bool {
    Handle::try_current().is_ok()
}
