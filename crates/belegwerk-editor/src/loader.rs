// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lazy backend loading — the optional vision and drag backends are fetched
// asynchronously on first use, memoised for the rest of the process, and
// allowed to fail. A failed load degrades the session (axis-aligned warp,
// built-in pointer dragging) instead of aborting it.

use std::sync::Arc;

use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_vision::{ContourVision, VisionBackend};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::drag::{DragBackend, PointerDrag};

/// Injected capability that produces the optional backends.
///
/// Implementations may hit the network, load a dynamic library, or simply
/// hand back bundled objects. Loading must be safe to attempt repeatedly;
/// [`LazyBackends`] guarantees at most one *successful* load is kept.
pub trait BackendLoader {
    /// Load the vision backend (detection + projective warp).
    async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>>;

    /// Load the alternate drag backend.
    async fn load_drag(&self) -> Result<Arc<dyn DragBackend>>;
}

/// Memoising wrapper around a [`BackendLoader`].
///
/// The first successful load of each backend is cached; later calls return
/// the cached instance without touching the loader again. A failed load
/// leaves the cell empty, so the next call retries.
pub struct LazyBackends<L> {
    loader: L,
    vision: OnceCell<Arc<dyn VisionBackend>>,
    drag: OnceCell<Arc<dyn DragBackend>>,
}

impl<L: BackendLoader> LazyBackends<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            vision: OnceCell::new(),
            drag: OnceCell::new(),
        }
    }

    /// The vision backend, loading it on first use.
    pub async fn vision(&self) -> Result<Arc<dyn VisionBackend>> {
        self.vision
            .get_or_try_init(|| self.loader.load_vision())
            .await
            .cloned()
    }

    /// The vision backend only if a previous load already succeeded.
    ///
    /// Used where the session wants to *consult* the backend without paying
    /// for a load — e.g. auto-detection under an axis-aligned warp
    /// configuration.
    pub fn vision_if_loaded(&self) -> Option<Arc<dyn VisionBackend>> {
        self.vision.get().cloned()
    }

    /// The drag backend, loading it on first use.
    pub async fn drag(&self) -> Result<Arc<dyn DragBackend>> {
        self.drag
            .get_or_try_init(|| self.loader.load_drag())
            .await
            .cloned()
    }
}

/// Loader returning the backends bundled with this workspace.
pub struct BundledLoader;

impl BackendLoader for BundledLoader {
    async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>> {
        debug!("loading bundled contour vision backend");
        Ok(Arc::new(ContourVision))
    }

    async fn load_drag(&self) -> Result<Arc<dyn DragBackend>> {
        debug!("loading bundled pointer drag backend");
        Ok(Arc::new(PointerDrag))
    }
}

/// Loader for environments without optional backends.
///
/// Every load fails, which drives sessions onto their degraded paths: the
/// default quadrilateral, the axis-aligned crop engine, and built-in pointer
/// dragging.
pub struct UnavailableLoader;

impl BackendLoader for UnavailableLoader {
    async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>> {
        tracing::warn!("BackendLoader::load_vision called on unavailable loader");
        Err(BelegwerkError::BackendUnavailable)
    }

    async fn load_drag(&self) -> Result<Arc<dyn DragBackend>> {
        tracing::warn!("BackendLoader::load_drag called on unavailable loader");
        Err(BelegwerkError::BackendUnavailable)
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts loads; fails the first `failures` attempts.
    struct CountingLoader {
        calls: AtomicUsize,
        failures: usize,
    }

    impl CountingLoader {
        fn new(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
            }
        }
    }

    impl BackendLoader for CountingLoader {
        async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(BelegwerkError::BackendUnavailable)
            } else {
                Ok(Arc::new(ContourVision))
            }
        }

        async fn load_drag(&self) -> Result<Arc<dyn DragBackend>> {
            Ok(Arc::new(PointerDrag))
        }
    }

    /// A successful load is memoised — the loader runs once.
    #[tokio::test]
    async fn successful_load_is_idempotent() {
        let backends = LazyBackends::new(CountingLoader::new(0));
        assert!(backends.vision().await.is_ok());
        assert!(backends.vision().await.is_ok());
        assert!(backends.vision().await.is_ok());
        assert_eq!(backends.loader.calls.load(Ordering::SeqCst), 1);
    }

    /// A failed load leaves the cell empty so the next call retries.
    #[tokio::test]
    async fn failed_load_retries() {
        let backends = LazyBackends::new(CountingLoader::new(1));
        assert!(backends.vision().await.is_err());
        assert!(backends.vision_if_loaded().is_none());
        assert!(backends.vision().await.is_ok());
        assert_eq!(backends.loader.calls.load(Ordering::SeqCst), 2);
    }

    /// `vision_if_loaded` never triggers a load.
    #[tokio::test]
    async fn if_loaded_does_not_load() {
        let backends = LazyBackends::new(CountingLoader::new(0));
        assert!(backends.vision_if_loaded().is_none());
        assert_eq!(backends.loader.calls.load(Ordering::SeqCst), 0);
    }

    /// The unavailable loader always fails.
    #[tokio::test]
    async fn unavailable_loader_fails() {
        let backends = LazyBackends::new(UnavailableLoader);
        assert!(matches!(
            backends.vision().await,
            Err(BelegwerkError::BackendUnavailable)
        ));
        assert!(matches!(
            backends.drag().await,
            Err(BelegwerkError::BackendUnavailable)
        ));
    }
}
