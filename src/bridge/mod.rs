use std::sync::{Arc, Mutex};

use crate::backend::{DocumentLoader, HayroDocumentLoader};
use crate::cache::PageCache;
use crate::config::{BridgeConfig, RenderConfig};
use crate::error::{BridgeError, BridgeResult};

mod call;
mod ops;
mod worker;


pub use call::{CallOutcome, MethodCall};
pub use ops::CLEAR_CACHE_ACK;

use ops::BridgeOps;
use worker::BridgeWorker;

/// Receives named calls, runs them on the lazily-created background worker,
/// and resolves each one back on the caller's async context.
pub struct PdfViewerBridge {
    loader: Arc<dyn DocumentLoader>,
    cache: PageCache,
    render: RenderConfig,
    worker: Mutex<Option<Arc<BridgeWorker>>>,
}

impl PdfViewerBridge {
    pub fn new(config: &BridgeConfig) -> BridgeResult<Self> {
        Self::with_loader(config, Arc::new(HayroDocumentLoader))
    }

    pub fn with_loader(
        config: &BridgeConfig,
        loader: Arc<dyn DocumentLoader>,
    ) -> BridgeResult<Self> {
        Ok(Self {
            loader,
            cache: PageCache::from_config(&config.cache)?,
            render: config.render.clone(),
            worker: Mutex::new(None),
        })
    }

    /// Handles one call. Always resolves: failures inside the operations
    /// collapse to `Success(None)`, unknown methods to `NotImplemented`.
    pub async fn handle(&self, call: MethodCall) -> CallOutcome {
        let reply_rx = match self.ensure_worker() {
            Ok(worker) => worker.submit(call),
            Err(err) => {
                tracing::error!(error = %err, "bridge worker could not be started");
                return CallOutcome::Success(None);
            }
        };

        match reply_rx.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("bridge worker dropped a call reply");
                CallOutcome::Success(None)
            }
        }
    }

    /// Returns the worker, creating it on first use. The lock guarantees
    /// concurrent first calls agree on a single instance.
    fn ensure_worker(&self) -> BridgeResult<Arc<BridgeWorker>> {
        let mut slot = self
            .worker
            .lock()
            .map_err(|_| BridgeError::worker("worker guard is poisoned"))?;

        if let Some(worker) = slot.as_ref() {
            return Ok(Arc::clone(worker));
        }

        let ops = BridgeOps::new(
            Arc::clone(&self.loader),
            self.cache.clone(),
            self.render.clone(),
        );
        let worker = Arc::new(BridgeWorker::spawn(ops)?);
        *slot = Some(Arc::clone(&worker));
        Ok(worker)
    }
}
