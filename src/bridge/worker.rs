use std::thread;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::sync::oneshot;

use crate::error::{BridgeError, BridgeResult};

use super::call::{CallOutcome, MethodCall};
use super::ops::BridgeOps;

enum WorkerRequest {
    Call {
        call: MethodCall,
        reply: oneshot::Sender<CallOutcome>,
    },
    Shutdown,
}

/// One dedicated thread draining calls in submission order. Jobs run to
/// completion one at a time; there is no cancellation.
pub(crate) struct BridgeWorker {
    request_tx: UnboundedSender<WorkerRequest>,
    thread: Option<thread::JoinHandle<()>>,
}

impl BridgeWorker {
    pub(crate) fn spawn(ops: BridgeOps) -> BridgeResult<Self> {
        let (request_tx, request_rx) = unbounded_channel();
        let thread = thread::Builder::new()
            .name("pdf-bridge-worker".to_string())
            .spawn(move || worker_main(ops, request_rx))
            .map_err(|source| {
                BridgeError::io_with_context(source, "failed to spawn bridge worker thread")
            })?;

        Ok(Self {
            request_tx,
            thread: Some(thread),
        })
    }

    /// Enqueues a call and hands back the receiver its outcome will arrive
    /// on. If the worker is gone the receiver resolves to an error.
    pub(crate) fn submit(&self, call: MethodCall) -> oneshot::Receiver<CallOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self.request_tx.send(WorkerRequest::Call {
            call,
            reply: reply_tx,
        });
        reply_rx
    }

    fn shutdown(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for BridgeWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_main(ops: BridgeOps, mut request_rx: UnboundedReceiver<WorkerRequest>) {
    while let Some(request) = request_rx.blocking_recv() {
        match request {
            WorkerRequest::Call { call, reply } => {
                let outcome = ops.dispatch(&call);
                // The caller may have given up waiting; nothing to do then.
                let _ = reply.send(outcome);
            }
            WorkerRequest::Shutdown => break,
        }
    }
}
