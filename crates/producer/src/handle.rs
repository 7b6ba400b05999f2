//! RouteHandle - hosts a producer behind a bounded queue and worker task

use std::sync::Arc;

use contracts::Message;
use identity_client::GroupService;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use crate::error::ProducerError;
use crate::metrics::RouteMetrics;
use crate::producer::GroupProducer;

/// A message waiting for the producer, plus where to send it back
struct Exchange {
    message: Message,
    reply: oneshot::Sender<Message>,
}

/// Handle to a running route worker
///
/// Messages are processed one at a time, in arrival order.
pub struct RouteHandle {
    /// Route name
    name: String,
    /// Channel to send exchanges to worker
    tx: mpsc::Sender<Exchange>,
    /// Shared metrics
    metrics: Arc<RouteMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl RouteHandle {
    /// Create a new RouteHandle and spawn the worker task
    pub fn spawn<S: GroupService + 'static>(
        name: impl Into<String>,
        producer: GroupProducer<S>,
        queue_capacity: usize,
    ) -> Self {
        let name = name.into();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(RouteMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            route_worker(producer, rx, worker_metrics, worker_name).await;
        });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get route name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<RouteMetrics> {
        &self.metrics
    }

    /// Send a message through the route and wait for the processed result
    ///
    /// Waits for queue capacity. The returned message may carry a fault; `Err`
    /// only means the route itself is gone.
    pub async fn request(&self, message: Message) -> Result<Message, ProducerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Exchange {
                message,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ProducerError::RouteClosed)?;
        self.update_queue_len();

        reply_rx.await.map_err(|_| ProducerError::RouteClosed)
    }

    /// Like [`request`](Self::request) but fails fast when the queue is full
    ///
    /// A rejected message is dropped and counted.
    pub async fn try_request(&self, message: Message) -> Result<Message, ProducerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        match self.tx.try_send(Exchange {
            message,
            reply: reply_tx,
        }) {
            Ok(()) => self.update_queue_len(),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.inc_rejected_count();
                warn!(route = %self.name, "Queue full, message rejected");
                return Err(ProducerError::QueueFull);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(route = %self.name, "Route worker closed unexpectedly");
                return Err(ProducerError::RouteClosed);
            }
        }

        reply_rx.await.map_err(|_| ProducerError::RouteClosed)
    }

    fn update_queue_len(&self) {
        let len = self.tx.max_capacity() - self.tx.capacity();
        self.metrics.set_queue_len(len);
        observability::record_queue_depth(&self.name, len);
    }

    /// Shutdown the route worker gracefully
    ///
    /// Messages already queued are still processed.
    #[instrument(name = "route_handle_shutdown", skip(self), fields(route = %self.name))]
    pub async fn shutdown(self) {
        // Drop sender to signal worker to stop
        drop(self.tx);
        // Wait for worker to finish
        if let Err(e) = self.worker_handle.await {
            error!(route = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(route = %self.name, "RouteHandle shutdown complete");
    }
}

/// Worker task that feeds queued messages to the producer
#[instrument(
    name = "route_worker_loop",
    skip(producer, rx, metrics),
    fields(route = %name)
)]
async fn route_worker<S: GroupService>(
    producer: GroupProducer<S>,
    mut rx: mpsc::Receiver<Exchange>,
    metrics: Arc<RouteMetrics>,
    name: String,
) {
    debug!(route = %name, "Route worker started");

    while let Some(Exchange { mut message, reply }) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        if producer.process(&mut message).await.is_err() {
            metrics.inc_fault_count();
        }
        metrics.inc_processed_count();

        if reply.send(message).is_err() {
            warn!(route = %name, "Requester went away before the reply");
        }
    }

    debug!(route = %name, "Route worker stopped");
}
