use crate::cache::Fingerprint;
use crate::client::types::{CacheStatsSnapshot, Submission};
use crate::metrics::MetricsSnapshot;
use crate::scheduler::{Pending, SchedulerState};
use crate::style_guide::{PolicyHit, StyleGuide};
use crate::types::{OptimizeMode, OptimizeRequest, OptimizeResponse};
use crate::{Error, ErrorContext};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One optimization client: cache, admission gate, priority queue and dispatcher.
///
/// Construct through [`OptimizerClientBuilder`](crate::OptimizerClientBuilder). Dropping the
/// client stops the dispatcher; submissions still pending resolve with a `shutdown` failure.
pub struct OptimizerClient {
    pub(crate) state: Arc<SchedulerState>,
    pub(crate) style_guide: Arc<StyleGuide>,
    pub(crate) scene: String,
    pub(crate) max_queue_len: usize,
    pub(crate) cancel: CancellationToken,
    pub(crate) worker: Option<JoinHandle<()>>,
}

impl OptimizerClient {
    pub fn builder() -> crate::OptimizerClientBuilder {
        crate::OptimizerClientBuilder::new()
    }

    /// Queue `text` for optimization. Returns immediately.
    ///
    /// Exact cache hits resolve without entering the queue. A full queue resolves with a
    /// `queue_full` failure.
    pub fn submit(&self, text: impl Into<String>, mode: OptimizeMode, priority: i32) -> Submission {
        let request = OptimizeRequest::new(text, mode, priority);
        let metrics = &self.state.metrics;

        if request.text.trim().is_empty() {
            let started = metrics.record_request(false);
            metrics.record_response(started, false, 0);
            let err = Error::validation_with_context(
                "nothing to optimize",
                ErrorContext::new()
                    .with_field_path("text")
                    .with_source("optimizer_client"),
            );
            return Submission::ready(request.id, OptimizeResponse::failure(&err));
        }

        let fingerprint = Fingerprint::new(mode, request.text.clone());
        if let Some(hit) = self.state.cache.get(&fingerprint) {
            debug!(request_id = request.id.as_str(), "served from cache on submit");
            let started = metrics.record_request(true);
            metrics.record_response(started, true, 0);
            return Submission::ready(request.id, hit.as_cached());
        }

        let started = metrics.record_request(false);
        if self.cancel.is_cancelled() {
            metrics.record_response(started, false, 0);
            return Submission::ready(request.id, OptimizeResponse::failure(&Error::Shutdown));
        }

        let id = request.id.clone();
        let (reply, rx) = oneshot::channel();
        let pending = Pending {
            request,
            started,
            reply,
        };
        if let Err(pending) = self.state.enqueue(pending) {
            warn!(
                request_id = id.as_str(),
                capacity = self.max_queue_len,
                "queue full, request rejected"
            );
            let err = Error::QueueFull {
                capacity: self.max_queue_len,
            };
            self.state.resolve(pending, OptimizeResponse::failure(&err));
        }
        Submission::waiting(id, rx)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.state.metrics.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        let cache = &self.state.cache;
        CacheStatsSnapshot {
            size: cache.len(),
            capacity: cache.capacity(),
            hit_rate: cache.stats().hit_ratio(),
        }
    }

    pub fn clear_cache(&self) {
        self.state.cache.clear();
    }

    /// Requests waiting for dispatch.
    pub fn queue_len(&self) -> usize {
        self.state.queue().len()
    }

    /// Style-guide annotations for `text` in the client's scene.
    pub fn lint(&self, text: &str) -> Vec<PolicyHit> {
        self.style_guide.lint(text, &self.scene)
    }

    /// Stop the dispatcher and wait for it to fail any queued requests.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!(error = %e, "dispatcher task ended abnormally");
            }
        }
    }
}

impl Drop for OptimizerClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
