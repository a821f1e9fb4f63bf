//! The single dispatch worker.

use super::policy::{decide, Decision};
use super::queue::RequestQueue;
use crate::cache::{Fingerprint, FingerprintCache};
use crate::config::SchedulerSettings;
use crate::metrics::MetricsRecorder;
use crate::provider::{Completion, CompletionSource};
use crate::resilience::AdmissionController;
use crate::style_guide::StyleGuide;
use crate::types::{OptimizeRequest, OptimizeResponse, ResponseSource, TextStats};
use crate::validation::{sanitize, LocalRewriter, ResponseValidator};
use crate::Error;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, Notify};
use tokio::time::{interval, timeout, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A queued request plus the channel its caller is waiting on.
pub(crate) struct Pending {
    pub request: OptimizeRequest,
    /// Metrics start timestamp.
    pub started: Instant,
    pub reply: oneshot::Sender<OptimizeResponse>,
}

/// State shared between the client handle and the dispatcher.
pub(crate) struct SchedulerState {
    queue: Mutex<RequestQueue<Pending>>,
    wake: Notify,
    pub cache: FingerprintCache,
    pub metrics: MetricsRecorder,
}

impl SchedulerState {
    pub fn new(cache: FingerprintCache, max_queue_len: usize) -> Self {
        Self {
            queue: Mutex::new(RequestQueue::new(max_queue_len)),
            wake: Notify::new(),
            cache,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn queue(&self) -> MutexGuard<'_, RequestQueue<Pending>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue and wake the dispatcher. A full queue hands the request back.
    pub fn enqueue(&self, pending: Pending) -> std::result::Result<(), Pending> {
        let priority = pending.request.priority;
        self.queue().try_push(priority, pending)?;
        self.wake.notify_one();
        Ok(())
    }

    /// Record the outcome and hand it to the waiting caller.
    pub fn resolve(&self, pending: Pending, response: OptimizeResponse) {
        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        self.metrics
            .record_response(pending.started, response.success, elapsed_ms);
        // The caller may have dropped its submission.
        let _ = pending.reply.send(response);
    }
}

/// Owns the token bucket and makes the only provider calls.
///
/// Runs until its cancellation token fires, then fails the in-flight request and whatever is
/// still queued with [`Error::Shutdown`].
pub(crate) struct Dispatcher {
    pub state: Arc<SchedulerState>,
    pub admission: AdmissionController,
    pub source: Arc<dyn CompletionSource>,
    pub settings: SchedulerSettings,
    pub similarity_threshold: f64,
    pub rewriter: LocalRewriter,
    pub style_guide: Arc<StyleGuide>,
    pub scene: String,
    pub cancel: CancellationToken,
}

impl Dispatcher {
    pub async fn run(mut self) {
        let mut ticker = interval(self.settings.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                _ = state.wake.notified() => {}
            }

            self.drain().await;
            if cancel.is_cancelled() {
                break;
            }
        }

        let abandoned = state.queue().drain();
        if !abandoned.is_empty() {
            info!(count = abandoned.len(), "dispatcher stopped with queued requests");
        }
        for pending in abandoned {
            state.resolve(pending, OptimizeResponse::failure(&Error::Shutdown));
        }
    }

    /// Dispatch while requests are queued and tokens remain.
    async fn drain(&mut self) {
        loop {
            if self.cancel.is_cancelled() || self.state.queue().is_empty() {
                return;
            }
            if !self.admission.try_consume() {
                let snapshot = self.admission.snapshot();
                debug!(
                    queued = self.state.queue().len(),
                    wait_ms = snapshot.estimated_wait_ms,
                    "admission throttled"
                );
                return;
            }
            let Some(pending) = self.state.queue().pop() else {
                return;
            };
            self.dispatch(pending).await;
        }
    }

    fn cached(&self, request: &OptimizeRequest) -> Option<OptimizeResponse> {
        let cache = &self.state.cache;
        let exact = Fingerprint::new(request.mode, request.text.clone());
        if cache.contains(&exact) {
            return cache.get(&exact).map(|r| r.as_cached());
        }
        let similar = cache.find_similar(&request.text, request.mode, self.similarity_threshold)?;
        cache.get(&similar).map(|r| {
            let mut resp = r.as_cached();
            if let Some(text) = resp.optimized_text.as_deref() {
                resp.stats = Some(TextStats::compute(&request.text, text));
            }
            resp.warnings
                .push("served from a cached result for similar text".to_string());
            resp
        })
    }

    async fn dispatch(&self, mut pending: Pending) {
        let request = &pending.request;
        debug!(
            request_id = request.id.as_str(),
            priority = request.priority,
            retry_count = request.retry_count,
            "dispatching"
        );

        if let Some(hit) = self.cached(request) {
            debug!(request_id = request.id.as_str(), "served from cache at dispatch");
            self.state.metrics.record_cache_hit();
            self.state.resolve(pending, hit);
            return;
        }

        let started = Instant::now();
        let call = timeout(
            self.settings.dispatch_timeout(),
            self.source.complete(&request.text, request.mode),
        );
        let finished = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            finished = call => Some(finished),
        };
        let outcome = match finished {
            Some(Ok(outcome)) => outcome,
            Some(Err(_)) => Err(Error::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
            None => {
                info!(request_id = request.id.as_str(), "dispatcher stopped mid-call");
                self.state
                    .resolve(pending, OptimizeResponse::failure(&Error::Shutdown));
                return;
            }
        };

        let response = match outcome {
            Ok(Completion::Provider {
                text,
                model,
                endpoint,
            }) => {
                let text = if sanitize::has_markup(&text) {
                    debug!(request_id = request.id.as_str(), "stripped markup from candidate");
                    sanitize::strip_html(&text)
                } else {
                    text
                };
                let verdict = ResponseValidator::strict().validate(&request.text, &text);
                if verdict.valid {
                    OptimizeResponse::success(
                        &request.text,
                        text,
                        ResponseSource::Provider { model, endpoint },
                    )
                    .with_warnings(verdict.warnings)
                } else {
                    let reason = verdict
                        .reason
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "rejected".to_string());
                    self.local_fallback(request, reason)
                }
            }
            Ok(Completion::Local { text, reason }) => self.local_response(request, text, reason),
            Err(err) => match decide(&err, request.retry_count, self.settings.max_retries) {
                Decision::Requeue => {
                    pending.request.escalate();
                    warn!(
                        request_id = pending.request.id.as_str(),
                        retry_count = pending.request.retry_count,
                        error = %err,
                        "retryable failure, requeued with escalated priority"
                    );
                    let priority = pending.request.priority;
                    self.state.queue().push_unbounded(priority, pending);
                    return;
                }
                Decision::Fail => {
                    warn!(
                        request_id = request.id.as_str(),
                        class = err.class().name(),
                        error = %err,
                        "request failed"
                    );
                    OptimizeResponse::failure(&err)
                }
                Decision::Fallback => self.local_fallback(request, err.to_string()),
            },
        };

        let response = self.annotate(response);
        if response.success {
            let fp = Fingerprint::new(pending.request.mode, pending.request.text.clone());
            self.state.cache.set(fp, response.clone());
        }
        self.state.resolve(pending, response);
    }

    fn local_fallback(&self, request: &OptimizeRequest, reason: String) -> OptimizeResponse {
        let text = self.rewriter.rewrite(&request.text, request.mode);
        self.local_response(request, text, reason)
    }

    fn local_response(
        &self,
        request: &OptimizeRequest,
        text: String,
        reason: String,
    ) -> OptimizeResponse {
        info!(request_id = request.id.as_str(), reason = reason.as_str(), "local rewrite applied");
        let verdict = ResponseValidator::loose().validate(&request.text, &text);
        let mut warnings = verdict.warnings;
        if let Some(rejected) = verdict.reason {
            warn!(
                request_id = request.id.as_str(),
                reason = %rejected,
                "local rewrite outside loose bounds"
            );
            warnings.push(format!("local rewrite flagged: {}", rejected));
        }
        OptimizeResponse::success(&request.text, text, ResponseSource::LocalFallback { reason })
            .with_warnings(warnings)
    }

    fn annotate(&self, response: OptimizeResponse) -> OptimizeResponse {
        let hits = match response.optimized_text.as_deref() {
            Some(text) => self.style_guide.lint(text, &self.scene),
            None => return response,
        };
        if hits.is_empty() {
            response
        } else {
            response.with_policy_hits(hits)
        }
    }
}
