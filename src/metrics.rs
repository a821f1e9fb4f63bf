//! 请求指标：累计计数、耗时统计与 60 秒滑动请求速率。
//!
//! Request metrics.
//!
//! Every submission is counted by [`MetricsRecorder::record_request`] and closed by
//! [`MetricsRecorder::record_response`], including cache hits and failures resolved before
//! dispatch, so `successful + failed == total` once all submissions have resolved.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Ring buffer size for the request-rate window.
pub const RATE_RING_CAPACITY: usize = 100;
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Timing {
    sum_ms: u64,
    min_ms: Option<u64>,
    max_ms: u64,
    recent: VecDeque<Instant>,
}

#[derive(Debug)]
pub struct MetricsRecorder {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    cached: AtomicU64,
    timing: Mutex<Timing>,
}

/// Point-in-time view, serialized camelCase for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub cache_hits: u64,
    pub total_time_ms: u64,
    pub min_time_ms: u64,
    pub max_time_ms: u64,
    pub average_time_ms: f64,
    /// Requests seen in the last 60 seconds, per minute.
    pub requests_per_minute: usize,
    pub success_rate: String,
    pub cache_hit_rate: String,
}

fn percentage(part: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", part as f64 / total as f64 * 100.0)
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            cached: AtomicU64::new(0),
            timing: Mutex::new(Timing {
                sum_ms: 0,
                min_ms: None,
                max_ms: 0,
                recent: VecDeque::with_capacity(RATE_RING_CAPACITY),
            }),
        }
    }

    fn timing(&self) -> MutexGuard<'_, Timing> {
        self.timing.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count a new request and return its start timestamp.
    pub fn record_request(&self, cached: bool) -> Instant {
        let now = Instant::now();
        self.total.fetch_add(1, Ordering::Relaxed);
        if cached {
            self.cached.fetch_add(1, Ordering::Relaxed);
        }
        let mut timing = self.timing();
        if timing.recent.len() == RATE_RING_CAPACITY {
            timing.recent.pop_front();
        }
        timing.recent.push_back(now);
        now
    }

    /// Count a request that was admitted as a miss but served from the cache at dispatch.
    pub fn record_cache_hit(&self) {
        self.cached.fetch_add(1, Ordering::Relaxed);
    }

    /// Close a request started at `start`; `elapsed_ms` is the caller-observed latency.
    pub fn record_response(&self, start: Instant, success: bool, elapsed_ms: u64) {
        trace!(
            success,
            elapsed_ms,
            since_start_ms = start.elapsed().as_millis() as u64,
            "response recorded"
        );
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        let mut timing = self.timing();
        timing.sum_ms = timing.sum_ms.saturating_add(elapsed_ms);
        timing.max_ms = timing.max_ms.max(elapsed_ms);
        timing.min_ms = Some(timing.min_ms.map_or(elapsed_ms, |m| m.min(elapsed_ms)));
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let successful = self.successful.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let cached = self.cached.load(Ordering::Relaxed);

        let timing = self.timing();
        let completed = successful + failed;
        let average_time_ms = if completed == 0 {
            0.0
        } else {
            timing.sum_ms as f64 / completed as f64
        };
        let now = Instant::now();
        let requests_per_minute = timing
            .recent
            .iter()
            .filter(|t| now.duration_since(**t) <= RATE_WINDOW)
            .count();

        MetricsSnapshot {
            total_requests: total,
            successful_requests: successful,
            failed_requests: failed,
            cache_hits: cached,
            total_time_ms: timing.sum_ms,
            min_time_ms: timing.min_ms.unwrap_or(0),
            max_time_ms: timing.max_ms,
            average_time_ms,
            requests_per_minute,
            success_rate: percentage(successful, total),
            cache_hit_rate: percentage(cached, total),
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
