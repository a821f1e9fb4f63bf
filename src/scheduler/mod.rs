//! 请求调度模块：优先级队列、令牌桶准入与单一分发任务。
//!
//! # Request Scheduler
//!
//! Pending requests wait in a bounded [`RequestQueue`] ordered by priority (higher first)
//! and then by enqueue order. A single dispatcher task drains it:
//!
//! 1. wake on the tick interval or when a request is enqueued
//! 2. take a token from the [`AdmissionController`](crate::resilience::AdmissionController),
//!    stop draining if none is left
//! 3. serve from the cache (exact, then similar) or call the completion source
//! 4. validate the candidate, falling back to the local rewrite when it is rejected
//! 5. write successes back to the cache, record metrics and resolve the caller
//!
//! Retryable failures (network, timeout, 5xx, rate limiting) are requeued with
//! `priority = i32::MAX` up to `max_retries` times. At most one provider call is in flight
//! per client.

mod dispatcher;
mod policy;
mod queue;

pub(crate) use dispatcher::{Dispatcher, Pending, SchedulerState};
pub use queue::RequestQueue;
