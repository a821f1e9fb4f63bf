use crate::types::OptimizeResponse;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Cache occupancy and lookup hit rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsSnapshot {
    pub size: usize,
    pub capacity: usize,
    /// `hits / (hits + misses)`, `0.0` before any lookup.
    pub hit_rate: f64,
}

enum Inner {
    Ready(Option<OptimizeResponse>),
    Waiting(oneshot::Receiver<OptimizeResponse>),
}

/// Future returned by [`OptimizerClient::submit`](crate::OptimizerClient::submit).
///
/// Always resolves; a client dropped before the request was processed yields a
/// `shutdown` failure response.
pub struct Submission {
    request_id: String,
    inner: Inner,
}

impl Submission {
    pub(crate) fn ready(request_id: String, response: OptimizeResponse) -> Self {
        Self {
            request_id,
            inner: Inner::Ready(Some(response)),
        }
    }

    pub(crate) fn waiting(request_id: String, rx: oneshot::Receiver<OptimizeResponse>) -> Self {
        Self {
            request_id,
            inner: Inner::Waiting(rx),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Future for Submission {
    type Output = OptimizeResponse;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            Inner::Ready(response) => Poll::Ready(
                response
                    .take()
                    .unwrap_or_else(|| OptimizeResponse::failure(&Error::Shutdown)),
            ),
            Inner::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|r| r.unwrap_or_else(|_| OptimizeResponse::failure(&Error::Shutdown))),
        }
    }
}
