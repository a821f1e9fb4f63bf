//! Multi-endpoint / multi-model failover.

use super::config::{ConfigProvider, Credentials};
use super::extract::text_from_reply;
use super::payload::{build_payload, PayloadSettings, PayloadShape};
use super::{Completion, CompletionSource};
use crate::config::ProviderSettings;
use crate::transport::HttpTransport;
use crate::types::OptimizeMode;
use crate::validation::LocalRewriter;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const BODY_SNIPPET_CHARS: usize = 200;

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", head)
    }
}

/// Production [`CompletionSource`]: probes the configured provider over HTTP.
///
/// Endpoints are walked in order with a sticky model cursor:
/// - `401`/`403` stop immediately with [`Error::Auth`]
/// - `404`, transport errors and unextractable bodies move to the next endpoint
/// - `429` moves to the next model on the same endpoint; running out of models yields
///   [`Error::RateLimited`]
/// - `5xx` stops with [`Error::Server`]
///
/// Without well-formed credentials no request is made and the local rewrite is returned.
pub struct ProviderProber {
    transport: HttpTransport,
    config: Arc<dyn ConfigProvider>,
    models: Vec<String>,
    endpoints: Vec<String>,
    payload: PayloadSettings,
    rewriter: LocalRewriter,
}

impl ProviderProber {
    pub fn new(
        settings: &ProviderSettings,
        config: Arc<dyn ConfigProvider>,
        rewriter: LocalRewriter,
    ) -> Result<Self> {
        let transport = HttpTransport::new(
            Duration::from_millis(settings.request_timeout_ms),
            settings.user_agent.clone(),
        )?;
        Ok(Self {
            transport,
            config,
            models: settings.models.clone(),
            endpoints: settings.endpoints.clone(),
            payload: settings.payload.clone(),
            rewriter,
        })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    async fn probe(
        &self,
        creds: &Credentials,
        text: &str,
        mode: OptimizeMode,
    ) -> Result<Completion> {
        let mut model_idx = 0usize;
        let mut last_error: Option<Error> = None;

        for endpoint in &self.endpoints {
            let shape = PayloadShape::for_endpoint(endpoint);
            let url = creds.endpoint_url(endpoint);

            loop {
                let Some(model) = self.models.get(model_idx) else {
                    return Err(Error::RateLimited {
                        message: "no model left to try".to_string(),
                        models_tried: model_idx,
                    });
                };
                let body = build_payload(shape, model, text, mode, &self.payload);

                let started = Instant::now();
                let outcome = self.transport.post_json(&url, &creds.api_key, &body).await;
                let duration_ms = started.elapsed().as_millis() as u64;

                let reply = match outcome {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(
                            endpoint = endpoint.as_str(),
                            model = model.as_str(),
                            duration_ms,
                            error = %e,
                            "probe attempt failed before a reply"
                        );
                        last_error = Some(e);
                        break;
                    }
                };

                let status = reply.status;
                info!(
                    endpoint = endpoint.as_str(),
                    model = model.as_str(),
                    http_status = status,
                    duration_ms,
                    "probe attempt"
                );

                match status {
                    401 | 403 => {
                        return Err(Error::Auth {
                            status,
                            message: snippet(&reply.body),
                        });
                    }
                    404 => {
                        last_error = Some(Error::from_status(status, snippet(&reply.body)));
                        break;
                    }
                    429 => {
                        model_idx += 1;
                        if model_idx >= self.models.len() {
                            return Err(Error::RateLimited {
                                message: snippet(&reply.body),
                                models_tried: self.models.len(),
                            });
                        }
                        debug!(
                            endpoint = endpoint.as_str(),
                            next_model = self.models[model_idx].as_str(),
                            "rate limited, rotating model"
                        );
                        continue;
                    }
                    s if s >= 500 => {
                        return Err(Error::Server {
                            status,
                            message: snippet(&reply.body),
                        });
                    }
                    _ if !reply.is_success() => {
                        last_error = Some(Error::from_status(status, snippet(&reply.body)));
                        break;
                    }
                    _ => match text_from_reply(&reply) {
                        Ok(text) => {
                            return Ok(Completion::Provider {
                                text,
                                model: model.clone(),
                                endpoint: endpoint.clone(),
                            });
                        }
                        Err(e) => {
                            debug!(endpoint = endpoint.as_str(), error = %e, "reply had no usable text");
                            last_error = Some(e);
                            break;
                        }
                    },
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::InvalidResponse {
            message: "no endpoint produced text".to_string(),
        }))
    }
}

#[async_trait]
impl CompletionSource for ProviderProber {
    async fn complete(&self, text: &str, mode: OptimizeMode) -> Result<Completion> {
        let creds = match self.config.credentials().await {
            Some(creds) if creds.is_well_formed() => creds,
            Some(_) => {
                info!(reason = "malformed_credentials", "using local rewrite");
                return Ok(Completion::Local {
                    text: self.rewriter.rewrite(text, mode),
                    reason: "malformed credentials".to_string(),
                });
            }
            None => {
                info!(reason = "unconfigured", "using local rewrite");
                return Ok(Completion::Local {
                    text: self.rewriter.rewrite(text, mode),
                    reason: "no provider configured".to_string(),
                });
            }
        };
        self.probe(&creds, text, mode).await
    }
}
