use crate::cache::FingerprintCache;
use crate::client::core::OptimizerClient;
use crate::config::ClientConfig;
use crate::provider::{CompletionSource, ConfigProvider, ProviderProber, StaticConfig};
use crate::resilience::AdmissionController;
use crate::scheduler::{Dispatcher, SchedulerState};
use crate::style_guide::StyleGuide;
use crate::validation::LocalRewriter;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DEFAULT_SCENE: &str = "general";

/// Builder for [`OptimizerClient`].
///
/// Without a [`ConfigProvider`] the client has no credentials and every request is served
/// by the local rewrite.
pub struct OptimizerClientBuilder {
    config: ClientConfig,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    style_guide: Arc<StyleGuide>,
    scene: String,
    completion_source: Option<Arc<dyn CompletionSource>>,
}

impl OptimizerClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            config_provider: None,
            style_guide: Arc::new(StyleGuide::default()),
            scene: DEFAULT_SCENE.to_string(),
            completion_source: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config_provider(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.config_provider = Some(provider);
        self
    }

    pub fn style_guide(mut self, guide: StyleGuide) -> Self {
        self.style_guide = Arc::new(guide);
        self
    }

    /// Style-guide scene used for lint annotations and local glossary substitutions.
    pub fn scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = scene.into();
        self
    }

    /// Replace the HTTP prober. Primarily for tests.
    pub fn completion_source(mut self, source: Arc<dyn CompletionSource>) -> Self {
        self.completion_source = Some(source);
        self
    }

    /// Build the client and spawn its dispatcher. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<OptimizerClient> {
        let config = self.config;
        config.validate()?;

        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            Error::configuration_with_context(
                "OptimizerClient must be built inside a tokio runtime",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("client_builder"),
            )
        })?;

        let rewriter = LocalRewriter::new().with_glossary(self.style_guide.glossary(&self.scene));
        let source: Arc<dyn CompletionSource> = match self.completion_source {
            Some(source) => source,
            None => {
                let provider = self
                    .config_provider
                    .unwrap_or_else(|| Arc::new(StaticConfig::empty()));
                Arc::new(ProviderProber::new(
                    &config.provider,
                    provider,
                    rewriter.clone(),
                )?)
            }
        };

        let state = Arc::new(SchedulerState::new(
            FingerprintCache::new(config.cache.capacity),
            config.scheduler.max_queue_len,
        ));
        let cancel = CancellationToken::new();

        let dispatcher = Dispatcher {
            state: Arc::clone(&state),
            admission: AdmissionController::new(config.admission.to_admission_config()),
            source,
            settings: config.scheduler.clone(),
            similarity_threshold: config.cache.similarity_threshold,
            rewriter,
            style_guide: Arc::clone(&self.style_guide),
            scene: self.scene.clone(),
            cancel: cancel.clone(),
        };
        let worker = handle.spawn(dispatcher.run());

        info!(
            cache_capacity = config.cache.capacity,
            max_tokens = config.admission.max_tokens,
            refill_rate = config.admission.refill_rate,
            scene = self.scene.as_str(),
            "optimizer client started"
        );

        Ok(OptimizerClient {
            state,
            style_guide: self.style_guide,
            scene: self.scene,
            max_queue_len: config.scheduler.max_queue_len,
            cancel,
            worker: Some(worker),
        })
    }
}

impl Default for OptimizerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
