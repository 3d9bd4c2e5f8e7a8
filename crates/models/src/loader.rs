//! Startup model loading.
//!
//! Loading never fails: an unset URL, an unreachable or unresponsive server,
//! or a server without a given model each yield `None` for that capability,
//! logged at `warn`.

use std::sync::Arc;
use std::time::Duration;

use crate::api::ModelServerApi;
use crate::provider::{ScoringModel, TextGenerator};
use crate::remote::{RemoteGenerator, RemoteScorer};

/// Models available to the pipeline after startup.
#[derive(Clone, Default)]
pub struct LoadedModels {
    pub scorer: Option<Arc<dyn ScoringModel>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl LoadedModels {
    /// No models at all (offline mode).
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether every loaded model tolerates concurrent calls. Vacuously true
    /// when nothing is loaded.
    pub fn is_reentrant(&self) -> bool {
        self.scorer.as_ref().is_none_or(|s| s.is_reentrant())
            && self.generator.as_ref().is_none_or(|g| g.is_reentrant())
    }
}

/// Ask the model server at `url` what it serves and wrap whatever it has loaded.
///
/// `force_serial` marks every loaded model as non-reentrant regardless of
/// what the server reports. A server that does not answer `GET /info` within
/// `info_timeout` is treated as unavailable.
pub async fn load_models(
    url: Option<&str>,
    force_serial: bool,
    info_timeout: Duration,
) -> LoadedModels {
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        tracing::warn!("MODEL_SERVER_URL not set, running without models");
        return LoadedModels::none();
    };

    let api = match ModelServerApi::new(url) {
        Ok(api) => api,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build model server client, running without models");
            return LoadedModels::none();
        }
    };
    let info = match api.info(info_timeout).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, url = %api.api_url(), "Model server unavailable, running without models");
            return LoadedModels::none();
        }
    };

    let reentrant = info.reentrant && !force_serial;

    let scorer = match info.scorer {
        Some(s) => {
            tracing::info!(model = %s.name, feature_width = s.feature_width, reentrant, "Scoring model loaded");
            Some(Arc::new(RemoteScorer::new(api.clone(), s.name, s.feature_width, reentrant))
                as Arc<dyn ScoringModel>)
        }
        None => {
            tracing::warn!("Model server has no scoring model loaded");
            None
        }
    };

    let generator = match info.generator {
        Some(g) => {
            tracing::info!(model = %g.name, reentrant, "Text generator loaded");
            Some(Arc::new(RemoteGenerator::new(api, g.name, reentrant)) as Arc<dyn TextGenerator>)
        }
        None => {
            tracing::warn!("Model server has no text generator loaded");
            None
        }
    };

    LoadedModels { scorer, generator }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const INFO_TIMEOUT: Duration = Duration::from_millis(300);

    #[tokio::test]
    async fn missing_url_loads_nothing() {
        let models = load_models(None, false, INFO_TIMEOUT).await;
        assert!(models.scorer.is_none());
        assert!(models.generator.is_none());
        assert!(models.is_reentrant());
    }

    #[tokio::test]
    async fn blank_url_loads_nothing() {
        let models = load_models(Some("  "), false, INFO_TIMEOUT).await;
        assert!(models.scorer.is_none());
    }

    #[tokio::test]
    async fn unreachable_server_loads_nothing() {
        // Port 1 on loopback refuses connections.
        let models = load_models(Some("http://127.0.0.1:1"), false, INFO_TIMEOUT).await;
        assert!(models.scorer.is_none());
        assert!(models.generator.is_none());
    }

    #[tokio::test]
    async fn silent_server_is_abandoned_after_the_info_timeout() {
        // Accepts connections but never writes a response.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let (socket, _) = listener.accept().await.unwrap();
                held.push(socket);
            }
        });

        let started = Instant::now();
        let models = load_models(Some(&format!("http://{addr}")), false, INFO_TIMEOUT).await;
        let elapsed = started.elapsed();

        assert!(models.scorer.is_none());
        assert!(models.generator.is_none());
        assert!(elapsed >= INFO_TIMEOUT, "returned before the info timeout: {elapsed:?}");
        assert!(elapsed < INFO_TIMEOUT * 10, "info request was not bounded: {elapsed:?}");
        server.abort();
    }
}
