use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use canvass_config::{BackendKind, CanvassConfig};
use canvass_core::{SurveyBackend, SurveyService};
use canvass_http::HttpBackend;
use canvass_store::SurveyStore;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SurveyService,
}

impl AppContext {
    /// Pick the backend named by `backend.kind` and wire the service.
    pub async fn init(config: &CanvassConfig) -> anyhow::Result<Self> {
        let backend = build_backend(config).await?;
        tracing::debug!(backend = backend.name(), "backend selected");
        let service = SurveyService::new(backend, config.auth.context());
        Ok(Self { service })
    }
}

async fn build_backend(config: &CanvassConfig) -> anyhow::Result<Arc<dyn SurveyBackend>> {
    let backend: Arc<dyn SurveyBackend> = match config.backend.kind {
        BackendKind::Store => {
            let path = &config.store.path;
            if !config.store.is_in_memory()
                && let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create store directory {}", parent.display())
                })?;
            }
            let store = SurveyStore::open_local(path, config.auth.context().identity().cloned())
                .await
                .with_context(|| format!("failed to open survey store at {path}"))?;
            Arc::new(store)
        }
        BackendKind::Http => {
            let http = &config.http;
            let client = HttpBackend::new(&http.base_url, http.token(), http.timeout())
                .context("failed to build HTTP client")?;
            Arc::new(client)
        }
    };
    Ok(backend)
}
