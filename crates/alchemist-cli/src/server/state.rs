//! Application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use alchemist::{AiGateway, AppState, Parser};

use super::error::ApiError;

/// Shared server state.
#[derive(Clone)]
pub struct ServerState {
    /// The session: tables, rules, weights and the validation report.
    pub session: Arc<RwLock<AppState>>,
    /// Parser used for uploads.
    pub parser: Parser,
    /// Directory `POST /api/export` writes to.
    pub export_dir: PathBuf,
    /// Optional AI gateway. If None, AI endpoints answer with an error and
    /// fix requests come back unavailable.
    pub gateway: Option<Arc<dyn AiGateway>>,
    /// Name of the configured gateway (for display).
    pub gateway_name: Option<String>,
}

impl ServerState {
    /// Create server state without an AI gateway.
    pub fn new(session: AppState, parser: Parser) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            parser,
            export_dir: PathBuf::from("."),
            gateway: None,
            gateway_name: None,
        }
    }

    /// Attach an AI gateway.
    pub fn with_gateway(mut self, gateway: Arc<dyn AiGateway>) -> Self {
        self.gateway_name = Some(gateway.name().to_string());
        self.gateway = Some(gateway);
        self
    }

    /// Set the export directory.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Run a gateway call on the blocking pool.
    ///
    /// The session lock is never held here; callers snapshot what they need
    /// first.
    pub async fn call_gateway<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn AiGateway) -> T + Send + 'static,
    {
        let gateway = self.gateway.clone().ok_or_else(|| {
            ApiError::Gateway(
                "AI gateway not configured. Start the server with --llm or set ALCHEMIST_PROVIDER."
                    .to_string(),
            )
        })?;

        tokio::task::spawn_blocking(move || call(gateway.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("AI task failed: {}", e)))
    }
}
