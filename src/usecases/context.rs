use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    api::HttpChatApi, infra::config::AppConfig, infra::storage_layout::StorageLayout,
    usecases::contracts::SecretStore,
};

pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub api: Arc<HttpChatApi>,
    pub secrets: Arc<dyn SecretStore>,
    /// Keeps the non-blocking log writer flushing until shutdown.
    pub log_guard: Option<WorkerGuard>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
