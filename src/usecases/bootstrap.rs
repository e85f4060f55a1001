use std::{path::Path, sync::Arc};

use crate::{
    api::HttpChatApi,
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        secret_store::FileSecretStore, storage_layout::StorageLayout,
    },
    usecases::{
        chatrooms::ChatroomDirectory, context::AppContext, feed::MessagesApi,
        session::SessionManager,
    },
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let mut context = build_context(config_path, layout)?;
    context.log_guard = infra::logging::init(&context.config.logging, &context.layout.log_dir)?;

    tracing::debug!(
        base_url = %context.config.api.base_url,
        secrets = %context.layout.secrets_file().display(),
        "application context ready"
    );

    Ok(context)
}

fn build_context(config_path: Option<&Path>, layout: StorageLayout) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let config = config_adapter.load().map_err(AppError::Other)?;
    let api = Arc::new(HttpChatApi::new(&config.api)?);
    let secrets = Arc::new(FileSecretStore::new(layout.secrets_file()));

    Ok(AppContext {
        config,
        layout,
        api,
        secrets,
        log_guard: None,
    })
}

/// Engine components wired to the shared HTTP client and secret store.
pub struct Engine {
    pub sessions: SessionManager,
    pub directory: ChatroomDirectory,
    pub messages: Arc<dyn MessagesApi>,
}

pub fn compose_engine(context: &AppContext) -> Engine {
    Engine {
        sessions: SessionManager::new(context.api.clone(), context.secrets.clone()),
        directory: ChatroomDirectory::new(context.api.clone()),
        messages: context.api.clone(),
    }
}
