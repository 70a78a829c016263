use std::sync::Arc;

use crate::audit::AuditHandler;
use crate::config::Config;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub handler: Arc<AuditHandler>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// State with the built-in collaborators from `config.audit`
    pub fn new(config: Config) -> Self {
        let handler = AuditHandler::from_config(&config.audit);
        Self::with_handler(config, handler)
    }

    pub fn with_handler(config: Config, handler: AuditHandler) -> Self {
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
