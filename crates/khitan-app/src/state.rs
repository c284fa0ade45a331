use std::sync::Arc;
use std::time::Duration;

use khitan_config::Config;
use khitan_core::Direction;
use khitan_history::{HistoryRepository, JsonHistoryStore};
use khitan_lang::{DeepSeekClient, KhitanProcessor};
use khitan_translator::CompletionService;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub processor: Arc<KhitanProcessor>,
    pub history: Arc<dyn HistoryRepository>,
    pub completion: Arc<dyn CompletionService>,
    /// Direction for shell queries, starts at the configured default
    pub direction: RwLock<Direction>,
    /// Id of the record last produced or opened
    pub active_record: RwLock<Option<String>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let processor = KhitanProcessor::from_sources(
            &config.glossary.tabular_path,
            &config.glossary.line_path,
            config.glossary.max_context_entries,
        );

        let history = JsonHistoryStore::new(&config.history.path, config.history.capacity);

        let completion = DeepSeekClient::new(
            config.completion.api_key.clone(),
            config.completion.api_url.clone(),
            Duration::from_secs(config.completion.timeout_seconds),
        )?;

        Ok(Self::with_services(
            config,
            Arc::new(processor),
            Arc::new(history),
            Arc::new(completion),
        ))
    }

    pub fn with_services(
        config: Config,
        processor: Arc<KhitanProcessor>,
        history: Arc<dyn HistoryRepository>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        let direction = config.default_direction;

        Self {
            config: Arc::new(RwLock::new(config)),
            processor,
            history,
            completion,
            direction: RwLock::new(direction),
            active_record: RwLock::new(None),
        }
    }

    pub async fn direction(&self) -> Direction {
        *self.direction.read().await
    }
}
