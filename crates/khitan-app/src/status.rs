use std::path::PathBuf;

use khitan_core::{Dictionary, DictionaryMetadata, Direction};

use crate::state::AppState;

/// Snapshot of loader diagnostics and session settings
#[derive(Clone, Debug)]
pub struct StatusReport {
    pub glossary: DictionaryMetadata,
    pub diagnostics: Vec<String>,
    pub direction: Direction,
    pub provider: String,
    pub model: String,
    pub has_credential: bool,
    pub history_path: PathBuf,
    pub history_len: usize,
    pub active_record: Option<String>,
}

impl StatusReport {
    pub async fn collect(state: &AppState) -> Self {
        let glossary = state.processor.glossary();
        let config = state.config.read().await;

        Self {
            glossary: glossary.metadata(),
            diagnostics: glossary.diagnostics().to_vec(),
            direction: state.direction().await,
            provider: state.completion.metadata().name,
            model: config.completion.model.clone(),
            has_credential: config.completion.has_credential(),
            history_path: config.history.path.clone(),
            history_len: state.history.list().len(),
            active_record: state.active_record.read().await.clone(),
        }
    }
}
