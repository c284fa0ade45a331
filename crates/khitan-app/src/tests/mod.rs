use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use khitan_config::Config;
use khitan_history::{HistoryRepository, JsonHistoryStore};
use khitan_lang::{GlossaryLoader, KhitanProcessor};
use khitan_translator::{Completion, CompletionError, CompletionRequest, CompletionService, ProviderMetadata};
use tempfile::TempDir;

use crate::state::AppState;

mod pipeline_tests;

const GLYPHS: &str = "word,meaning\n𘭾,天\n";
const PHONETIC: &str = "阿保机 (abaoji): 契丹首领\n林牙 (Línyá): 官名\n";

/// Canned completion provider that records what it was asked
pub struct FakeCompletion {
    reply: Option<String>,
    history: Arc<dyn HistoryRepository>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    /// History length observed while each request was in flight
    pub history_len_seen: Mutex<Vec<usize>>,
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.history_len_seen.lock().unwrap().push(self.history.list().len());

        match &self.reply {
            Some(text) => Ok(Completion {
                text: text.clone(),
                model: request.model.clone(),
                provider: "fake".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            }),
            None => Err(CompletionError::RateLimitExceeded),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Fake".to_string(),
            requires_api_key: false,
        }
    }
}

pub struct Fixture {
    _tmp: TempDir,
    pub state: Arc<AppState>,
    pub completion: Arc<FakeCompletion>,
    pub history: Arc<JsonHistoryStore>,
}

impl Fixture {
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.completion.requests.lock().unwrap().clone()
    }
}

/// App state over temp glossary and history files. `reply: None` makes every
/// completion fail.
pub fn fixture(api_key: &str, reply: Option<&str>) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let csv = tmp.path().join("glyphs.csv");
    let txt = tmp.path().join("phonetic.txt");
    fs::write(&csv, GLYPHS).unwrap();
    fs::write(&txt, PHONETIC).unwrap();

    let glossary = Arc::new(GlossaryLoader::load(&csv, &txt));
    let processor = Arc::new(KhitanProcessor::new(glossary));
    let history = Arc::new(JsonHistoryStore::new(tmp.path().join("history.json"), 30));

    let completion = Arc::new(FakeCompletion {
        reply: reply.map(str::to_string),
        history: history.clone(),
        requests: Mutex::new(Vec::new()),
        history_len_seen: Mutex::new(Vec::new()),
    });

    let mut config = Config::default();
    config.completion.api_key = api_key.to_string();

    let state = Arc::new(AppState::with_services(
        config,
        processor,
        history.clone(),
        completion.clone(),
    ));

    Fixture {
        _tmp: tmp,
        state,
        completion,
        history,
    }
}
