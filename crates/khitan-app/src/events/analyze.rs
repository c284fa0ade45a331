use khitan_core::{ContextBlock, DefaultPreprocessor, Direction, LanguageProcessor, Preprocessor, QueryError};
use khitan_history::HistoryRecord;
use khitan_lang::prompt;
use khitan_translator::CompletionRequest;

use crate::render;
use crate::state::AppState;

/// Outcome of one successful query
#[derive(Debug)]
pub struct Analysis {
    pub record: HistoryRecord,
    pub context: ContextBlock,
}

/// Validate, retrieve, complete, then persist. Nothing is stored unless the
/// completion call succeeds.
pub async fn analyze(state: &AppState, query: &str, direction: Direction) -> anyhow::Result<Analysis> {
    let (api_key, model, temperature) = {
        let config = state.config.read().await;
        (
            config.completion.api_key.clone(),
            config.completion.model.clone(),
            config.completion.temperature,
        )
    };

    let query = DefaultPreprocessor.process(query);
    QueryError::validate(&api_key, &query)?;
    let query = query.as_str();

    let context = state.processor.retrieve(query, direction);
    tracing::info!(
        "Analyzing '{}' ({}) with {} context entries",
        query,
        direction,
        context.match_count
    );

    let request = CompletionRequest {
        system_prompt: prompt::system_prompt(direction, &context.text),
        user_message: prompt::user_message(query),
        model,
        temperature,
    };

    let completion = state.completion.complete(&request).await.map_err(|e| {
        tracing::error!("Completion failed for '{}': {}", query, e);
        e
    })?;
    tracing::debug!(
        "Completion from {} ({:?} prompt / {:?} completion tokens)",
        completion.model,
        completion.prompt_tokens,
        completion.completion_tokens
    );

    let record = state
        .history
        .insert(query, direction, &completion.text, context.match_count)?;
    *state.active_record.write().await = Some(record.id.clone());

    Ok(Analysis { record, context })
}

pub async fn handle_analyze(state: &AppState, query: &str, direction: Direction) -> anyhow::Result<()> {
    let analysis = analyze(state, query, direction).await?;
    println!("{}", render::analysis(&analysis));
    Ok(())
}

/// Retrieval only
pub fn handle_lookup(state: &AppState, query: &str, direction: Direction) {
    let context = state.processor.retrieve(&DefaultPreprocessor.process(query), direction);
    println!("{}", render::context(&context));
}
