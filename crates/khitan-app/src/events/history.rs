use anyhow::bail;
use khitan_core::{ContextBlock, LanguageProcessor};
use khitan_history::HistoryRecord;

use crate::render;
use crate::state::AppState;

pub fn handle_show_history(state: &AppState) {
    println!("{}", render::history_list(&state.history.list()));
}

/// Make a past record the active one
pub async fn open_record(state: &AppState, id: &str) -> anyhow::Result<HistoryRecord> {
    let Some(record) = state.history.get(id) else {
        bail!("No history record with id {id}");
    };

    *state.active_record.write().await = Some(record.id.clone());
    Ok(record)
}

pub async fn handle_open_record(state: &AppState, id: &str) -> anyhow::Result<()> {
    let record = open_record(state, id).await?;
    println!("{}", render::record(&record));
    Ok(())
}

/// Re-run retrieval for the active record's query and direction
pub async fn evidence(state: &AppState) -> anyhow::Result<(HistoryRecord, ContextBlock)> {
    let active = state.active_record.read().await.clone();
    let Some(id) = active else {
        bail!("No record is open");
    };
    let Some(record) = state.history.get(&id) else {
        bail!("Record {id} is no longer in the history");
    };

    let context = state.processor.retrieve(&record.query, record.mode);
    Ok((record, context))
}

pub async fn handle_show_evidence(state: &AppState) -> anyhow::Result<()> {
    let (record, context) = evidence(state).await?;
    println!("{}", render::evidence(&record, &context));
    Ok(())
}

pub async fn handle_delete_record(state: &AppState, id: &str) -> anyhow::Result<()> {
    if !state.history.delete(id)? {
        bail!("No history record with id {id}");
    }

    let mut active = state.active_record.write().await;
    if active.as_deref() == Some(id) {
        *active = None;
    }

    tracing::info!("Deleted history record {id}");
    println!("Deleted {id}");
    Ok(())
}

pub async fn handle_clear_history(state: &AppState) -> anyhow::Result<()> {
    state.history.clear()?;
    *state.active_record.write().await = None;

    tracing::info!("History cleared");
    println!("History cleared");
    Ok(())
}
