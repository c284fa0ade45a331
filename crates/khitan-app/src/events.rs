use std::sync::Arc;

use kanal::AsyncReceiver;
use khitan_core::types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::render;
use crate::state::AppState;
use crate::status::StatusReport;

pub mod analyze;
pub mod history;

use analyze::{handle_analyze, handle_lookup};
use history::{
    handle_clear_history, handle_delete_record, handle_open_record, handle_show_evidence, handle_show_history,
};

/// Whether the loop keeps reading after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell loop: one input line at a time, each handled to completion before
/// the next is read
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<String>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for input");
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = input_rx.recv() => match line {
                Ok(line) => line,
                Err(_) => break,
            },
        };

        let direction = state.direction().await;
        let event = match AppEvent::parse_line(&line, direction) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        tracing::debug!("[EVENT_LOOP] Event: {:?}", event);
        match handle_events(&state, event).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {e:#}"),
        }
    }

    cancel.cancel();
    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

pub async fn handle_events(state: &AppState, event: AppEvent) -> anyhow::Result<Flow> {
    match event {
        AppEvent::Analyze { query, direction } => {
            handle_analyze(state, &query, direction).await?;
        }
        AppEvent::Lookup { query, direction } => {
            handle_lookup(state, &query, direction);
        }
        AppEvent::SetDirection(direction) => {
            *state.direction.write().await = direction;
            tracing::info!("Direction set to {direction}");
            println!("Direction: {} ({})", direction, direction.describe());
        }
        AppEvent::ShowHistory => handle_show_history(state),
        AppEvent::OpenRecord(id) => handle_open_record(state, &id).await?,
        AppEvent::ShowEvidence => handle_show_evidence(state).await?,
        AppEvent::DeleteRecord(id) => handle_delete_record(state, &id).await?,
        AppEvent::ClearHistory => handle_clear_history(state).await?,
        AppEvent::ShowStatus => {
            let report = StatusReport::collect(state).await;
            println!("{}", render::status(&report));
        }
        AppEvent::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
