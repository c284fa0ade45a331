use khitan_core::{Direction, QueryError};
use khitan_core::types::AppEvent;
use khitan_history::HistoryRepository;
use khitan_lang::NO_MATCH_FALLBACK;
use khitan_translator::CompletionError;

use super::fixture;
use crate::events::analyze::analyze;
use crate::events::history::{evidence, open_record};
use crate::events::{Flow, handle_events};

#[tokio::test]
async fn success_persists_record_with_context_count() {
    let fx = fixture("sk-test", Some("### 1. Step one"));

    let analysis = analyze(&fx.state, "  abaoji ", Direction::ScriptToModern).await.unwrap();

    assert_eq!(analysis.record.query, "abaoji");
    assert_eq!(analysis.record.mode, Direction::ScriptToModern);
    assert_eq!(analysis.record.result, "### 1. Step one");
    assert_eq!(analysis.record.context_count, 1);
    assert_eq!(analysis.context.match_count, 1);

    let stored = fx.history.list();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], analysis.record);
    assert_eq!(*fx.state.active_record.read().await, Some(analysis.record.id.clone()));

    let requests = fx.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_message, "Analysis target: abaoji");
    assert_eq!(requests[0].model, "deepseek-chat");
    assert!(
        requests[0]
            .system_prompt
            .contains("written form: 阿保机(abaoji) -> ancient meaning: 契丹首领")
    );
}

#[tokio::test]
async fn completion_failure_persists_nothing() {
    let fx = fixture("sk-test", None);

    let err = analyze(&fx.state, "abaoji", Direction::ScriptToModern).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CompletionError>(),
        Some(CompletionError::RateLimitExceeded)
    ));
    assert!(fx.history.list().is_empty());
    assert!(fx.state.active_record.read().await.is_none());
    assert_eq!(fx.requests().len(), 1);
}

#[tokio::test]
async fn missing_credential_stops_before_any_work() {
    let fx = fixture("", Some("unused"));

    let err = analyze(&fx.state, "abaoji", Direction::ScriptToModern).await.unwrap_err();

    assert_eq!(err.downcast_ref::<QueryError>(), Some(&QueryError::MissingCredential));
    assert!(fx.requests().is_empty());
    assert!(fx.history.list().is_empty());
}

#[tokio::test]
async fn blank_query_stops_before_any_work() {
    let fx = fixture("sk-test", Some("unused"));

    let err = analyze(&fx.state, " \n ", Direction::ModernToScript).await.unwrap_err();

    assert_eq!(err.downcast_ref::<QueryError>(), Some(&QueryError::EmptyQuery));
    assert!(fx.requests().is_empty());
}

#[tokio::test]
async fn no_match_sends_fallback_and_stores_after_response() {
    let fx = fixture("sk-test", Some("reasoned answer"));

    let analysis = analyze(&fx.state, "xyz", Direction::ModernToScript).await.unwrap();

    assert_eq!(analysis.context.text, NO_MATCH_FALLBACK);
    assert_eq!(analysis.record.context_count, 0);
    assert!(fx.requests()[0].system_prompt.contains(NO_MATCH_FALLBACK));

    // Nothing was stored while the request was in flight
    assert_eq!(*fx.completion.history_len_seen.lock().unwrap(), vec![0]);
    assert_eq!(fx.history.list().len(), 1);
}

#[tokio::test]
async fn evidence_reruns_retrieval_for_active_record() {
    let fx = fixture("sk-test", Some("answer"));

    let first = analyze(&fx.state, "linya", Direction::ScriptToModern).await.unwrap();
    analyze(&fx.state, "xyz", Direction::ScriptToModern).await.unwrap();

    open_record(&fx.state, &first.record.id).await.unwrap();
    let (record, context) = evidence(&fx.state).await.unwrap();

    assert_eq!(record.id, first.record.id);
    assert_eq!(context.match_count, record.context_count);
    assert!(context.text.contains("|phonetic exact]"));
}

#[tokio::test]
async fn evidence_needs_an_open_record() {
    let fx = fixture("sk-test", Some("answer"));
    assert!(evidence(&fx.state).await.is_err());
    assert!(open_record(&fx.state, "missing").await.is_err());
}

#[tokio::test]
async fn delete_and_clear_through_events() {
    let fx = fixture("sk-test", Some("answer"));

    let a = analyze(&fx.state, "abaoji", Direction::ScriptToModern).await.unwrap();
    let b = analyze(&fx.state, "𘭾", Direction::ScriptToModern).await.unwrap();
    assert_eq!(*fx.state.active_record.read().await, Some(b.record.id.clone()));

    handle_events(&fx.state, AppEvent::DeleteRecord(b.record.id.clone())).await.unwrap();
    assert!(fx.state.active_record.read().await.is_none());
    let ids: Vec<String> = fx.history.list().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a.record.id.clone()]);

    assert!(handle_events(&fx.state, AppEvent::DeleteRecord(b.record.id)).await.is_err());

    handle_events(&fx.state, AppEvent::ClearHistory).await.unwrap();
    assert!(fx.history.list().is_empty());
}

#[tokio::test]
async fn direction_and_quit_events() {
    let fx = fixture("sk-test", Some("answer"));

    let flow = handle_events(&fx.state, AppEvent::SetDirection(Direction::ModernToScript))
        .await
        .unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(fx.state.direction().await, Direction::ModernToScript);

    let flow = handle_events(&fx.state, AppEvent::ShowStatus).await.unwrap();
    assert_eq!(flow, Flow::Continue);

    assert_eq!(handle_events(&fx.state, AppEvent::Quit).await.unwrap(), Flow::Quit);
}

#[tokio::test]
async fn analyze_event_failure_is_an_error() {
    let fx = fixture("sk-test", None);
    let event = AppEvent::Analyze {
        query: "abaoji".to_string(),
        direction: Direction::ScriptToModern,
    };
    assert!(handle_events(&fx.state, event).await.is_err());
    assert!(fx.history.list().is_empty());
}
