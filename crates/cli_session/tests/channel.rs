mod support;

use cli_session::event::{GENERATE_HANDLER_EVENT, OPEN_FILE_EVENT, PERSISTED_LIBRARY_UPDATED_EVENT};
use cli_session::{describe_event, EventKind, OperationResult, DEFAULT_BATCH_SIZE};
use onegraph_api::error::CODE_BAD_RESPONSE;
use onegraph_api::{GraphqlError, GraphqlResponse};
use serde_json::json;

use support::{
    channel_for, mock_with_session, recording_channel, RecordingTransport, APP_ID, SESSION_ID,
    TOKEN,
};

fn empty_events_response() -> GraphqlResponse {
    GraphqlResponse::from_data(json!({"oneGraph": {"netlifyCliEvents": []}}))
}

#[tokio::test]
async fn zero_batch_size_is_sent_as_default() {
    let transport = RecordingTransport::new(empty_events_response());
    let channel = recording_channel(&transport);

    let batch = channel.fetch_batch(SESSION_ID, 0).await;

    assert!(batch.is_ok());
    let request = transport.last_request();
    assert_eq!(request.operation_name, "CLISessionEventsQuery");
    assert_eq!(request.variables["first"], json!(DEFAULT_BATCH_SIZE));
    assert_eq!(request.variables["first"], json!(1000));
}

#[tokio::test]
async fn explicit_batch_size_and_credentials_are_forwarded() {
    let transport = RecordingTransport::new(empty_events_response());
    let channel = recording_channel(&transport);

    channel.fetch_batch(SESSION_ID, 25).await;
    channel.fetch_default_batch(SESSION_ID).await;

    let requests = transport.requests();
    assert_eq!(requests[0].variables["first"], json!(25));
    assert_eq!(requests[0].variables["sessionId"], json!(SESSION_ID));
    assert_eq!(requests[0].variables["nfToken"], json!(TOKEN));
    assert_eq!(requests[0].auth_token.as_deref(), Some(TOKEN));
    assert_eq!(
        requests[0].routing.as_ref().map(|routing| routing.site_id.as_str()),
        Some(APP_ID)
    );
    assert_eq!(requests[1].variables["first"], json!(1000));
}

#[tokio::test]
async fn fetch_does_not_dequeue() {
    let mock = mock_with_session();
    mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({"filePath": "a.graphql"}));
    let channel = channel_for(&mock);

    let first = channel.fetch_default_batch(SESSION_ID).await;
    let second = channel.fetch_default_batch(SESSION_ID).await;

    assert_eq!(first.ids(), second.ids());
    assert_eq!(first.events.len(), 1);
}

#[tokio::test]
async fn server_may_return_fewer_than_requested() {
    let mock = mock_with_session();
    for index in 0..3 {
        mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({"filePath": format!("{index}.graphql")}));
    }
    let channel = channel_for(&mock);

    assert_eq!(channel.fetch_batch(SESSION_ID, 2).await.events.len(), 2);
    assert_eq!(channel.fetch_batch(SESSION_ID, 10).await.events.len(), 3);
}

#[tokio::test]
async fn acknowledged_ids_are_not_redelivered() {
    let mock = mock_with_session();
    mock.push_event(
        SESSION_ID,
        GENERATE_HANDLER_EVENT,
        json!({"cliSessionId": SESSION_ID, "operationId": "op-1"}),
    );
    mock.push_event(
        SESSION_ID,
        PERSISTED_LIBRARY_UPDATED_EVENT,
        json!({"docId": "doc-1", "schemaId": "schema-1"}),
    );
    let channel = channel_for(&mock);

    let batch = channel.fetch_default_batch(SESSION_ID).await;
    assert!(batch.is_ok());
    let ids = batch.ids();
    assert_eq!(ids.len(), 2);

    let ack = channel.acknowledge(SESSION_ID, &ids).await;
    let acked = ack.success().expect("ack should succeed");
    assert_eq!(acked.acknowledged_ids, ids);

    mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({"filePath": "late.graphql"}));
    let after = channel.fetch_default_batch(SESSION_ID).await;
    assert!(after.is_ok());
    assert!(after.ids().iter().all(|id| !ids.contains(id)));
    assert_eq!(after.events.len(), 1);
}

#[tokio::test]
async fn empty_acknowledge_still_round_trips() {
    let mock = mock_with_session();
    let channel = channel_for(&mock);

    let ack = channel.acknowledge(SESSION_ID, &[]).await;

    let acked = ack.success().expect("empty ack should succeed");
    assert!(acked.is_empty());
    let requests = mock.requests_named("AckCLISessionEventMutation");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].variables["eventIds"], json!([]));
}

#[tokio::test]
async fn acknowledging_unknown_id_is_a_no_op() {
    let mock = mock_with_session();
    let kept = mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({}));
    let channel = channel_for(&mock);

    let ack = channel
        .acknowledge(SESSION_ID, &["never-delivered".to_owned()])
        .await;

    assert!(ack.is_success());
    assert_eq!(mock.queued_event_ids(SESSION_ID), vec![kept]);
}

#[tokio::test]
async fn fetch_errors_yield_no_events() {
    let mock = mock_with_session();
    mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({}));
    mock.fail_next(
        "CLISessionEventsQuery",
        GraphqlError::transport("connection reset"),
    );
    let channel = channel_for(&mock);

    let batch = channel.fetch_default_batch(SESSION_ID).await;

    assert!(!batch.is_ok());
    assert!(batch.events.is_empty());
    assert!(batch.errors[0].is_transport());
}

#[tokio::test]
async fn unknown_session_reports_inline_error() {
    let mock = mock_with_session();
    let channel = channel_for(&mock);

    let batch = channel.fetch_default_batch("missing").await;

    assert!(batch.events.is_empty());
    assert!(batch.errors[0].message.contains("missing"));
}

#[tokio::test]
async fn malformed_event_does_not_block_well_formed_ones() {
    let mock = mock_with_session();
    let good = mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({}));
    mock.push_raw_event(SESSION_ID, json!({"__typename": OPEN_FILE_EVENT, "id": null}));
    let channel = channel_for(&mock);

    let batch = channel.fetch_default_batch(SESSION_ID).await;
    assert_eq!(batch.ids(), vec![good.clone()]);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].code(), Some(CODE_BAD_RESPONSE));

    let outcome = channel
        .process_batch(SESSION_ID, 0, |_| Ok::<(), String>(()))
        .await;
    assert_eq!(outcome.processed, vec![good.clone()]);
    assert_eq!(outcome.fetch_errors.len(), 1);
    assert!(outcome.ack.as_ref().is_some_and(OperationResult::is_success));
    assert!(!mock.queued_event_ids(SESSION_ID).contains(&good));
}

#[tokio::test]
async fn unknown_kinds_are_delivered_and_described() {
    let mock = mock_with_session();
    mock.push_event(SESSION_ID, "FooEvent", json!({"anything": true}));
    let channel = channel_for(&mock);

    let batch = channel.fetch_default_batch(SESSION_ID).await;

    let event = &batch.events[0];
    assert!(matches!(event.kind, EventKind::Unrecognized { .. }));
    assert!(describe_event(event).contains("FooEvent"));
}

#[tokio::test]
async fn failed_acknowledge_leaves_events_queued() {
    let mock = mock_with_session();
    let id = mock.push_event(SESSION_ID, OPEN_FILE_EVENT, json!({}));
    mock.fail_next(
        "AckCLISessionEventMutation",
        GraphqlError::timeout("request timed out"),
    );
    let channel = channel_for(&mock);

    let ack = channel.acknowledge(SESSION_ID, &[id.clone()]).await;

    assert!(matches!(ack, OperationResult::Failure(_)));
    let refetched = channel.fetch_default_batch(SESSION_ID).await;
    assert_eq!(refetched.ids(), vec![id]);
}
