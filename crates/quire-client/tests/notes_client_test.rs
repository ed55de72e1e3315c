//! Integration tests for the cached notes client against a mocked API.
//!
//! The mock expectation counts double as cache assertions: a read served
//! from cache never reaches the server, so `expect(1)` on a listing mock
//! proves the second read was a cache hit.

use std::sync::Arc;

use chrono::{Duration, Utc};
use quire_client::{
    ClientEvent, CreateNoteRequest, Error, MutationOp, Note, NotesClient, Session,
    StaticSessionProvider, UpdateNoteRequest,
};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn note_json(id: Uuid, title: &str, summary: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "uuid": id,
        "title": title,
        "notes": format!("<p>{}</p>", title),
        "email": "a@example.com",
        "summary": summary,
        "created_at": Utc::now(),
        "updated_at": Utc::now(),
    })
}

async fn authed_client(server: &MockServer) -> NotesClient {
    let sessions = StaticSessionProvider::new();
    sessions
        .set(Session {
            access_token: "test-token".to_string(),
            email: "a@example.com".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await;
    NotesClient::new(server.uri(), Arc::new(sessions)).unwrap()
}

#[tokio::test]
async fn test_second_list_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([note_json(Uuid::new_v4(), "a", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let first = client.list_notes().await.unwrap();
    let second = client.list_notes().await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_create_invalidates_collection() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Listing is hit twice: once to prime the cache, once after the create
    // invalidated it.
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!([note_json(id, "new", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    client.list_notes().await.unwrap();

    let created = client
        .create_note(&CreateNoteRequest {
            notes: "<p>new</p>".to_string(),
            title: Some("new".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.uuid, id);

    // Stale collection forces a refetch.
    client.list_notes().await.unwrap();
}

#[tokio::test]
async fn test_update_invalidates_both_partitions() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // By-id fetch twice: prime, then refetch after update invalidation.
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("uuid", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([note_json(id, "title", None)])),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes"))
        .and(query_param("uuid", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([note_json(id, "updated", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    client.get_note(Some(id)).await.unwrap();

    client
        .update_note(
            id,
            &UpdateNoteRequest {
                notes: "<p>updated</p>".to_string(),
                title: None,
                email: None,
                summary: None,
            },
        )
        .await
        .unwrap();

    // Fresh read misses and refetches; the stale placeholder is still there.
    assert!(client.cache().note(id).await.is_none());
    assert!(client.cache().note_stale(id).await.is_some());
    client.get_note(Some(id)).await.unwrap();
}

#[tokio::test]
async fn test_delete_evicts_by_id_entry() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("uuid", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([note_json(id, "x", None)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notes"))
        .and(query_param("uuid", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "Note deleted successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    client.get_note(Some(id)).await.unwrap();

    client.delete_note(id).await.unwrap();

    // Eviction, not invalidation: no placeholder survives.
    assert!(client.cache().note_stale(id).await.is_none());
}

#[tokio::test]
async fn test_get_note_with_no_id_skips_network() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and the test would fail on
    // the error path.
    let client = authed_client(&server).await;
    let note = client.get_note(None).await.unwrap();
    assert!(note.is_none());
}

#[tokio::test]
async fn test_get_note_unknown_id_is_none_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let note = client.get_note(Some(Uuid::new_v4())).await.unwrap();
    assert!(note.is_none());
}

#[tokio::test]
async fn test_unauthenticated_mutation_fails_locally() {
    let server = MockServer::start().await;
    // No session installed.
    let sessions = StaticSessionProvider::new();
    let client = NotesClient::new(server.uri(), Arc::new(sessions)).unwrap();
    let mut events = client.events().subscribe();

    let err = client
        .create_note(&CreateNoteRequest {
            notes: "<p>x</p>".to_string(),
            title: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized(_)));
    match events.recv().await.unwrap() {
        ClientEvent::OperationFailed { op, message } => {
            assert_eq!(op, MutationOp::Create);
            assert_eq!(message, "Couldn't create note");
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_update_invalidates_nothing_and_emits_event() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("uuid", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([note_json(id, "x", None)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    client.get_note(Some(id)).await.unwrap();
    let mut events = client.events().subscribe();

    let err = client
        .update_note(
            id,
            &UpdateNoteRequest {
                notes: "<p>y</p>".to_string(),
                title: None,
                email: None,
                summary: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Internal(_)));

    // The cached entry stays fresh: failures never invalidate.
    assert!(client.cache().note(id).await.is_some());
    match events.recv().await.unwrap() {
        ClientEvent::OperationFailed { op, message } => {
            assert_eq!(op, MutationOp::Update);
            assert_eq!(message, "Couldn't update note");
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_update_of_missing_note_is_note_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // The update endpoint answers an ownership mismatch or missing row with
    // an empty array, not an error status.
    Mock::given(method("PUT"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let err = client
        .update_note(
            id,
            &UpdateNoteRequest {
                notes: "<p>y</p>".to_string(),
                title: None,
                email: None,
                summary: None,
            },
        )
        .await
        .unwrap_err();

    match err {
        Error::NoteNotFound(got) => assert_eq!(got, id),
        other => panic!("Expected NoteNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_status_maps_to_unauthorized_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let err = client.delete_note(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
async fn test_last_write_wins_on_concurrent_fetches() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let older: Note = serde_json::from_value(note_json(id, "older", None)).unwrap();
    let newer: Note = serde_json::from_value(note_json(id, "newer", None)).unwrap();

    let client = authed_client(&server).await;
    // Two responses for the same id resolving out of order: the later one
    // to land overwrites unconditionally.
    client.cache().set_note(older).await;
    client.cache().set_note(newer).await;

    assert_eq!(
        client.cache().note(id).await.unwrap().title.as_deref(),
        Some("newer")
    );
}
