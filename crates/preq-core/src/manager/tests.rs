//! Tests for the queue manager and its registry.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::client::{
    ClientDefaults, FilePart, FileSource, FormData, FormValue, HeaderValue, Method, RequestBody, CONTENT_TYPE,
    MIME_JSON,
};
use crate::codec::{RequestCodec, SerializedRequest};
use crate::envelope::ClientType;
use crate::error::{PreqError, Result};
use crate::manager::{ManagerRegistry, PersistenceType, QueueSettings, RequestManager};
use crate::persist::{MockPersister, Persister};

fn mock_manager() -> (RequestManager, MockPersister) {
    let persister = MockPersister::new();
    let manager = RequestManager::with_persister(Arc::new(persister.clone()), RequestCodec::default());
    (manager, persister)
}

fn local_settings(dir: &tempfile::TempDir) -> QueueSettings {
    QueueSettings {
        store_path: Some(dir.path().join("store.db")),
        load_from_store: true,
        ..QueueSettings::new(PersistenceType::LocalStore)
    }
}

fn get(path: &str) -> crate::client::ClientRequest {
    ClientDefaults::default().request(Method::Get, format!("https://example.com/{path}"))
}

fn ids(manager: &RequestManager) -> Vec<String> {
    manager.queue().iter().map(|e| e.request_id.clone()).collect()
}

fn stored_ids(persister: &MockPersister) -> Vec<String> {
    persister.snapshot().into_iter().map(|r| r.request_id).collect()
}

#[tokio::test]
async fn enqueue_appends_and_persists_each_time() {
    let (mut manager, persister) = mock_manager();
    let a = manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    assert_eq!(stored_ids(&persister), [a.request_id.clone()]);
    let b = manager.enqueue(get("b"), ClientType::Native).await.unwrap();
    assert_eq!(ids(&manager), [a.request_id.clone(), b.request_id.clone()]);
    assert_eq!(stored_ids(&persister), ids(&manager));
    assert_eq!(
        manager.get(&b.request_id).map(|e| e.native().url.as_str()),
        Some("https://example.com/b")
    );
}

#[tokio::test]
async fn queue_identity_under_enqueue_and_remove() {
    let (mut manager, persister) = mock_manager();
    let mut expected = Vec::new();
    for path in ["a", "b", "c", "d"] {
        expected.push(manager.enqueue(get(path), ClientType::Native).await.unwrap().request_id);
    }
    let removed = manager.remove_by_id(&expected[1]).await.unwrap().unwrap();
    assert_eq!(removed.request_id, expected[1]);
    expected.remove(1);
    assert_eq!(ids(&manager), expected);

    manager.remove_by_id(&expected[2]).await.unwrap().unwrap();
    expected.remove(2);
    assert_eq!(ids(&manager), expected);
    assert_eq!(stored_ids(&persister), expected);
}

#[tokio::test]
async fn remove_unknown_id_changes_nothing() {
    let (mut manager, persister) = mock_manager();
    manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    let before_queue = manager.queue().to_vec();
    let before_store = persister.snapshot();
    assert!(manager.remove_by_id("nope").await.unwrap().is_none());
    assert_eq!(manager.queue(), before_queue.as_slice());
    assert_eq!(persister.snapshot(), before_store);
}

#[tokio::test]
async fn reset_empties_queue_and_store() {
    let (mut manager, persister) = mock_manager();
    manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    manager.enqueue(get("b"), ClientType::Native).await.unwrap();
    manager.reset().await.unwrap();
    assert!(manager.queue().is_empty());
    assert!(persister.snapshot().is_empty());
}

#[tokio::test]
async fn set_queue_does_not_persist() {
    let (mut manager, persister) = mock_manager();
    manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    manager.set_queue(Vec::new());
    assert_eq!(persister.snapshot().len(), 1);
    manager.persist().await.unwrap();
    assert!(persister.snapshot().is_empty());
}

#[tokio::test]
async fn load_from_store_discards_memory_state() {
    let (mut manager, persister) = mock_manager();
    let a = manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    let stored = persister.snapshot();
    manager.enqueue(get("b"), ClientType::Native).await.unwrap();
    persister.replace_all(&stored).await.unwrap();
    manager.load_from_store().await.unwrap();
    assert_eq!(ids(&manager), [a.request_id]);
}

#[tokio::test]
async fn persist_load_is_idempotent() {
    let (mut manager, persister) = mock_manager();
    let request = ClientDefaults::default()
        .request(Method::Post, "https://example.com/posts")
        .with_header("X-Count", 3i64)
        .with_data(RequestBody::Json(json!({ "a": [1, 2] })));
    manager.enqueue(request, ClientType::Native).await.unwrap();
    manager.enqueue(get("x"), ClientType::Native).await.unwrap();
    let persisted = persister.snapshot();

    let mut reloaded = RequestManager::with_persister(Arc::new(persister.clone()), RequestCodec::default());
    reloaded.load_from_store().await.unwrap();
    reloaded.persist().await.unwrap();
    assert_eq!(persister.snapshot(), persisted);
}

#[tokio::test]
async fn enqueue_returns_corrected_content_type() {
    let (mut manager, _) = mock_manager();
    let request = ClientDefaults::default()
        .request(Method::Post, "https://example.com/posts")
        .with_data(RequestBody::Json(json!({ "title": "foo" })));
    let envelope = manager.enqueue(request, ClientType::Native).await.unwrap();
    assert_eq!(
        envelope.native().headers.own.get(CONTENT_TYPE).and_then(|v| v.as_str()),
        Some(MIME_JSON)
    );
    assert_eq!(envelope.native().persistence_id.as_deref(), Some(envelope.request_id.as_str()));
}

#[tokio::test]
async fn json_request_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let body = json!({ "title": "foo", "body": "bar", "userId": 1 });
    let id = {
        let mut manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
        let request = ClientDefaults::default()
            .request(Method::Post, "https://jsonplaceholder.typicode.com/posts")
            .with_header("X-Test", true)
            .with_data(RequestBody::Json(body.clone()));
        manager.enqueue(request, ClientType::Native).await.unwrap().request_id
    };

    let manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
    let envelope = manager.get(&id).unwrap();
    let request = envelope.native();
    assert_eq!(request.data, Some(RequestBody::Json(body)));
    assert_eq!(request.headers.own.get("X-Test"), Some(&HeaderValue::Bool(true)));
    assert_eq!(request.persistence_id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn multipart_request_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let mut manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
        let mut form = FormData::new();
        form.append_text("someValue", "lalala");
        form.append_file("myFile", FilePart::from_bytes("rickroll.gif", "0xfff"));
        let request = ClientDefaults::default()
            .request(Method::Post, "https://example.com/upload")
            .with_header(CONTENT_TYPE, "multipart/form-data")
            .with_data(RequestBody::Form(form));
        manager.enqueue(request, ClientType::Native).await.unwrap().request_id
    };

    let manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
    let Some(RequestBody::Form(form)) = &manager.get(&id).unwrap().native().data else {
        panic!("expected form body");
    };
    assert_eq!(form.get("someValue"), Some(&FormValue::Text("lalala".to_string())));
    let Some(FormValue::File(file)) = form.get("myFile") else {
        panic!("expected file part");
    };
    assert_eq!(file.file_name, "rickroll.gif");
    assert_eq!(file.read().await.unwrap(), b"0xfff");
}

#[tokio::test]
async fn file_part_keeps_bytes_read_at_enqueue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.txt");
    std::fs::write(&path, "ORIGINAL").unwrap();

    let mut manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
    let mut form = FormData::new();
    form.append_file("f", FilePart::from_path(&path));
    let request = ClientDefaults::default()
        .request(Method::Post, "https://example.com/upload")
        .with_data(RequestBody::Form(form));
    let upload = manager.enqueue(request, ClientType::Native).await.unwrap();
    let Some(RequestBody::Form(form)) = &upload.native().data else {
        panic!("expected form body");
    };
    let Some(FormValue::File(file)) = form.get("f") else {
        panic!("expected file part");
    };
    assert_eq!(file.source, FileSource::Bytes(b"ORIGINAL".to_vec()));

    std::fs::write(&path, "CHANGED").unwrap();
    let other = manager.enqueue(get("other"), ClientType::Native).await.unwrap();
    let records = manager.stored_records().await.unwrap();
    let raw = &records[0].post_data.as_ref().unwrap().raw_data;
    assert!(raw.contains("ORIGINAL"), "{raw}");

    std::fs::remove_file(&path).unwrap();
    manager.remove_by_id(&other.request_id).await.unwrap().unwrap();
    let stored: Vec<String> = manager
        .stored_records()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.request_id)
        .collect();
    assert_eq!(stored, ids(&manager));
    assert_eq!(stored, [upload.request_id]);
}

#[tokio::test]
async fn duplicate_ids_persist_on_both_backends() {
    let (mut mock, _persister) = mock_manager();
    let envelope = mock.enqueue(get("a"), ClientType::Native).await.unwrap();
    mock.set_queue(vec![envelope.clone(), envelope.clone()]);
    mock.persist().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut local = RequestManager::open(&local_settings(&dir)).await.unwrap();
    local.set_queue(vec![envelope.clone(), envelope.clone()]);
    local.persist().await.unwrap();
    let stored = local.stored_records().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].request_id, envelope.request_id);
}

#[tokio::test]
async fn open_without_load_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut manager = RequestManager::open(&local_settings(&dir)).await.unwrap();
        manager.enqueue(get("a"), ClientType::Native).await.unwrap();
    }
    let settings = QueueSettings {
        load_from_store: false,
        ..local_settings(&dir)
    };
    let manager = RequestManager::open(&settings).await.unwrap();
    assert!(manager.queue().is_empty());
    assert_eq!(manager.stored_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn open_requires_persistence_type() {
    let err = RequestManager::open(&QueueSettings::default()).await.err().unwrap();
    assert!(matches!(err, PreqError::UnknownPersistenceType(_)));
}

#[tokio::test]
async fn unknown_client_type_in_store_fails_load() {
    let persister = MockPersister::new();
    let record: SerializedRequest = serde_json::from_value(json!({
        "requestId": "1-x",
        "clientType": "FETCH_CLIENT",
        "method": "GET",
        "url": "https://example.com/",
        "httpVersion": "1.2"
    }))
    .unwrap();
    persister.replace_all(&[record]).await.unwrap();
    let mut manager = RequestManager::with_persister(Arc::new(persister), RequestCodec::default());
    let err = manager.load_from_store().await.unwrap_err();
    assert!(matches!(err, PreqError::UnsupportedClientType(_)));
}

struct FailingPersister;

#[async_trait]
impl Persister for FailingPersister {
    async fn fetch_all(&self) -> Result<Vec<SerializedRequest>> {
        Ok(Vec::new())
    }

    async fn replace_all(&self, _records: &[SerializedRequest]) -> Result<()> {
        Err(PreqError::Io(std::io::Error::other("disk full")))
    }
}

#[tokio::test]
async fn failed_persist_keeps_entry_in_memory() {
    let mut manager = RequestManager::with_persister(Arc::new(FailingPersister), RequestCodec::default());
    assert!(manager.enqueue(get("a"), ClientType::Native).await.is_err());
    assert_eq!(manager.queue().len(), 1);
}

#[tokio::test]
async fn registry_construction_policy() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ManagerRegistry::new();
    let reuse = QueueSettings {
        reset_request_manager: false,
        ..local_settings(&dir)
    };

    assert!(matches!(registry.acquire(&reuse).await, Err(PreqError::NotInitialized)));

    let first = registry.acquire(&local_settings(&dir)).await.unwrap();
    let again = registry.acquire(&reuse).await.unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let fresh = registry.acquire(&local_settings(&dir)).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert!(Arc::ptr_eq(&registry.current().unwrap(), &fresh));

    registry.clear();
    assert!(registry.current().is_none());
    assert!(matches!(registry.acquire(&reuse).await, Err(PreqError::NotInitialized)));
}

#[tokio::test]
async fn mock_type_uses_global_instance() {
    let settings = QueueSettings::new(PersistenceType::Mock);
    let mut manager = RequestManager::open(&settings).await.unwrap();
    let envelope = manager.enqueue(get("global"), ClientType::Native).await.unwrap();
    assert!(MockPersister::global()
        .snapshot()
        .iter()
        .any(|r| r.request_id == envelope.request_id));
    manager.remove_by_id(&envelope.request_id).await.unwrap();
}
