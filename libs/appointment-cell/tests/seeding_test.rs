use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use appointment_cell::{
    plan_from_config, prepare_seed, AppointmentError, AppointmentWriter, MonthContext,
    ReferenceTables, SeedPlan, SeedingService,
};
use shared_config::{AppConfig, MAX_BATCH_SIZE};
use shared_database::{CommitResult, DocumentStore, FieldValue, Fields, FirestoreClient, StoredDocument};
use shared_utils::test_utils::{MockFirestoreResponses, TestConfig};

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn list_documents(&self, collection: &str) -> anyhow::Result<Vec<StoredDocument>>;
        async fn batch_create(&self, collection: &str, documents: &[Fields]) -> anyhow::Result<CommitResult>;
    }
}

fn commit_of(documents: &[Fields]) -> CommitResult {
    CommitResult {
        document_ids: (0..documents.len()).map(|i| format!("auto-{}", i)).collect(),
        commit_time: None,
    }
}

#[tokio::test]
async fn test_writer_splits_into_sequential_chunks() {
    let prepared = prepare_seed(ReferenceTables::builtin(), &SeedPlan::default()).unwrap();
    let sizes = Arc::new(Mutex::new(Vec::new()));

    let mut store = MockStore::new();
    let recorded = sizes.clone();
    store
        .expect_batch_create()
        .withf(|collection, _| collection == "appointments")
        .times(3)
        .returning(move |_, documents| {
            recorded.lock().unwrap().push(documents.len());
            Ok(commit_of(documents))
        });

    let writer = AppointmentWriter::new(Arc::new(store), "appointments", 25);
    let mut seen = Vec::new();
    let reports = writer
        .write(&prepared.kept, |report| seen.push((report.index, report.documents)))
        .await
        .unwrap();

    assert_eq!(*sizes.lock().unwrap(), vec![25, 25, 10]);
    assert_eq!(seen, vec![(1, 25), (2, 25), (3, 10)]);
    assert_eq!(reports[2].document_ids.len(), 10);
}

#[tokio::test]
async fn test_default_batch_size_fits_reference_run_in_one_chunk() {
    let mut store = MockStore::new();
    store
        .expect_batch_create()
        .times(1)
        .returning(|_, documents| Ok(commit_of(documents)));

    let config = AppConfig::default();
    let service = SeedingService::new(&config, Arc::new(store));
    let report = service.seed(&SeedPlan::default(), |_| {}).await.unwrap();

    assert_eq!(report.generated, 60);
    assert_eq!(report.kept, 60);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.chunks, 1);
}

#[tokio::test]
async fn test_failed_chunk_aborts_remaining_chunks() {
    let prepared = prepare_seed(ReferenceTables::builtin(), &SeedPlan::default()).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut store = MockStore::new();
    let counter = calls.clone();
    store
        .expect_batch_create()
        .times(2)
        .returning(move |_, documents| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(commit_of(documents))
            } else {
                Err(anyhow!("API error (503 Service Unavailable): backend unavailable"))
            }
        });

    let writer = AppointmentWriter::new(Arc::new(store), "appointments", 20);
    let mut committed = 0;
    let result = writer.write(&prepared.kept, |report| committed += report.documents).await;

    assert_matches!(
        result,
        Err(AppointmentError::BatchWriteFailed { chunk: 2, message }) if message.contains("503")
    );
    assert_eq!(committed, 20);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_documents_carry_wire_shape() {
    let captured: Arc<Mutex<Vec<Fields>>> = Arc::new(Mutex::new(Vec::new()));

    let mut store = MockStore::new();
    let sink = captured.clone();
    store.expect_batch_create().returning(move |_, documents| {
        sink.lock().unwrap().extend_from_slice(documents);
        Ok(commit_of(documents))
    });

    let config = AppConfig::default();
    let service = SeedingService::new(&config, Arc::new(store));
    service.seed(&SeedPlan::default(), |_| {}).await.unwrap();

    let documents = captured.lock().unwrap();
    assert_eq!(documents.len(), 60);

    let first = &documents[0];
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "createdAt", "doctorId", "doctorName", "hourLabel", "isFirstVisit", "patientEmail",
            "patientId", "patientName", "patientPhone", "patientSpecialty", "reason",
            "scheduledAt", "status",
        ]
    );
    assert_eq!(first["status"], FieldValue::StringValue("completed".to_string()));
    assert_eq!(first["isFirstVisit"], FieldValue::BooleanValue(false));
    assert_eq!(first["patientSpecialty"], FieldValue::StringValue("Neurología".to_string()));
    assert!(matches!(first["scheduledAt"], FieldValue::TimestampValue(_)));

    for document in documents.iter() {
        let pending = document["status"] == FieldValue::StringValue("pending".to_string());
        assert_eq!(document["isFirstVisit"], FieldValue::BooleanValue(pending));
    }
}

#[test]
fn test_invalid_plan_is_a_configuration_error() {
    let config = AppConfig {
        seed_months: Some("2025-11:30:1,not-a-month".to_string()),
        ..AppConfig::default()
    };

    assert_matches!(plan_from_config(&config), Err(AppointmentError::InvalidSeedPlan(_)));
}

#[tokio::test]
async fn test_empty_plan_never_reaches_the_store() {
    let mut store = MockStore::new();
    store.expect_batch_create().never();

    let service = SeedingService::new(&AppConfig::default(), Arc::new(store));
    let plan = SeedPlan {
        months: vec![MonthContext::new(2025, 2, 0, 0)],
    };
    let report = service.seed(&plan, |_| {}).await.unwrap();

    assert_eq!(report.generated, 0);
    assert_eq!(report.chunks, 0);
}

#[test]
fn test_plan_from_config_defaults_to_reference_months() {
    let plan = plan_from_config(&AppConfig::default()).unwrap();
    assert_eq!(plan, SeedPlan::default());
}

struct CommitResponder;

impl Respond for CommitResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let writes = body["writes"].as_array().map(Vec::len).unwrap_or(0);
        ResponseTemplate::new(200).set_body_json(MockFirestoreResponses::commit_response(writes))
    }
}

#[tokio::test]
async fn test_seed_against_firestore_emulator_api() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig {
        batch_size: 25,
        ..TestConfig::default()
    };
    let config = test_config.emulator_config(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path(test_config.commit_path().as_str()))
        .respond_with(CommitResponder)
        .expect(3)
        .mount(&mock_server)
        .await;

    let store = Arc::new(FirestoreClient::new(&config, None).unwrap());
    let service = SeedingService::new(&config, store);

    let mut batches = Vec::new();
    let report = service
        .seed(&SeedPlan::default(), |chunk| batches.push(chunk.documents))
        .await
        .unwrap();

    assert_eq!(report.kept, 60);
    assert_eq!(report.chunks, 3);
    assert_eq!(batches, vec![25, 25, 10]);

    let requests = mock_server.received_requests().await.unwrap();
    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let write = &first["writes"][0];
    assert_eq!(write["currentDocument"]["exists"], false);
    assert_eq!(write["update"]["fields"]["scheduledAt"]["timestampValue"], "2025-11-02T10:00:00Z");
    assert_eq!(write["update"]["fields"]["createdAt"]["timestampValue"], "2025-11-01T09:00:00Z");
    assert_eq!(write["update"]["fields"]["hourLabel"]["stringValue"], "10:00 AM");
}

#[test]
fn test_writer_batch_size_matches_config_clamp() {
    let store: Arc<dyn DocumentStore> = Arc::new(MockStore::new());

    assert_eq!(AppointmentWriter::new(store.clone(), "appointments", 0).batch_size(), 1);
    assert_eq!(AppointmentWriter::new(store.clone(), "appointments", 40).batch_size(), 40);
    assert_eq!(AppointmentWriter::new(store, "appointments", 9000).batch_size(), MAX_BATCH_SIZE);
}
