use std::sync::Arc;

use anyhow::anyhow;
use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use directory_cell::{
    render_directory, Directory, DirectoryError, DirectoryService, DoctorEntry, PatientEntry,
};
use shared_config::AppConfig;
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

fn stored(id: &str, pairs: &[(&str, FieldValue)]) -> StoredDocument {
    StoredDocument {
        id: id.to_string(),
        fields: pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
    }
}

#[tokio::test]
async fn test_read_maps_both_collections() {
    let mut store = MockStore::new();
    store
        .expect_list_documents()
        .withf(|collection| collection == "doctors")
        .times(1)
        .returning(|_| {
            Ok(vec![stored(
                "doc-1",
                &[("name", "Dr. Jorge Castro".into()), ("specialty", "Oftalmología".into())],
            )])
        });
    store
        .expect_list_documents()
        .withf(|collection| collection == "users")
        .times(1)
        .returning(|_| {
            Ok(vec![
                stored("pat-1", &[("name", "Carmen Silva".into()), ("email", "carmen.silva@test.com".into())]),
                stored("pat-2", &[]),
            ])
        });

    let service = DirectoryService::new(&AppConfig::default(), Arc::new(store));
    let directory = service.read().await.unwrap();

    assert_eq!(
        directory.doctors,
        vec![DoctorEntry {
            id: "doc-1".into(),
            name: "Dr. Jorge Castro".into(),
            specialty: "Oftalmología".into(),
        }]
    );
    assert_eq!(directory.patients.len(), 2);
    assert_eq!(directory.patients[1], PatientEntry { id: "pat-2".into(), name: String::new(), email: String::new() });
}

#[tokio::test]
async fn test_spanish_field_names_are_understood() {
    let mut store = MockStore::new();
    store.expect_list_documents().returning(|collection| {
        Ok(match collection {
            "doctors" => vec![stored(
                "doc-9",
                &[("nombre", "Dra. Ana Flores".into()), ("especialidad", "Dermatología".into())],
            )],
            _ => vec![stored("pat-9", &[("nombre", "Juan Pérez".into()), ("email", FieldValue::null())])],
        })
    });

    let service = DirectoryService::new(&AppConfig::default(), Arc::new(store));
    let directory = service.read().await.unwrap();

    assert_eq!(directory.doctors[0].name, "Dra. Ana Flores");
    assert_eq!(directory.doctors[0].specialty, "Dermatología");
    assert_eq!(directory.patients[0].name, "Juan Pérez");
    assert_eq!(directory.patients[0].email, "");
}

#[tokio::test]
async fn test_failed_read_stops_before_patients() {
    let mut store = MockStore::new();
    store
        .expect_list_documents()
        .times(1)
        .returning(|_| Err(anyhow!("Authentication error: token expired")));

    let service = DirectoryService::new(&AppConfig::default(), Arc::new(store));
    let result = service.read().await;

    assert_matches!(
        result,
        Err(DirectoryError::ReadFailed { collection, message })
            if collection == "doctors" && message.contains("token expired")
    );
}

#[test]
fn test_render_format() {
    let directory = Directory {
        doctors: vec![DoctorEntry {
            id: "1lwEoUV8uRUR3GtsQ1LM".into(),
            name: "Dr. Cardiología 1".into(),
            specialty: "Cardiología".into(),
        }],
        patients: vec![PatientEntry {
            id: "4eN52R8LP8VgpjTKuQ97iDJFKQv1".into(),
            name: "Pedro Martínez".into(),
            email: "pedro.martinez@test.com".into(),
        }],
    };

    assert_eq!(
        render_directory(&directory),
        "=== DOCTORS (1) ===\n\
         - 1lwEoUV8uRUR3GtsQ1LM | name: Dr. Cardiología 1 | specialty: Cardiología\n\
         \n\
         === PATIENTS (1) ===\n\
         - 4eN52R8LP8VgpjTKuQ97iDJFKQv1 | name: Pedro Martínez | email: pedro.martinez@test.com\n"
    );
}

#[test]
fn test_render_empty_directory() {
    assert_eq!(
        render_directory(&Directory::default()),
        "=== DOCTORS (0) ===\n\n=== PATIENTS (0) ===\n"
    );
}

#[tokio::test]
async fn test_read_from_firestore_api() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let config = AppConfig {
        patients_collection: "usuarios".to_string(),
        ..test_config.emulator_config(&mock_server.uri())
    };

    Mock::given(method("GET"))
        .and(path(test_config.documents_path("doctors").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockFirestoreResponses::list_response(
            vec![MockFirestoreResponses::document(
                &test_config.project_id,
                "doctors",
                "doc-1",
                MockFirestoreResponses::doctor_fields("Dr. Luis Mendoza", "Pediatría"),
            )],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(test_config.documents_path("usuarios").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockFirestoreResponses::list_response(
            vec![MockFirestoreResponses::document(
                &test_config.project_id,
                "usuarios",
                "pat-1",
                MockFirestoreResponses::patient_fields("Isabel Morales", "isabel.morales@test.com"),
            )],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(FirestoreClient::new(&config, None).unwrap());
    let service = DirectoryService::new(&config, store);
    let rendered = render_directory(&service.read().await.unwrap());

    assert!(rendered.contains("- doc-1 | name: Dr. Luis Mendoza | specialty: Pediatría"));
    assert!(rendered.contains("- pat-1 | name: Isabel Morales | email: isabel.morales@test.com"));
}
