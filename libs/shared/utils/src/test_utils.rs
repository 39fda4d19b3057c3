use chrono::Utc;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::ServiceAccountKey;

const TEST_SERVICE_ACCOUNT: &str = include_str!("../fixtures/test_service_account.json");

pub struct TestConfig {
    pub project_id: String,
    pub database_id: String,
    pub batch_size: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            project_id: "clinic-seed-test".to_string(),
            database_id: "(default)".to_string(),
            batch_size: 250,
        }
    }
}

impl TestConfig {
    /// Points the tools at a mock server speaking the emulator protocol.
    pub fn emulator_config(&self, server_uri: &str) -> AppConfig {
        AppConfig {
            project_id: Some(self.project_id.clone()),
            database_id: self.database_id.clone(),
            emulator_host: Some(server_uri.to_string()),
            batch_size: self.batch_size,
            ..AppConfig::default()
        }
    }

    /// Production-style config: service-account auth against a mock base url.
    pub fn service_account_config(&self, server_uri: &str) -> AppConfig {
        AppConfig {
            project_id: None,
            database_id: self.database_id.clone(),
            firestore_base_url: server_uri.to_string(),
            batch_size: self.batch_size,
            ..AppConfig::default()
        }
    }

    pub fn documents_path(&self, collection: &str) -> String {
        format!(
            "/v1/projects/{}/databases/{}/documents/{}",
            self.project_id, self.database_id, collection
        )
    }

    pub fn commit_path(&self) -> String {
        format!(
            "/v1/projects/{}/databases/{}/documents:commit",
            self.project_id, self.database_id
        )
    }
}

/// Service account backed by a throwaway RSA key, exchanging tokens at `token_uri`.
pub fn test_service_account(token_uri: &str) -> ServiceAccountKey {
    let mut key = ServiceAccountKey::from_json(TEST_SERVICE_ACCOUNT)
        .expect("fixture service account must parse");
    key.token_uri = token_uri.to_string();
    key
}

pub fn test_service_account_json() -> &'static str {
    TEST_SERVICE_ACCOUNT
}

pub struct MockFirestoreResponses;

impl MockFirestoreResponses {
    pub fn document(project_id: &str, collection: &str, id: &str, fields: Value) -> Value {
        json!({
            "name": format!("projects/{}/databases/(default)/documents/{}/{}", project_id, collection, id),
            "fields": fields,
            "createTime": "2025-10-01T12:00:00.000000Z",
            "updateTime": "2025-10-01T12:00:00.000000Z"
        })
    }

    pub fn doctor_fields(name: &str, specialty: &str) -> Value {
        json!({
            "name": {"stringValue": name},
            "specialty": {"stringValue": specialty}
        })
    }

    pub fn patient_fields(name: &str, email: &str) -> Value {
        json!({
            "name": {"stringValue": name},
            "email": {"stringValue": email},
            "phone": {"stringValue": "5550000000"}
        })
    }

    pub fn list_response(documents: Vec<Value>, next_page_token: Option<&str>) -> Value {
        match next_page_token {
            Some(token) => json!({ "documents": documents, "nextPageToken": token }),
            None => json!({ "documents": documents }),
        }
    }

    pub fn commit_response(writes: usize) -> Value {
        let now = Utc::now().to_rfc3339();
        let results: Vec<Value> = (0..writes).map(|_| json!({ "updateTime": now })).collect();
        json!({ "writeResults": results, "commitTime": now })
    }

    pub fn token_response(access_token: &str) -> Value {
        json!({
            "access_token": access_token,
            "expires_in": 3599,
            "token_type": "Bearer"
        })
    }

    pub fn error_response(code: u16, status: &str, message: &str) -> Value {
        json!({
            "error": { "code": code, "message": message, "status": status }
        })
    }
}
