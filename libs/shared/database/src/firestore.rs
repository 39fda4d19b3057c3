use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use shared_config::{missing_credentials_message, AppConfig};
use shared_models::{AppError, ServiceAccountKey};

use crate::store::{CommitResult, DocumentStore, StoredDocument};
use crate::token::{TokenSource, EMULATOR_TOKEN};
use crate::value::Fields;

const PAGE_SIZE: u32 = 300;
const AUTO_ID_LENGTH: usize = 20;
const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<Value>,
    commit_time: Option<DateTime<Utc>>,
}

pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
    database_id: String,
    tokens: TokenSource,
}

impl FirestoreClient {
    /// Builds a client for the configured project; the emulator needs no key.
    pub fn new(config: &AppConfig, key: Option<ServiceAccountKey>) -> Result<Self, AppError> {
        let project_id = config
            .project_id
            .clone()
            .or_else(|| key.as_ref().map(|k| k.project_id.clone()))
            .ok_or_else(|| AppError::Config("no Firestore project id configured".to_string()))?;

        let tokens = match (config.is_emulator(), key) {
            (true, _) => TokenSource::Static(EMULATOR_TOKEN.to_string()),
            (false, Some(key)) => TokenSource::service_account(key),
            (false, None) => {
                return Err(AppError::Credentials(
                    "a service account key is required outside the emulator".to_string(),
                ))
            }
        };

        Ok(Self {
            client: Client::new(),
            base_url: config.api_base_url(),
            project_id,
            database_id: config.database_id.clone(),
            tokens,
        })
    }

    /// Walks the credential chain and loads the key; the emulator works without one.
    pub fn connect(config: &AppConfig, credential_arg: Option<&str>) -> Result<Self, AppError> {
        let key = match config.resolve_credentials(credential_arg) {
            Some(resolved) => {
                info!("Using service account from {}", resolved.source);
                Some(ServiceAccountKey::from_file(&resolved.path)?)
            }
            None if config.is_emulator() => {
                info!("No credentials found, connecting to the emulator at {}", config.api_base_url());
                None
            }
            None => return Err(AppError::Config(missing_credentials_message())),
        };

        Self::new(config, key)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `projects/{p}/databases/{d}/documents`, the prefix of every document name.
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    fn get_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| anyhow!("access token contains invalid header characters"))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/v1/{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let token = self.tokens.bearer(&self.client).await?;
        let headers = self.get_headers(&token)?;

        let mut req = self.client.request(method, &url).headers(headers);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Firestore error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                409 => anyhow!("Document already exists: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let path = format!("{}/{}", self.documents_root(), collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ListDocumentsResponse =
                self.request(Method::GET, &path, &query, None).await?;

            documents.extend(page.documents.into_iter().map(|raw| StoredDocument {
                id: document_id(&raw.name).to_string(),
                fields: raw.fields,
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!("Read {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn batch_create(&self, collection: &str, documents: &[Fields]) -> Result<CommitResult> {
        if documents.is_empty() {
            return Ok(CommitResult::default());
        }

        let root = self.documents_root();
        let document_ids: Vec<String> = documents.iter().map(|_| generate_document_id()).collect();

        let writes: Vec<Value> = documents
            .iter()
            .zip(&document_ids)
            .map(|(fields, id)| {
                json!({
                    "update": {
                        "name": format!("{}/{}/{}", root, collection, id),
                        "fields": fields,
                    },
                    "currentDocument": { "exists": false }
                })
            })
            .collect();

        let path = format!("{}:commit", root);
        let response: CommitResponse = self
            .request(Method::POST, &path, &[], Some(json!({ "writes": writes })))
            .await?;

        if response.write_results.len() != document_ids.len() {
            return Err(anyhow!(
                "commit acknowledged {} of {} writes",
                response.write_results.len(),
                document_ids.len()
            ));
        }

        Ok(CommitResult {
            document_ids,
            commit_time: response.commit_time,
        })
    }
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// 20 alphanumeric characters, the same shape client SDKs use for auto ids.
pub fn generate_document_id() -> String {
    let mut rng = rand::thread_rng();
    (0..AUTO_ID_LENGTH)
        .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}
