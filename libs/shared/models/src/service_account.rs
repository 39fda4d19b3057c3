use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Google service-account key file, as downloaded from the cloud console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&raw)
            .map_err(|e| AppError::Credentials(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| AppError::Credentials(format!("malformed service account JSON: {}", e)))?;

        if let Some(kind) = key.account_type.as_deref() {
            if kind != "service_account" {
                return Err(AppError::Credentials(format!(
                    "expected a service_account key, found type {}",
                    kind
                )));
            }
        }

        if key.project_id.is_empty() || key.client_email.is_empty() {
            return Err(AppError::Credentials(
                "service account is missing project_id or client_email".to_string(),
            ));
        }

        Ok(key)
    }
}
