use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const LOCAL_CREDENTIALS_FILE: &str = "serviceAccountKey.json";

pub const DEFAULT_BATCH_SIZE: usize = 250;
/// Firestore rejects commits with more writes than this.
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials_env_path: Option<String>,
    pub project_id: Option<String>,
    pub database_id: String,
    pub firestore_base_url: String,
    pub emulator_host: Option<String>,
    pub doctors_collection: String,
    pub patients_collection: String,
    pub appointments_collection: String,
    pub batch_size: usize,
    pub seed_months: Option<String>,
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials_env_path: None,
            project_id: None,
            database_id: "(default)".to_string(),
            firestore_base_url: "https://firestore.googleapis.com".to_string(),
            emulator_host: None,
            doctors_collection: "doctors".to_string(),
            patients_collection: "users".to_string(),
            appointments_collection: "appointments".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            seed_months: None,
            dry_run: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let credentials_env_path = get(CREDENTIALS_ENV);
        if credentials_env_path.is_none() {
            debug!("{} not set", CREDENTIALS_ENV);
        }

        let emulator_host = get("FIRESTORE_EMULATOR_HOST");
        let project_id = get("FIRESTORE_PROJECT_ID").or_else(|| get("GOOGLE_CLOUD_PROJECT"));
        if emulator_host.is_some() && project_id.is_none() {
            warn!("FIRESTORE_EMULATOR_HOST set without FIRESTORE_PROJECT_ID, the project will come from the service account");
        }

        let config = Self {
            credentials_env_path,
            project_id,
            database_id: get("FIRESTORE_DATABASE_ID").unwrap_or(defaults.database_id),
            firestore_base_url: get("FIRESTORE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.firestore_base_url),
            emulator_host,
            doctors_collection: get("DOCTORS_COLLECTION").unwrap_or(defaults.doctors_collection),
            patients_collection: get("PATIENTS_COLLECTION")
                .unwrap_or(defaults.patients_collection),
            appointments_collection: get("APPOINTMENTS_COLLECTION")
                .unwrap_or(defaults.appointments_collection),
            batch_size: parse_batch_size(get("SEED_BATCH_SIZE").as_deref()),
            seed_months: get("SEED_MONTHS"),
            dry_run: get("SEED_DRY_RUN").map(|v| is_truthy(&v)).unwrap_or(false),
        };

        if !config.is_configured() {
            debug!("No credentials in the environment and no emulator configured - a credential path argument or ./{} will be required", LOCAL_CREDENTIALS_FILE);
        }

        config
    }

    /// True when the environment alone is enough to reach a store.
    pub fn is_configured(&self) -> bool {
        self.credentials_env_path.is_some() || self.is_emulator()
    }

    pub fn is_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }

    /// Root of the REST API, `http://<host>` for the emulator.
    pub fn api_base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => self.firestore_base_url.clone(),
        }
    }

    /// Walks the credential chain against the process working directory.
    pub fn resolve_credentials(&self, arg: Option<&str>) -> Option<ResolvedCredential> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        resolve_credential_path(arg, self.credentials_env_path.as_deref(), &cwd)
    }
}

/// Documents per commit, kept within 1..=MAX_BATCH_SIZE.
pub fn clamp_batch_size(size: usize) -> usize {
    size.clamp(1, MAX_BATCH_SIZE)
}

fn parse_batch_size(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_BATCH_SIZE;
    };

    match raw.trim().parse::<usize>() {
        Ok(size) => {
            let clamped = clamp_batch_size(size);
            if clamped != size {
                warn!("SEED_BATCH_SIZE {} is outside 1..={}, using {}", size, MAX_BATCH_SIZE, clamped);
            }
            clamped
        }
        Err(_) => {
            warn!("SEED_BATCH_SIZE is not a number ({}), using default {}", raw, DEFAULT_BATCH_SIZE);
            DEFAULT_BATCH_SIZE
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Argument,
    Environment,
    WorkingDirectory,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Argument => write!(f, "command-line argument"),
            CredentialSource::Environment => write!(f, "{}", CREDENTIALS_ENV),
            CredentialSource::WorkingDirectory => write!(f, "./{}", LOCAL_CREDENTIALS_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub path: PathBuf,
    pub source: CredentialSource,
}

/// First existing file among the argument, the environment path and the local key file.
pub fn resolve_credential_path(
    arg: Option<&str>,
    env_path: Option<&str>,
    cwd: &Path,
) -> Option<ResolvedCredential> {
    let candidates = [
        (arg.map(PathBuf::from), CredentialSource::Argument),
        (env_path.map(PathBuf::from), CredentialSource::Environment),
        (Some(cwd.join(LOCAL_CREDENTIALS_FILE)), CredentialSource::WorkingDirectory),
    ];

    for (path, source) in candidates {
        let Some(path) = path else { continue };
        if path.is_file() {
            debug!("Using credentials from {} ({})", source, path.display());
            return Some(ResolvedCredential { path, source });
        }
        if source != CredentialSource::WorkingDirectory {
            warn!("Credential path from {} does not exist: {}", source, path.display());
        }
    }

    None
}

/// Message shown when no credential file resolves.
pub fn missing_credentials_message() -> String {
    format!(
        "Missing service account JSON. Pass its path as the first argument, set {}, or place {} in the working directory.",
        CREDENTIALS_ENV, LOCAL_CREDENTIALS_FILE
    )
}
