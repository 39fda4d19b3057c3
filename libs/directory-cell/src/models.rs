use shared_database::value::string_field;
use shared_database::{Fields, StoredDocument};
use shared_models::AppError;

/// Field names tried in order; older documents use the Spanish schema.
pub const NAME_FIELDS: &[&str] = &["name", "nombre"];
pub const SPECIALTY_FIELDS: &[&str] = &["specialty", "especialidad"];
pub const EMAIL_FIELDS: &[&str] = &["email"];

fn first_present<'a>(fields: &'a Fields, names: &[&str]) -> &'a str {
    names
        .iter()
        .map(|name| string_field(fields, name))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorEntry {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl From<&StoredDocument> for DoctorEntry {
    fn from(doc: &StoredDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: first_present(&doc.fields, NAME_FIELDS).to_string(),
            specialty: first_present(&doc.fields, SPECIALTY_FIELDS).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientEntry {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&StoredDocument> for PatientEntry {
    fn from(doc: &StoredDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: first_present(&doc.fields, NAME_FIELDS).to_string(),
            email: first_present(&doc.fields, EMAIL_FIELDS).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    pub doctors: Vec<DoctorEntry>,
    pub patients: Vec<PatientEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Failed to read collection {collection}: {message}")]
    ReadFailed { collection: String, message: String },
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::Database(err.to_string())
    }
}
