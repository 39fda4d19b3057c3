use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_database::{DocumentStore, StoredDocument};

use crate::models::{Directory, DirectoryError, DoctorEntry, PatientEntry};

pub struct DirectoryService {
    store: Arc<dyn DocumentStore>,
    doctors_collection: String,
    patients_collection: String,
}

impl DirectoryService {
    pub fn new(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            doctors_collection: config.doctors_collection.clone(),
            patients_collection: config.patients_collection.clone(),
        }
    }

    async fn read_collection(&self, collection: &str) -> Result<Vec<StoredDocument>, DirectoryError> {
        debug!("Reading collection {}", collection);

        self.store.list_documents(collection).await.map_err(|e| {
            error!("Reading {} failed: {:#}", collection, e);
            DirectoryError::ReadFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Reads doctors, then patients.
    pub async fn read(&self) -> Result<Directory, DirectoryError> {
        let doctors = self.read_collection(&self.doctors_collection).await?;
        let patients = self.read_collection(&self.patients_collection).await?;

        Ok(Directory {
            doctors: doctors.iter().map(DoctorEntry::from).collect(),
            patients: patients.iter().map(PatientEntry::from).collect(),
        })
    }
}

pub fn render_directory(directory: &Directory) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== DOCTORS ({}) ===", directory.doctors.len());
    for doctor in &directory.doctors {
        let _ = writeln!(out, "- {} | name: {} | specialty: {}", doctor.id, doctor.name, doctor.specialty);
    }

    let _ = writeln!(out, "\n=== PATIENTS ({}) ===", directory.patients.len());
    for patient in &directory.patients {
        let _ = writeln!(out, "- {} | name: {} | email: {}", patient.id, patient.name, patient.email);
    }

    out
}
