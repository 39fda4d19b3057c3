// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use shared_database::{FieldValue, Fields};
use shared_models::AppError;

// ==============================================================================
// REFERENCE DATA
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// CANDIDATE APPOINTMENTS
// ==============================================================================

/// An appointment built in memory, not yet deduplicated or persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCandidate {
    pub doctor_id: String,
    pub patient_id: String,
    pub doctor_name: String,
    /// Holds the doctor's specialty; existing readers know the field by this name.
    #[serde(rename = "patientSpecialty")]
    pub doctor_specialty: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub hour_label: String,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AppointmentCandidate {
    pub fn is_first_visit(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }

    /// Calendar date of the visit, in UTC.
    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_at.date_naive()
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            doctor_id: self.doctor_id.clone(),
            date: self.scheduled_date(),
            hour_label: self.hour_label.clone(),
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey {
            doctor_id: self.doctor_id.clone(),
            patient_id: self.patient_id.clone(),
            date: self.scheduled_date(),
        }
    }

    /// Wire shape of the persisted document.
    pub fn to_document(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("doctorId".into(), self.doctor_id.as_str().into());
        fields.insert("patientId".into(), self.patient_id.as_str().into());
        fields.insert("doctorName".into(), self.doctor_name.as_str().into());
        fields.insert("patientSpecialty".into(), self.doctor_specialty.as_str().into());
        fields.insert("patientName".into(), self.patient_name.as_str().into());
        fields.insert("patientEmail".into(), self.patient_email.as_str().into());
        fields.insert("patientPhone".into(), self.patient_phone.as_str().into());
        fields.insert("reason".into(), self.reason.as_str().into());
        fields.insert("status".into(), FieldValue::from(self.status.to_string()));
        fields.insert("hourLabel".into(), self.hour_label.as_str().into());
        fields.insert("scheduledAt".into(), self.scheduled_at.into());
        fields.insert("createdAt".into(), self.created_at.into());
        fields.insert("isFirstVisit".into(), self.is_first_visit().into());
        fields
    }

    /// Plain JSON view, used for dry runs.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("isFirstVisit".into(), Value::Bool(self.is_first_visit()));
        }
        Ok(value)
    }
}

/// At most one appointment per doctor, date and hour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub hour_label: String,
}

/// At most one appointment per doctor and patient on a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub doctor_id: String,
    pub patient_id: String,
    pub date: NaiveDate,
}

// ==============================================================================
// SEED PLAN
// ==============================================================================

/// Upper bound on appointments generated for a single month.
pub const MAX_MONTH_COUNT: usize = 10_000;
/// Upper bound on a month's offset seed.
pub const MAX_OFFSET_SEED: usize = 1_000_000;

/// One month of generated appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthContext {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub offset_seed: usize,
}

impl MonthContext {
    pub fn new(year: i32, month: u32, count: usize, offset_seed: usize) -> Self {
        Self { year, month, count, offset_seed }
    }

    /// Rejects months the generator cannot build.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        if !(1..=12).contains(&self.month) {
            return Err(AppointmentError::InvalidSeedPlan(format!("month {} out of range", self.month)));
        }
        if self.count > MAX_MONTH_COUNT {
            return Err(AppointmentError::InvalidSeedPlan(format!(
                "count {} for {:04}-{:02} exceeds {}",
                self.count, self.year, self.month, MAX_MONTH_COUNT
            )));
        }
        if self.offset_seed > MAX_OFFSET_SEED {
            return Err(AppointmentError::InvalidSeedPlan(format!(
                "offset seed {} for {:04}-{:02} exceeds {}",
                self.offset_seed, self.year, self.month, MAX_OFFSET_SEED
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MonthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}:{}:{}", self.year, self.month, self.count, self.offset_seed)
    }
}

/// Parses `YYYY-MM:count:seed`.
impl FromStr for MonthContext {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppointmentError::InvalidSeedPlan(format!("expected YYYY-MM:count:seed, got {:?}", s));

        let mut parts = s.trim().split(':');
        let (Some(year_month), Some(count), Some(seed), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let (year, month) = year_month.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        let context = Self {
            year,
            month,
            count: count.parse().map_err(|_| invalid())?,
            offset_seed: seed.parse().map_err(|_| invalid())?,
        };
        context.validate()?;

        Ok(context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub months: Vec<MonthContext>,
}

impl Default for SeedPlan {
    /// November and December 2025, 30 appointments each.
    fn default() -> Self {
        Self {
            months: vec![
                MonthContext::new(2025, 11, 30, 1),
                MonthContext::new(2025, 12, 30, 101),
            ],
        }
    }
}

impl FromStr for SeedPlan {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<MonthContext>, _>>()?;

        if months.is_empty() {
            return Err(AppointmentError::InvalidSeedPlan("no months given".to_string()));
        }

        Ok(Self { months })
    }
}

impl SeedPlan {
    pub fn total_candidates(&self) -> usize {
        self.months.iter().fold(0, |total, m| total.saturating_add(m.count))
    }
}

// ==============================================================================
// RESULTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// 1-based position of the chunk in the run.
    pub index: usize,
    pub documents: usize,
    pub document_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub generated: usize,
    pub kept: usize,
    pub skipped: usize,
    pub chunks: usize,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Reference table {0} is empty")]
    EmptyTable(&'static str),

    #[error("Invalid hour label: {0:?}")]
    InvalidHourLabel(String),

    #[error("Invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid seed plan: {0}")]
    InvalidSeedPlan(String),

    #[error("Batch {chunk} failed: {message}")]
    BatchWriteFailed { chunk: usize, message: String },
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::InvalidSeedPlan(_) => AppError::Config(err.to_string()),
            AppointmentError::BatchWriteFailed { .. } => AppError::Database(err.to_string()),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}
