use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::{AppointmentCandidate, AppointmentError, AppointmentStatus, MonthContext, SeedPlan};
use crate::services::reference::ReferenceTables;

/// Days rotate through 1..=28 so every month has them.
pub const DAY_ROTATION: u32 = 28;
pub const CREATION_HOUR_LABEL: &str = "9:00 AM";
const CREATION_LEAD_DAYS: u32 = 2;

fn hour_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0?[1-9]|1[0-2]):([0-5][0-9]) (AM|PM)$").expect("hour label pattern is valid")
    })
}

/// `items[index mod len]`; reproducible stand-in for a random pick.
pub fn choose<T>(items: &[T], index: usize) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(index % items.len())
}

/// Converts `H:MM AM|PM` to a 24-hour time of day.
pub fn parse_hour_label(label: &str) -> Result<NaiveTime, AppointmentError> {
    let invalid = || AppointmentError::InvalidHourLabel(label.to_string());
    let captures = hour_label_pattern().captures(label).ok_or_else(invalid)?;

    let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minute: u32 = captures[2].parse().map_err(|_| invalid())?;

    let hour = match (&captures[3], hour) {
        ("AM", 12) => 0,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        (_, h) => h,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Absolute UTC instant for a calendar day and a 12-hour clock label.
pub fn compose_instant(
    year: i32,
    month: u32,
    day: u32,
    hour_label: &str,
) -> Result<DateTime<Utc>, AppointmentError> {
    let time = parse_hour_label(hour_label)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(AppointmentError::InvalidDate { year, month, day })?;

    Ok(date.and_time(time).and_utc())
}

/// `index * stride + seed`, or an error when it does not fit in `usize`.
fn table_position(index: usize, stride: usize, seed: usize) -> Result<usize, AppointmentError> {
    index
        .checked_mul(stride)
        .and_then(|position| position.checked_add(seed))
        .ok_or_else(|| AppointmentError::InvalidSeedPlan(format!("position {} with seed {} overflows", index, seed)))
}

/// Next value of the running day counter: 1 -> 2, ..., 28 -> 1.
pub fn next_day(day: u32) -> u32 {
    (day % DAY_ROTATION) + 1
}

#[derive(Debug)]
pub struct AppointmentGenerator<'a> {
    tables: ReferenceTables<'a>,
}

impl<'a> AppointmentGenerator<'a> {
    pub fn new(tables: ReferenceTables<'a>) -> Result<Self, AppointmentError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// Builds the candidate at sequence position `index` for the given day.
    ///
    /// Status reuses the doctor's offset expression, so each doctor position
    /// always carries the same status.
    pub fn build_candidate(
        &self,
        context: &MonthContext,
        index: usize,
        day: u32,
    ) -> Result<AppointmentCandidate, AppointmentError> {
        let seed = context.offset_seed;
        let doctor = choose(self.tables.doctors, table_position(index, 1, seed)?).ok_or(AppointmentError::EmptyTable("doctors"))?;
        let patient = choose(self.tables.patients, table_position(index, 7, seed)?).ok_or(AppointmentError::EmptyTable("patients"))?;
        let hour_label = *choose(self.tables.hours, table_position(index, 3, seed)?).ok_or(AppointmentError::EmptyTable("hours"))?;
        let status: AppointmentStatus = *choose(self.tables.statuses, table_position(index, 1, seed)?).ok_or(AppointmentError::EmptyTable("statuses"))?;
        let reason = *choose(self.tables.reasons, table_position(index, 5, seed)?).ok_or(AppointmentError::EmptyTable("reasons"))?;

        let scheduled_at = compose_instant(context.year, context.month, day, hour_label)?;
        let created_day = day.saturating_sub(CREATION_LEAD_DAYS).max(1);
        let created_at = compose_instant(context.year, context.month, created_day, CREATION_HOUR_LABEL)?;

        Ok(AppointmentCandidate {
            doctor_id: doctor.id.to_string(),
            patient_id: patient.id.to_string(),
            doctor_name: doctor.name.to_string(),
            doctor_specialty: doctor.specialty.to_string(),
            patient_name: patient.name.to_string(),
            patient_email: patient.email.to_string(),
            patient_phone: patient.phone.to_string(),
            reason: reason.to_string(),
            status,
            hour_label: hour_label.to_string(),
            scheduled_at,
            created_at,
        })
    }

    /// `count` candidates for one month; the day counter starts at 1 and is advanced before use.
    pub fn generate_month(&self, context: &MonthContext) -> Result<Vec<AppointmentCandidate>, AppointmentError> {
        context.validate()?;

        let mut candidates = Vec::with_capacity(context.count);
        let mut day = 1;

        for index in 0..context.count {
            day = next_day(day);
            candidates.push(self.build_candidate(context, index, day)?);
        }

        debug!("Generated {} candidates for {:04}-{:02} (seed {})",
               candidates.len(), context.year, context.month, context.offset_seed);

        Ok(candidates)
    }

    /// All months of the plan, concatenated in plan order.
    pub fn generate(&self, plan: &SeedPlan) -> Result<Vec<AppointmentCandidate>, AppointmentError> {
        for context in &plan.months {
            context.validate()?;
        }

        let mut candidates = Vec::with_capacity(plan.total_candidates());
        for context in &plan.months {
            candidates.extend(self.generate_month(context)?);
        }
        Ok(candidates)
    }
}
