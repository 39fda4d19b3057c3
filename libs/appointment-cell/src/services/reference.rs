use crate::models::{AppointmentError, AppointmentStatus, Doctor, Patient};
use crate::services::generator::parse_hour_label;

/// Doctors registered in the clinic project, as listed by `list-users`.
pub static DOCTORS: [Doctor; 12] = [
    Doctor { id: "1lwEoUV8uRUR3GtsQ1LM", name: "Dr. Cardiología 1", specialty: "Cardiología" },
    Doctor { id: "3yU4YCK8GChJa3vnuDWPRrSjbZs1", name: "Dr. Neurología 1", specialty: "Neurología" },
    Doctor { id: "5BALCApgGpWsgPMhnvt2ZThli8F3", name: "Dr. Roberto Sánchez", specialty: "Cardiología" },
    Doctor { id: "F7v82AF9vaSH5LQz7oCmB9NKLqH2", name: "Dr. Neurología 2", specialty: "Neurología" },
    Doctor { id: "FpUIspZ7R0MkPI48DVTgme1ccRr2", name: "Dr. Manuel Pascal", specialty: "Pediatría" },
    Doctor { id: "GCs4HuGZCyXFaYWlYzj0gfwsLXM2", name: "Dra. Carmen Reyes", specialty: "Traumatología" },
    Doctor { id: "MyyrtH93xdQmgMpU07KJOWKUI1i2", name: "Dr. Dario Gonzales", specialty: "Neurología" },
    Doctor { id: "Pt8XY66YhqNlm0d0Czkj4sm89r22", name: "Dr. Luis Mendoza", specialty: "Pediatría" },
    Doctor { id: "byRypOr8heZBDb1yQ0mPcYJMT1u2", name: "Dr. Jorge Castro", specialty: "Oftalmología" },
    Doctor { id: "hWJd1Ad7K7fLoCBxgxkD4PTSbUv2", name: "Dra. Ana Flores", specialty: "Dermatología" },
    Doctor { id: "n3SXJNb98TZUsBm4smBNFILHsby1", name: "Dr. n3SXJ", specialty: "Cardiología" },
    Doctor { id: "sYbNWV9tNFedjKERO8XYrfGX4Ct1", name: "Dra. Olivia Silveira", specialty: "Ginecología" },
];

pub static PATIENTS: [Patient; 22] = [
    Patient { id: "3yU4YCK8GChJa3vnuDWPRrSjbZs1", name: "David Figueroa", email: "david.figueroa@gmail.com", phone: "5551010101" },
    Patient { id: "4eN52R8LP8VgpjTKuQ97iDJFKQv1", name: "Pedro Martínez", email: "pedro.martinez@test.com", phone: "5552020202" },
    Patient { id: "AG4rwQVU60ZwEtIUnV9HEJYA4sx2", name: "Carmen Silva", email: "carmen.silva@test.com", phone: "5553030303" },
    Patient { id: "DbuMvPnxSKbQpW8vBFqzoU4O6qM2", name: "José Rodríguez", email: "jose.rodriguez@test.com", phone: "5554040404" },
    Patient { id: "EaQRGeyWCSNVfSHS6RoXjm49D982", name: "Miguel Torres", email: "miguel.torres@test.com", phone: "5555050505" },
    Patient { id: "FpUIspZ7R0MkPI48DVTgme1ccRr2", name: "Manuel Pascal", email: "manu.pas@gmail.com", phone: "5556060606" },
    Patient { id: "GCs4HuGZCyXFaYWlYzj0gfwsLXM2", name: "Dra. Carmen Reyes", email: "dra..carmen.reyes@hospital.com", phone: "5557070707" },
    Patient { id: "IjLgEGoaPCQ2lsopnEzkcEemIcv2", name: "David Figueroa", email: "tutroyano2001@gmail.com", phone: "5558080808" },
    Patient { id: "JxvnCUFO9Oh6uemTxiCHBEFK25X2", name: "María García", email: "maria.garcia@test.com", phone: "5559090909" },
    Patient { id: "MyyrtH93xdQmgMpU07KJOWKUI1i2", name: "Dario Gonzales", email: "dario@gmail.com", phone: "5551111111" },
    Patient { id: "Pt8XY66YhqNlm0d0Czkj4sm89r22", name: "Dr. Luis Mendoza", email: "dr..luis.mendoza@hospital.com", phone: "5551212121" },
    Patient { id: "X8pcui7od3QxM12mEbUQ71XMP672", name: "Isabel Morales", email: "isabel.morales@test.com", phone: "5551313131" },
    Patient { id: "bcmr6k1Iq4d4LnNlsLuSlWq9Ir02", name: "Laura Hernández", email: "laura.hernández@test.com", phone: "5551414141" },
    Patient { id: "byRypOr8heZBDb1yQ0mPcYJMT1u2", name: "Dr. Jorge Castro", email: "dr..jorge.castro@hospital.com", phone: "5551515151" },
    Patient { id: "fcMhxQsmN9T6CsLLo8TCX39OY402", name: "Ana López", email: "ana.lópez@test.com", phone: "5551616161" },
    Patient { id: "hWJd1Ad7K7fLoCBxgxkD4PTSbUv2", name: "Dra. Ana Flores", email: "dra..ana.flores@hospital.com", phone: "5551717171" },
    Patient { id: "kKP9C1lOzudCej6noRXTSJuSarV2", name: "Carlos Ramírez", email: "carlos.ramirez@test.com", phone: "5551818181" },
    Patient { id: "n3SXJNb98TZUsBm4smBNFILHsby1", name: "Maria Cruz", email: "mari.cruz@gmail.com", phone: "5551919191" },
    Patient { id: "sYbNWV9tNFedjKERO8XYrfGX4Ct1", name: "Olivia Silveira", email: "oli.sil@gmail.com", phone: "5552021222" },
    Patient { id: "sqljlAz0jlMUX3zxHhjReEmtiNl1", name: "Juan Pérez", email: "juan.perez@test.com", phone: "5552121212" },
    Patient { id: "F7v82AF9vaSH5LQz7oCmB9NKLqH2", name: "Oto Octavius", email: "oto.octa@gmail.com", phone: "5552222222" },
    Patient { id: "5BALCApgGpWsgPMhnvt2ZThli8F3", name: "Dr. Roberto Sánchez", email: "dr.roberto.sánchez@hospital.com", phone: "5552323232" },
];

pub static REASONS: [&str; 12] = [
    "Chequeo general",
    "Dolor de cabeza recurrente",
    "Revisión post-operatoria",
    "Consulta de seguimiento",
    "Dolor abdominal leve",
    "Control de presión arterial",
    "Revisión de laboratorio",
    "Molestias articulares",
    "Evaluación de alergias",
    "Consulta nutricional",
    "Fatiga persistente",
    "Control de diabetes",
];

pub static HOUR_LABELS: [&str; 6] = [
    "09:00 AM",
    "10:00 AM",
    "11:30 AM",
    "02:00 PM",
    "03:30 PM",
    "05:00 PM",
];

pub static STATUSES: [AppointmentStatus; 3] = [
    AppointmentStatus::Pending,
    AppointmentStatus::Completed,
    AppointmentStatus::Cancelled,
];

/// The lookup tables the generator draws from.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTables<'a> {
    pub doctors: &'a [Doctor],
    pub patients: &'a [Patient],
    pub reasons: &'a [&'a str],
    pub hours: &'a [&'a str],
    pub statuses: &'a [AppointmentStatus],
}

impl ReferenceTables<'static> {
    pub fn builtin() -> Self {
        Self {
            doctors: &DOCTORS,
            patients: &PATIENTS,
            reasons: &REASONS,
            hours: &HOUR_LABELS,
            statuses: &STATUSES,
        }
    }
}

impl Default for ReferenceTables<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceTables<'_> {
    /// Rejects empty tables and malformed hour labels before anything is generated.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        if self.doctors.is_empty() {
            return Err(AppointmentError::EmptyTable("doctors"));
        }
        if self.patients.is_empty() {
            return Err(AppointmentError::EmptyTable("patients"));
        }
        if self.reasons.is_empty() {
            return Err(AppointmentError::EmptyTable("reasons"));
        }
        if self.hours.is_empty() {
            return Err(AppointmentError::EmptyTable("hours"));
        }
        if self.statuses.is_empty() {
            return Err(AppointmentError::EmptyTable("statuses"));
        }

        for label in self.hours {
            parse_hour_label(label)?;
        }

        Ok(())
    }
}
