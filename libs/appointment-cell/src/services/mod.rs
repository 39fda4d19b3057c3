pub mod dedup;
pub mod generator;
pub mod reference;
pub mod seeding;
pub mod writer;

pub use dedup::{deduplicate, DedupOutcome};
pub use generator::{choose, compose_instant, parse_hour_label, AppointmentGenerator};
pub use reference::ReferenceTables;
pub use seeding::{plan_from_config, prepare_seed, PreparedSeed, SeedingService};
pub use writer::AppointmentWriter;
