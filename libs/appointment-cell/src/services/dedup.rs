use std::collections::HashSet;
use tracing::debug;

use crate::models::{AppointmentCandidate, PairKey, SlotKey};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    pub kept: Vec<AppointmentCandidate>,
    pub skipped: usize,
}

/// Single greedy pass: a candidate survives only if neither its slot key nor
/// its pair key was claimed by an earlier survivor.
pub fn deduplicate(candidates: Vec<AppointmentCandidate>) -> DedupOutcome {
    let mut slots: HashSet<SlotKey> = HashSet::with_capacity(candidates.len());
    let mut pairs: HashSet<PairKey> = HashSet::with_capacity(candidates.len());
    let mut outcome = DedupOutcome::default();

    for candidate in candidates {
        let slot = candidate.slot_key();
        let pair = candidate.pair_key();

        if slots.contains(&slot) || pairs.contains(&pair) {
            debug!("Skipping {} with patient {} on {} at {}",
                   candidate.doctor_id, candidate.patient_id, slot.date, slot.hour_label);
            outcome.skipped += 1;
            continue;
        }

        slots.insert(slot);
        pairs.insert(pair);
        outcome.kept.push(candidate);
    }

    outcome
}
