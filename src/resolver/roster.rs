use crate::constants::{PARTICIPANT_AGE_LABELS, PARTICIPANT_NAME_LABELS};
use crate::domain::{FormData, InscriptionRecord, RosterEntry};
use crate::resolver::identity::lookup_labeled;
use crate::resolver::sequence::{resolve_sequence, PARTICIPANT_RULES};

/// A participant record paired with its parsed form data.
pub struct Participant<'a> {
    pub record: &'a InscriptionRecord,
    pub form_data: FormData,
}

impl Participant<'_> {
    pub fn sequence_number(&self) -> String {
        resolve_sequence(self.record, &PARTICIPANT_RULES).value
    }
}

pub fn roster_entry(index: usize, participant: &Participant<'_>) -> RosterEntry {
    let name = lookup_labeled(&participant.form_data, PARTICIPANT_NAME_LABELS)
        .unwrap_or_else(|| format!("Participant {}", index + 1));
    RosterEntry {
        name,
        age: lookup_labeled(&participant.form_data, PARTICIPANT_AGE_LABELS),
        sequence_number: participant.sequence_number(),
    }
}

pub fn build_roster(participants: &[Participant<'_>]) -> Vec<RosterEntry> {
    participants
        .iter()
        .enumerate()
        .map(|(index, participant)| roster_entry(index, participant))
        .collect()
}
