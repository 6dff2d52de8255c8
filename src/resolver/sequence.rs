//! Public sequence-number resolution.
//!
//! Several historical column names for the registration number coexist in
//! stored data. Precedence is an ordered rule list: the first rule that
//! yields a value wins.

use crate::constants::{LEGACY_INSCRIPTION_NUMBER, LEGACY_NUMBER_INSCRICAO, LEGACY_NUMERIC_ID};
use crate::domain::de::scalar_to_string;
use crate::domain::InscriptionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceRule {
    /// The record's `sequence_number` column.
    Explicit,
    /// A legacy numeric-id column.
    Legacy(&'static str),
    /// The record's own identity. Always yields.
    Identity,
}

/// Precedence for a standalone inscription.
pub const INSCRIPTION_RULES: [SequenceRule; 5] = [
    SequenceRule::Explicit,
    SequenceRule::Legacy(LEGACY_NUMBER_INSCRICAO),
    SequenceRule::Legacy(LEGACY_INSCRIPTION_NUMBER),
    SequenceRule::Legacy(LEGACY_NUMERIC_ID),
    SequenceRule::Identity,
];

/// Precedence for a participant inside a group.
pub const PARTICIPANT_RULES: [SequenceRule; 2] = [SequenceRule::Explicit, SequenceRule::Identity];

impl SequenceRule {
    pub fn apply(&self, record: &InscriptionRecord) -> Option<String> {
        match self {
            SequenceRule::Explicit => record.sequence_number.map(|n| n.to_string()),
            SequenceRule::Legacy(column) => record.extra.get(*column).and_then(scalar_to_string),
            SequenceRule::Identity => Some(record.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    pub value: String,
    pub rule: SequenceRule,
}

pub fn resolve_sequence(record: &InscriptionRecord, rules: &[SequenceRule]) -> ResolvedSequence {
    rules
        .iter()
        .find_map(|rule| {
            rule.apply(record).map(|value| ResolvedSequence { value, rule: *rule })
        })
        .unwrap_or_else(|| ResolvedSequence {
            value: record.id.clone(),
            rule: SequenceRule::Identity,
        })
}
