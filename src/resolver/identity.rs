use serde_json::Value;
use thiserror::Error;

use crate::constants::{
    CONTACT_METADATA, GROUP_SIZE_FIELD, NAME_TOKENS, NO_NAME, RESPONSIBLE_TOKENS,
};
use crate::domain::de::{lenient_int, scalar_to_string};
use crate::domain::FormData;

#[derive(Error, Debug)]
pub enum FormDataError {
    #[error("serialized form data is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("form data is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads stored form data, which is either an object or that object serialized
/// into a string. Null and blank strings mean "no answers".
pub fn parse_form_data(raw: &Value) -> Result<FormData, FormDataError> {
    match raw {
        Value::Null => Ok(FormData::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::String(s) if s.trim().is_empty() => Ok(FormData::new()),
        Value::String(s) => match serde_json::from_str::<Value>(s)? {
            Value::Object(map) => Ok(map),
            other => Err(FormDataError::NotAnObject(kind_of(&other))),
        },
        other => Err(FormDataError::NotAnObject(kind_of(other))),
    }
}

fn is_name_label(label: &str) -> bool {
    let label = label.to_lowercase();
    NAME_TOKENS.iter().any(|token| label.contains(token))
        && !RESPONSIBLE_TOKENS.iter().any(|token| label.contains(token))
}

/// First non-empty value under a name-like, non-responsible label, in key order.
/// Later matches are ignored even when more specific.
pub fn extract_candidate_name(form_data: &FormData) -> String {
    form_data
        .iter()
        .filter(|(label, _)| is_name_label(label))
        .find_map(|(_, value)| value.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| NO_NAME.to_string())
}

/// Group size as declared in the form, when it parses.
pub fn declared_group_size(form_data: &FormData) -> Option<i64> {
    form_data.get(GROUP_SIZE_FIELD).and_then(lenient_int)
}

/// Declared group size, defaulting to 1 when absent, non-numeric or below 1.
pub fn group_size(form_data: &FormData) -> usize {
    declared_group_size(form_data)
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(1)
}

/// Contact mapping rebuilt from the metadata a participant carries about the
/// person who registered the group. Absent fields are omitted.
///
/// Every synthesized label names the responsible person, so
/// [`extract_candidate_name`] on the result always yields `-`. Groups read
/// their display name from the participant count instead.
pub fn synthesize_contact(participant_form: &FormData) -> FormData {
    CONTACT_METADATA
        .iter()
        .filter_map(|(meta_key, label)| {
            participant_form
                .get(*meta_key)
                .and_then(scalar_to_string)
                .map(|value| (label.to_string(), Value::String(value)))
        })
        .collect()
}

/// Looks up the first label slot that holds a value. Labels compare
/// case-insensitively; each slot lists its accepted spellings.
pub fn lookup_labeled(form_data: &FormData, slots: &[&[&str]]) -> Option<String> {
    slots.iter().find_map(|spellings| {
        form_data
            .iter()
            .filter(|(label, _)| {
                let label = label.trim();
                spellings.iter().any(|s| s.eq_ignore_ascii_case(label))
            })
            .find_map(|(_, value)| scalar_to_string(value))
    })
}
