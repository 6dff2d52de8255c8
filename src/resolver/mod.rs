//! Turns a page definition and a stored submission into a confirmation view.
//!
//! Everything here is a pure function of its inputs. Missing optional data
//! always has a fallback; recovered input problems are reported as
//! [`DataIssue`]s on the view instead of failing.

pub mod identity;
pub mod payment;
pub mod roster;
pub mod sequence;
pub mod whatsapp;

use crate::constants::SEQUENCE_SEPARATOR;
use crate::domain::{
    DataIssue, FormData, InscriptionGroup, InscriptionRecord, PageDefinition, RegistrationView,
    Submission, SubmissionRef,
};
use crate::error::{RegistrationError, Result};
use identity::{declared_group_size, extract_candidate_name, group_size, parse_form_data};
use payment::{derive_payment, PaymentContext};
use roster::{build_roster, Participant};
use sequence::{resolve_sequence, INSCRIPTION_RULES};

pub struct RegistrationViewResolver;

impl RegistrationViewResolver {
    /// Resolves a located submission. Fails only when none of the submission's
    /// records belong to `page`.
    pub fn resolve(page: &PageDefinition, submission: &Submission) -> Result<RegistrationView> {
        match submission {
            Submission::Individual(record) => {
                if !record.belongs_to(page) {
                    return Err(RegistrationError::SubmissionNotFound(format!(
                        "inscription {} on page {}",
                        record.id, page.slug
                    )));
                }
                Ok(resolve_individual(page, record))
            }
            Submission::Group(group) => resolve_group(page, group),
        }
    }

    /// Maps lookups that came back empty to the matching not-found error.
    /// The page is checked first.
    pub fn resolve_lookup(
        slug: &str,
        page: Option<&PageDefinition>,
        requested: &SubmissionRef,
        submission: Option<&Submission>,
    ) -> Result<RegistrationView> {
        let page = page.ok_or_else(|| RegistrationError::PageNotFound(slug.to_string()))?;
        let submission =
            submission.ok_or_else(|| RegistrationError::SubmissionNotFound(requested.to_string()))?;
        Self::resolve(page, submission)
    }
}

fn parse_or_recover(record: &InscriptionRecord, issues: &mut Vec<DataIssue>) -> FormData {
    parse_form_data(&record.form_data).unwrap_or_else(|e| {
        issues.push(DataIssue::MalformedFormData {
            record_id: record.id.clone(),
            reason: e.to_string(),
        });
        FormData::new()
    })
}

fn join_sequences(numbers: &[String]) -> String {
    numbers.join(SEQUENCE_SEPARATOR)
}

fn group_display_name(participant_count: usize) -> String {
    let noun = if participant_count == 1 {
        "participant"
    } else {
        "participants"
    };
    format!("Group of {participant_count} {noun}")
}

fn resolve_individual(page: &PageDefinition, record: &InscriptionRecord) -> RegistrationView {
    let mut data_issues = Vec::new();
    let form_data = parse_or_recover(record, &mut data_issues);

    // A declared group size only changes payment wording; there is no roster.
    let group_size = group_size(&form_data);
    let is_group = group_size > 1;
    let candidate_name = extract_candidate_name(&form_data);
    let sequence = resolve_sequence(record, &INSCRIPTION_RULES).value;

    let payment = derive_payment(
        page,
        &PaymentContext {
            is_group,
            participant_count: group_size,
            reference_sequence: &sequence,
            candidate_name: &candidate_name,
        },
    );

    RegistrationView {
        page_slug: page.slug.clone(),
        page_label: page.label.clone(),
        display_name: candidate_name.clone(),
        candidate_name,
        is_group,
        participant_count: group_size,
        sequence_display: sequence.clone(),
        reference_sequence: sequence.clone(),
        sequence_numbers: vec![sequence],
        roster: Vec::new(),
        contact: form_data,
        confirmation_message: page.confirmation_message().to_string(),
        payment,
        data_issues,
    }
}

fn resolve_group(page: &PageDefinition, group: &InscriptionGroup) -> Result<RegistrationView> {
    let mut data_issues = Vec::new();

    let mut records = Vec::with_capacity(group.records.len());
    for record in &group.records {
        if record.belongs_to(page) {
            records.push(record);
        } else {
            data_issues.push(DataIssue::ForeignPageRecord {
                record_id: record.id.clone(),
            });
        }
    }
    if records.is_empty() {
        return Err(RegistrationError::SubmissionNotFound(format!(
            "group {} on page {}",
            group.group_id, page.slug
        )));
    }

    let mut responsible: Option<&InscriptionRecord> = None;
    let mut participants = Vec::new();
    for record in records {
        if !record.is_responsible {
            participants.push(Participant {
                record,
                form_data: parse_or_recover(record, &mut data_issues),
            });
        } else if responsible.is_none() {
            responsible = Some(record);
        } else {
            data_issues.push(DataIssue::ExtraResponsible {
                record_id: record.id.clone(),
            });
        }
    }

    let participant_count = participants.len();
    let is_group = participant_count > 0;

    let contact = match (responsible, participants.first()) {
        (Some(record), _) => parse_or_recover(record, &mut data_issues),
        (None, Some(first)) => identity::synthesize_contact(&first.form_data),
        (None, None) => FormData::new(),
    };

    if responsible.is_some() {
        if let Some(declared) = declared_group_size(&contact) {
            if usize::try_from(declared).ok() != Some(participant_count) {
                data_issues.push(DataIssue::GroupSizeMismatch {
                    declared,
                    participants: participant_count,
                });
            }
        }
    }

    let sequence_numbers: Vec<String> = if is_group {
        participants.iter().map(Participant::sequence_number).collect()
    } else {
        responsible
            .map(|record| vec![resolve_sequence(record, &INSCRIPTION_RULES).value])
            .unwrap_or_default()
    };
    let reference_sequence = sequence_numbers.first().cloned().unwrap_or_default();

    let candidate_name = extract_candidate_name(&contact);
    let display_name = if is_group {
        group_display_name(participant_count)
    } else {
        candidate_name.clone()
    };

    let payment = derive_payment(
        page,
        &PaymentContext {
            is_group,
            participant_count,
            reference_sequence: &reference_sequence,
            candidate_name: &candidate_name,
        },
    );

    Ok(RegistrationView {
        page_slug: page.slug.clone(),
        page_label: page.label.clone(),
        display_name,
        candidate_name,
        is_group,
        participant_count,
        sequence_display: join_sequences(&sequence_numbers),
        reference_sequence,
        roster: build_roster(&participants),
        sequence_numbers,
        contact,
        confirmation_message: page.confirmation_message().to_string(),
        payment,
        data_issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FormConfig, PaymentConfig, PaymentInstruction};
    use serde_json::json;

    fn page() -> PageDefinition {
        PageDefinition::new("retiro", "Retiro").with_form(
            FormConfig::paid(PaymentConfig::new(50.0).with_contact_number("5511999999999"))
                .with_confirmation_message("Inscrição recebida!"),
        )
    }

    fn participant(id: &str, name: &str) -> InscriptionRecord {
        InscriptionRecord::new(id, json!({ "Nome": name })).in_group("g1")
    }

    #[test]
    fn test_responsible_never_counted_in_any_position() {
        let responsible = InscriptionRecord::new("r", json!({ "Nome do Responsável": "Rita" }))
            .in_group("g1")
            .responsible();
        for position in 0..=3 {
            let mut records = vec![
                participant("a", "Ana"),
                participant("b", "Bia"),
                participant("c", "Caio"),
            ];
            records.insert(position, responsible.clone());
            let group = Submission::Group(InscriptionGroup::new("g1", records));
            let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
            assert_eq!(view.participant_count, 3);
            assert_eq!(view.roster.len(), 3);
            assert!(view.roster.iter().all(|entry| entry.sequence_number != "r"));
        }
    }

    #[test]
    fn test_group_of_only_responsible_is_not_a_group() {
        let responsible = InscriptionRecord::new("r", json!({ "Nome": "Rita" }))
            .with_sequence(5)
            .responsible();
        let group = Submission::Group(InscriptionGroup::new("g1", vec![responsible]));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert!(!view.is_group);
        assert_eq!(view.participant_count, 0);
        assert_eq!(view.display_name, "Rita");
        assert_eq!(view.sequence_numbers, vec!["5"]);
        assert!(matches!(view.payment, PaymentInstruction::WhatsAppOnly { .. }));
    }

    #[test]
    fn test_group_display_name_pluralization() {
        assert_eq!(group_display_name(1), "Group of 1 participant");
        assert_eq!(group_display_name(2), "Group of 2 participants");
    }

    #[test]
    fn test_group_sequences_are_joined_in_order() {
        let records = vec![
            participant("a", "Ana").with_sequence(10),
            participant("b", "Bia"),
            participant("c", "Caio").with_sequence(12),
        ];
        let group = Submission::Group(InscriptionGroup::new("g1", records));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert_eq!(view.sequence_numbers, vec!["10", "b", "12"]);
        assert_eq!(view.reference_sequence, "10");
        assert_eq!(view.sequence_display, "10, b, 12");
    }

    #[test]
    fn test_contact_synthesized_from_first_participant() {
        let first = InscriptionRecord::new(
            "a",
            json!({
                "Nome": "Ana",
                "_responsible_name": "Marta",
                "_responsible_email": "marta@example.com",
                "_responsible_phone": "11999990000"
            }),
        );
        let second = InscriptionRecord::new("b", json!({ "Nome": "Bia", "_responsible_name": "Other" }));
        let group = Submission::Group(InscriptionGroup::new("g1", vec![first, second]));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert_eq!(view.contact.len(), 3);
        assert_eq!(view.contact["Responsible Name"], "Marta");
        assert_eq!(view.display_name, "Group of 2 participants");
        // Synthesized labels all carry the responsible token, so no candidate is found.
        assert_eq!(view.candidate_name, "-");
    }

    #[test]
    fn test_group_size_mismatch_is_reported_not_applied() {
        let responsible = InscriptionRecord::new("r", json!({ "group_size": 5 })).responsible();
        let group = Submission::Group(InscriptionGroup::new(
            "g1",
            vec![responsible, participant("a", "Ana"), participant("b", "Bia")],
        ));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert_eq!(view.participant_count, 2);
        assert!(view.data_issues.contains(&DataIssue::GroupSizeMismatch {
            declared: 5,
            participants: 2
        }));
    }

    #[test]
    fn test_extra_responsible_records_are_reported() {
        let group = Submission::Group(InscriptionGroup::new(
            "g1",
            vec![
                InscriptionRecord::new("r1", json!({})).responsible(),
                InscriptionRecord::new("r2", json!({})).responsible(),
                participant("a", "Ana"),
            ],
        ));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert_eq!(view.participant_count, 1);
        assert_eq!(
            view.data_issues,
            vec![DataIssue::ExtraResponsible {
                record_id: "r2".to_string()
            }]
        );
    }

    #[test]
    fn test_foreign_page_records_are_excluded() {
        let group = Submission::Group(InscriptionGroup::new(
            "g1",
            vec![
                participant("a", "Ana").on_page("retiro"),
                participant("b", "Bia").on_page("outro"),
            ],
        ));
        let view = RegistrationViewResolver::resolve(&page(), &group).unwrap();
        assert_eq!(view.participant_count, 1);

        let foreign = Submission::Group(InscriptionGroup::new(
            "g1",
            vec![participant("b", "Bia").on_page("outro")],
        ));
        let err = RegistrationViewResolver::resolve(&page(), &foreign).unwrap_err();
        assert!(matches!(err, RegistrationError::SubmissionNotFound(_)));

        let individual = Submission::Individual(InscriptionRecord::new("x", json!({})).on_page("outro"));
        assert!(RegistrationViewResolver::resolve(&page(), &individual)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_empty_group_is_not_found() {
        let group = Submission::Group(InscriptionGroup::new("g1", Vec::new()));
        let err = RegistrationViewResolver::resolve(&page(), &group).unwrap_err();
        assert!(matches!(err, RegistrationError::SubmissionNotFound(_)));
    }

    #[test]
    fn test_resolve_lookup_checks_page_first() {
        let requested = SubmissionRef::Inscription { id: "1".to_string() };
        let err = RegistrationViewResolver::resolve_lookup("missing", None, &requested, None)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::PageNotFound(ref slug) if slug == "missing"));

        let page = page();
        let err = RegistrationViewResolver::resolve_lookup("retiro", Some(&page), &requested, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Submission not found: inscription 1");
    }

    #[test]
    fn test_individual_with_declared_group_size_pays_as_group() {
        let record = InscriptionRecord::new("7", json!({ "Nome": "Ana", "group_size": "3" }));
        let view =
            RegistrationViewResolver::resolve(&page(), &Submission::Individual(record)).unwrap();
        assert!(view.is_group);
        assert!(view.roster.is_empty());
        assert_eq!(view.display_name, "Ana");
        assert_eq!(view.confirmation_message, "Inscrição recebida!");
        match view.payment {
            PaymentInstruction::GroupPayment { total_due, participant_count, .. } => {
                assert_eq!(total_due, 150.0);
                assert_eq!(participant_count, 3);
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }
}
