//! Payment instruction derivation.
//!
//! The outcome is picked by an ordered decision table over five facts about
//! the page and the submission. The last rule matches everything, so every
//! combination lands on exactly one outcome.

use tracing::debug;

use crate::domain::{PageDefinition, PaymentInstruction, QrCodeRequest};
use crate::resolver::whatsapp;

/// Inputs of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentFacts {
    pub requires_payment: bool,
    pub has_payment_config: bool,
    pub is_group: bool,
    pub has_payment_key: bool,
    pub has_contact: bool,
}

impl PaymentFacts {
    pub fn from_page(page: &PageDefinition, is_group: bool) -> Self {
        let form = page.form_config.as_ref();
        let payment = form.and_then(|fc| fc.payment_config.as_ref());
        Self {
            requires_payment: form.map_or(false, |fc| fc.requires_payment),
            has_payment_config: payment.is_some(),
            is_group,
            has_payment_key: payment.map_or(false, |p| p.payment_key.is_some()),
            has_contact: payment.map_or(false, |p| p.contact_digits().is_some()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    None,
    GroupPayment,
    IndividualPayment,
    WhatsAppOnly,
}

pub struct PaymentRule {
    pub name: &'static str,
    pub matches: fn(&PaymentFacts) -> bool,
    pub outcome: PaymentOutcome,
}

fn payment_not_required(f: &PaymentFacts) -> bool {
    !f.requires_payment || !f.has_payment_config
}

fn grouped(f: &PaymentFacts) -> bool {
    f.is_group
}

fn has_key(f: &PaymentFacts) -> bool {
    f.has_payment_key
}

fn has_contact(f: &PaymentFacts) -> bool {
    f.has_contact
}

fn always(_: &PaymentFacts) -> bool {
    true
}

pub static PAYMENT_RULES: [PaymentRule; 5] = [
    PaymentRule {
        name: "payment_not_required",
        matches: payment_not_required,
        outcome: PaymentOutcome::None,
    },
    PaymentRule {
        name: "group_total",
        matches: grouped,
        outcome: PaymentOutcome::GroupPayment,
    },
    PaymentRule {
        name: "individual_key",
        matches: has_key,
        outcome: PaymentOutcome::IndividualPayment,
    },
    PaymentRule {
        name: "contact_only",
        matches: has_contact,
        outcome: PaymentOutcome::WhatsAppOnly,
    },
    PaymentRule {
        name: "nothing_configured",
        matches: always,
        outcome: PaymentOutcome::None,
    },
];

pub fn decide(facts: &PaymentFacts) -> &'static PaymentRule {
    PAYMENT_RULES
        .iter()
        .find(|rule| (rule.matches)(facts))
        .unwrap_or(&PAYMENT_RULES[PAYMENT_RULES.len() - 1])
}

/// Submission-side values the instruction is parameterized by.
#[derive(Debug, Clone, Copy)]
pub struct PaymentContext<'a> {
    pub is_group: bool,
    pub participant_count: usize,
    pub reference_sequence: &'a str,
    pub candidate_name: &'a str,
}

pub fn derive_payment(page: &PageDefinition, ctx: &PaymentContext<'_>) -> PaymentInstruction {
    let facts = PaymentFacts::from_page(page, ctx.is_group);
    let rule = decide(&facts);
    debug!(page = %page.slug, rule = rule.name, "payment rule selected");
    let Some(config) = page.required_payment() else {
        return PaymentInstruction::None;
    };
    let contact = config.contact_digits();

    match rule.outcome {
        PaymentOutcome::None => PaymentInstruction::None,
        PaymentOutcome::GroupPayment => {
            let total_due = config.unit_price * ctx.participant_count as f64;
            let whatsapp_link = contact.map(|digits| {
                whatsapp::build_link(
                    &digits,
                    &whatsapp::group_payment_message(&page.label, ctx.participant_count, total_due),
                )
            });
            PaymentInstruction::GroupPayment {
                total_due,
                unit_price: config.unit_price,
                participant_count: ctx.participant_count,
                whatsapp_link,
            }
        }
        PaymentOutcome::IndividualPayment => {
            let Some(key) = config.payment_key.clone() else {
                return PaymentInstruction::None;
            };
            let whatsapp_link = contact.map(|digits| {
                whatsapp::build_link(
                    &digits,
                    &whatsapp::individual_payment_message(
                        &page.label,
                        ctx.reference_sequence,
                        ctx.candidate_name,
                    ),
                )
            });
            PaymentInstruction::IndividualPayment {
                qr: QrCodeRequest::new(key.clone()),
                key,
                whatsapp_link,
            }
        }
        PaymentOutcome::WhatsAppOnly => match contact {
            Some(digits) => PaymentInstruction::WhatsAppOnly {
                link: whatsapp::build_link(
                    &digits,
                    &whatsapp::contact_only_message(
                        &page.label,
                        ctx.reference_sequence,
                        ctx.candidate_name,
                    ),
                ),
            },
            None => PaymentInstruction::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FormConfig, PaymentConfig};

    fn all_facts() -> Vec<PaymentFacts> {
        (0..32u8)
            .map(|bits| PaymentFacts {
                requires_payment: bits & 1 != 0,
                has_payment_config: bits & 2 != 0,
                is_group: bits & 4 != 0,
                has_payment_key: bits & 8 != 0,
                has_contact: bits & 16 != 0,
            })
            .collect()
    }

    fn expected(f: &PaymentFacts) -> PaymentOutcome {
        if !f.requires_payment || !f.has_payment_config {
            PaymentOutcome::None
        } else if f.is_group {
            PaymentOutcome::GroupPayment
        } else if f.has_payment_key {
            PaymentOutcome::IndividualPayment
        } else if f.has_contact {
            PaymentOutcome::WhatsAppOnly
        } else {
            PaymentOutcome::None
        }
    }

    #[test]
    fn test_decision_table_is_total() {
        for facts in all_facts() {
            let matching: Vec<_> = PAYMENT_RULES.iter().filter(|r| (r.matches)(&facts)).collect();
            assert!(!matching.is_empty(), "no rule for {facts:?}");
            assert_eq!(decide(&facts).outcome, expected(&facts), "facts: {facts:?}");
        }
    }

    #[test]
    fn test_rule_names_identify_the_decision() {
        let individual_contact = PaymentFacts {
            requires_payment: true,
            has_payment_config: true,
            is_group: false,
            has_payment_key: false,
            has_contact: true,
        };
        assert_eq!(decide(&individual_contact).name, "contact_only");
        assert_eq!(
            decide(&PaymentFacts { has_contact: false, ..individual_contact }).name,
            "nothing_configured"
        );
        assert_eq!(
            decide(&PaymentFacts { requires_payment: false, ..individual_contact }).name,
            "payment_not_required"
        );

        let mut names: Vec<_> = PAYMENT_RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PAYMENT_RULES.len());
    }

    fn page_for(facts: &PaymentFacts) -> PageDefinition {
        let mut payment = PaymentConfig::new(25.0);
        if facts.has_payment_key {
            payment = payment.with_payment_key("chave-pix");
        }
        if facts.has_contact {
            payment = payment.with_contact_number("5511999999999");
        }
        let form = FormConfig {
            requires_payment: facts.requires_payment,
            confirmation_message: String::new(),
            payment_config: facts.has_payment_config.then_some(payment),
        };
        PageDefinition::new("evento", "Evento").with_form(form)
    }

    #[test]
    fn test_derived_instruction_matches_table_for_every_combination() {
        for facts in all_facts() {
            let page = page_for(&facts);
            let ctx = PaymentContext {
                is_group: facts.is_group,
                participant_count: if facts.is_group { 2 } else { 1 },
                reference_sequence: "1",
                candidate_name: "Ana",
            };
            let instruction = derive_payment(&page, &ctx);
            let outcome = match instruction {
                PaymentInstruction::None => PaymentOutcome::None,
                PaymentInstruction::GroupPayment { .. } => PaymentOutcome::GroupPayment,
                PaymentInstruction::IndividualPayment { .. } => PaymentOutcome::IndividualPayment,
                PaymentInstruction::WhatsAppOnly { .. } => PaymentOutcome::WhatsAppOnly,
            };
            assert_eq!(outcome, expected(&facts), "facts: {facts:?}");
        }
    }

    #[test]
    fn test_group_payment_without_contact_has_no_link() {
        let page = PageDefinition::new("evento", "Evento")
            .with_form(FormConfig::paid(PaymentConfig::new(30.0)));
        let ctx = PaymentContext {
            is_group: true,
            participant_count: 3,
            reference_sequence: "1",
            candidate_name: "-",
        };
        match derive_payment(&page, &ctx) {
            PaymentInstruction::GroupPayment { total_due, whatsapp_link, .. } => {
                assert_eq!(total_due, 90.0);
                assert!(whatsapp_link.is_none());
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn test_individual_payment_carries_qr_and_message() {
        let page = PageDefinition::new("evento", "Evento").with_form(FormConfig::paid(
            PaymentConfig::new(30.0)
                .with_payment_key("chave-pix")
                .with_contact_number("+55 11 98888-7777"),
        ));
        let ctx = PaymentContext {
            is_group: false,
            participant_count: 1,
            reference_sequence: "42",
            candidate_name: "Ana",
        };
        match derive_payment(&page, &ctx) {
            PaymentInstruction::IndividualPayment { key, qr, whatsapp_link } => {
                assert_eq!(key, "chave-pix");
                assert_eq!(qr.payload, "chave-pix");
                let link = whatsapp_link.unwrap();
                assert!(link.starts_with("https://wa.me/5511988887777?text="));
                let text = urlencoding::decode(link.split("text=").nth(1).unwrap()).unwrap();
                assert!(text.contains("nº 42 de Ana"));
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }
}
