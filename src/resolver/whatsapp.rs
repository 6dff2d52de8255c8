//! WhatsApp deep links and their message templates.
//!
//! Downstream tooling parses these messages, so the wording is fixed.

use crate::constants::WHATSAPP_BASE_URL;
use crate::domain::format_amount;

/// `https://wa.me/{digits}?text={message}`; everything but RFC 3986 unreserved
/// characters is percent-encoded.
pub fn build_link(contact_digits: &str, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        WHATSAPP_BASE_URL,
        contact_digits,
        urlencoding::encode(message)
    )
}

fn participant_noun(count: usize) -> &'static str {
    if count == 1 {
        "participante"
    } else {
        "participantes"
    }
}

pub fn group_payment_message(page_label: &str, participant_count: usize, total_due: f64) -> String {
    format!(
        "Olá! Gostaria de pagar a inscrição em grupo para *{}*.\nParticipantes: {} {}\nValor total: R$ {}",
        page_label,
        participant_count,
        participant_noun(participant_count),
        format_amount(total_due)
    )
}

pub fn individual_payment_message(page_label: &str, sequence: &str, candidate_name: &str) -> String {
    format!(
        "Olá! Segue o comprovante de pagamento da inscrição nº {} de {} para *{}*.",
        sequence, candidate_name, page_label
    )
}

pub fn contact_only_message(page_label: &str, sequence: &str, candidate_name: &str) -> String {
    format!(
        "Olá! Gostaria de combinar o pagamento da inscrição nº {} de {} para *{}*.",
        sequence, candidate_name, page_label
    )
}
