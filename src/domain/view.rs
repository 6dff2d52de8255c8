use serde::Serialize;

use super::FormData;
use crate::constants::{DEFAULT_QR_SIZE, QR_SERVICE_URL};

/// Display-ready confirmation for one submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistrationView {
    pub page_slug: String,
    pub page_label: String,
    pub display_name: String,
    pub candidate_name: String,
    pub is_group: bool,
    pub participant_count: usize,
    pub sequence_numbers: Vec<String>,
    /// Number quoted in payment messages.
    pub reference_sequence: String,
    pub sequence_display: String,
    pub roster: Vec<RosterEntry>,
    /// Form data the identity was taken from.
    pub contact: FormData,
    pub confirmation_message: String,
    pub payment: PaymentInstruction,
    pub data_issues: Vec<DataIssue>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub age: Option<String>,
    pub sequence_number: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentInstruction {
    None,
    IndividualPayment {
        key: String,
        qr: QrCodeRequest,
        whatsapp_link: Option<String>,
    },
    GroupPayment {
        total_due: f64,
        unit_price: f64,
        participant_count: usize,
        whatsapp_link: Option<String>,
    },
    WhatsAppOnly {
        link: String,
    },
}

impl PaymentInstruction {
    pub fn whatsapp_link(&self) -> Option<&str> {
        match self {
            PaymentInstruction::None => None,
            PaymentInstruction::IndividualPayment { whatsapp_link, .. }
            | PaymentInstruction::GroupPayment { whatsapp_link, .. } => whatsapp_link.as_deref(),
            PaymentInstruction::WhatsAppOnly { link } => Some(link),
        }
    }
}

/// Request for a scannable code; rendering is left to an external QR service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QrCodeRequest {
    pub payload: String,
    pub size: u32,
}

impl QrCodeRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            size: DEFAULT_QR_SIZE,
        }
    }

    pub fn image_url(&self) -> String {
        format!(
            "{}?size={size}x{size}&data={}",
            QR_SERVICE_URL,
            urlencoding::encode(&self.payload),
            size = self.size
        )
    }
}

/// Input problems recovered while resolving; callers log them.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DataIssue {
    MalformedFormData { record_id: String, reason: String },
    GroupSizeMismatch { declared: i64, participants: usize },
    ExtraResponsible { record_id: String },
    ForeignPageRecord { record_id: String },
}

/// Two-decimal money formatting used on screen and in messages.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
