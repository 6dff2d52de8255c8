use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub(crate) mod de;
pub mod view;

pub use view::*;

/// Ordered mapping of free-text form label to submitted value.
pub type FormData = Map<String, Value>;

/// A page that may host a submission form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageDefinition {
    pub slug: String,
    #[serde(default, alias = "title", deserialize_with = "de::null_as_default")]
    pub label: String,
    #[serde(default, alias = "hasForm", deserialize_with = "de::null_as_default")]
    pub has_form: bool,
    #[serde(default, alias = "formConfig")]
    pub form_config: Option<FormConfig>,
}

impl PageDefinition {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            has_form: false,
            form_config: None,
        }
    }

    pub fn with_form(mut self, form_config: FormConfig) -> Self {
        self.has_form = true;
        self.form_config = Some(form_config);
        self
    }

    /// Payment configuration, only when the form actually requires payment.
    pub fn required_payment(&self) -> Option<&PaymentConfig> {
        self.form_config
            .as_ref()
            .filter(|fc| fc.requires_payment)
            .and_then(|fc| fc.payment_config.as_ref())
    }

    pub fn confirmation_message(&self) -> &str {
        self.form_config
            .as_ref()
            .map(|fc| fc.confirmation_message.as_str())
            .unwrap_or_default()
    }
}

/// Form settings. Defaults: no payment, empty confirmation message, no payment config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    #[serde(alias = "requiresPayment", deserialize_with = "de::null_as_default")]
    pub requires_payment: bool,
    #[serde(alias = "confirmationMessage", deserialize_with = "de::null_as_default")]
    pub confirmation_message: String,
    #[serde(alias = "paymentConfig", alias = "payment")]
    pub payment_config: Option<PaymentConfig>,
}

impl FormConfig {
    pub fn paid(payment_config: PaymentConfig) -> Self {
        Self {
            requires_payment: true,
            confirmation_message: String::new(),
            payment_config: Some(payment_config),
        }
    }

    pub fn with_confirmation_message(mut self, message: impl Into<String>) -> Self {
        self.confirmation_message = message.into();
        self
    }
}

/// Payment settings. Defaults: unit price 0.0, no payment key, no contact number.
/// Negative or non-finite prices are clamped to 0.0; blank strings become `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentConfig {
    #[serde(alias = "unitPrice", alias = "price", deserialize_with = "de::price")]
    pub unit_price: f64,
    #[serde(
        alias = "paymentKey",
        alias = "pixKey",
        alias = "pix_key",
        deserialize_with = "de::non_blank"
    )]
    pub payment_key: Option<String>,
    #[serde(
        alias = "contactNumber",
        alias = "whatsapp",
        deserialize_with = "de::non_blank"
    )]
    pub contact_number: Option<String>,
}

impl PaymentConfig {
    pub fn new(unit_price: f64) -> Self {
        Self {
            unit_price: de::clamp_price(unit_price),
            ..Self::default()
        }
    }

    pub fn with_payment_key(mut self, key: impl Into<String>) -> Self {
        self.payment_key = de::non_blank_str(key);
        self
    }

    pub fn with_contact_number(mut self, number: impl Into<String>) -> Self {
        self.contact_number = de::non_blank_str(number);
        self
    }

    /// Contact number reduced to digits, as wa.me expects. `None` when no digit remains.
    pub fn contact_digits(&self) -> Option<String> {
        let digits: String = self
            .contact_number
            .as_deref()?
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        (!digits.is_empty()).then_some(digits)
    }
}

/// One registration submission as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InscriptionRecord {
    #[serde(deserialize_with = "de::record_id")]
    pub id: String,
    #[serde(default, alias = "pageSlug", deserialize_with = "de::opt_id")]
    pub page_slug: Option<String>,
    #[serde(default, alias = "sequenceNumber", deserialize_with = "de::opt_int")]
    pub sequence_number: Option<i64>,
    #[serde(default, alias = "groupId", deserialize_with = "de::opt_id")]
    pub group_id: Option<String>,
    #[serde(default, alias = "isResponsible", deserialize_with = "de::null_as_default")]
    pub is_responsible: bool,
    /// Unparseable timestamps become `None` rather than rejecting the row.
    #[serde(default, alias = "createdAt", deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Either a JSON object or the same object serialized into a string.
    #[serde(default, alias = "formData")]
    pub form_data: Value,
    /// Remaining stored columns, including legacy numeric ids.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InscriptionRecord {
    pub fn new(id: impl Into<String>, form_data: Value) -> Self {
        Self {
            id: id.into(),
            page_slug: None,
            sequence_number: None,
            group_id: None,
            is_responsible: false,
            created_at: None,
            form_data,
            extra: Map::new(),
        }
    }

    pub fn on_page(mut self, slug: impl Into<String>) -> Self {
        self.page_slug = Some(slug.into());
        self
    }

    pub fn with_sequence(mut self, sequence_number: i64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn responsible(mut self) -> Self {
        self.is_responsible = true;
        self
    }

    pub fn with_column(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Records without a page slug are assumed to belong to the page they were fetched for.
    pub fn belongs_to(&self, page: &PageDefinition) -> bool {
        self.page_slug.as_deref().map_or(true, |slug| slug == page.slug)
    }
}

/// Records sharing a group identifier, in stored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InscriptionGroup {
    pub group_id: String,
    pub records: Vec<InscriptionRecord>,
}

impl InscriptionGroup {
    pub fn new(group_id: impl Into<String>, records: Vec<InscriptionRecord>) -> Self {
        Self {
            group_id: group_id.into(),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Individual(InscriptionRecord),
    Group(InscriptionGroup),
}

/// What the caller asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRef {
    Inscription { id: String },
    Group { group_id: String },
}

impl fmt::Display for SubmissionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionRef::Inscription { id } => write!(f, "inscription {id}"),
            SubmissionRef::Group { group_id } => write!(f, "group {group_id}"),
        }
    }
}
