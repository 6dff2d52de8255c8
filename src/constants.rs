/// Form-label and column-name constants shared by the resolver.
/// Labels are free text chosen by page designers, so several historical
/// spellings coexist in stored data.

/// Display name used when no name-like field carries a value.
pub const NO_NAME: &str = "-";

/// Lowercase tokens marking a label as name-like.
pub const NAME_TOKENS: &[&str] = &["nome", "name"];

/// Lowercase tokens marking a label as belonging to the group's responsible submitter.
pub const RESPONSIBLE_TOKENS: &[&str] = &["respons"];

/// formData field holding the declared group size.
pub const GROUP_SIZE_FIELD: &str = "group_size";

// Legacy numeric-id columns, checked in this order after the explicit sequence number.
pub const LEGACY_NUMBER_INSCRICAO: &str = "numero_inscricao";
pub const LEGACY_INSCRIPTION_NUMBER: &str = "inscription_number";
pub const LEGACY_NUMERIC_ID: &str = "numeric_id";

/// Participant name labels in priority order; each slot accepts its spellings.
pub const PARTICIPANT_NAME_LABELS: &[&[&str]] = &[
    &["Participant Name", "Nome do Participante"],
    &["Name", "Nome"],
    &["Full Name", "Nome Completo"],
];

/// Participant age labels in priority order.
pub const PARTICIPANT_AGE_LABELS: &[&[&str]] = &[
    &["Age", "Idade"],
    &["Participant Age", "Idade do Participante"],
];

// Contact metadata carried on each participant of a group without a responsible record.
pub const META_RESPONSIBLE_NAME: &str = "_responsible_name";
pub const META_RESPONSIBLE_EMAIL: &str = "_responsible_email";
pub const META_RESPONSIBLE_PHONE: &str = "_responsible_phone";

// Labels of the synthesized contact mapping.
pub const CONTACT_NAME_LABEL: &str = "Responsible Name";
pub const CONTACT_EMAIL_LABEL: &str = "Responsible Email";
pub const CONTACT_PHONE_LABEL: &str = "Responsible Phone";

/// (metadata key, synthesized label) pairs in output order.
pub const CONTACT_METADATA: &[(&str, &str)] = &[
    (META_RESPONSIBLE_NAME, CONTACT_NAME_LABEL),
    (META_RESPONSIBLE_EMAIL, CONTACT_EMAIL_LABEL),
    (META_RESPONSIBLE_PHONE, CONTACT_PHONE_LABEL),
];

pub const WHATSAPP_BASE_URL: &str = "https://wa.me";
pub const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Separator for multi-number display.
pub const SEQUENCE_SEPARATOR: &str = ", ";
