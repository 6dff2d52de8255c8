use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use crate::app::ports::InscriptionSource;
use crate::domain::{
    DataIssue, InscriptionGroup, RegistrationView, Submission, SubmissionRef,
};
use crate::error::Result;
use crate::resolver::RegistrationViewResolver;

/// Use case for building the confirmation screen of a submission
pub struct ConfirmationService {
    source: Arc<dyn InscriptionSource>,
}

impl ConfirmationService {
    pub fn new(source: Arc<dyn InscriptionSource>) -> Self {
        Self { source }
    }

    /// Fetch the page, then the submission, and resolve the view.
    pub async fn confirmation(
        &self,
        slug: &str,
        requested: &SubmissionRef,
    ) -> Result<RegistrationView> {
        let span = tracing::info_span!("confirmation", page = %slug, submission = %requested);
        self.resolve(slug, requested).instrument(span).await
    }

    async fn resolve(&self, slug: &str, requested: &SubmissionRef) -> Result<RegistrationView> {
        let page = self.source.get_page(slug).await?;
        let submission = match (&page, requested) {
            (None, _) => None,
            (Some(_), SubmissionRef::Inscription { id }) => self
                .source
                .get_inscription(slug, id)
                .await?
                .map(Submission::Individual),
            (Some(_), SubmissionRef::Group { group_id }) => self
                .source
                .get_inscription_group(group_id)
                .await?
                .map(|records| Submission::Group(InscriptionGroup::new(group_id.clone(), records))),
        };

        let result = RegistrationViewResolver::resolve_lookup(
            slug,
            page.as_ref(),
            requested,
            submission.as_ref(),
        );

        match &result {
            Ok(view) => {
                log_data_issues(&view.data_issues);
                info!(
                    participants = view.participant_count,
                    is_group = view.is_group,
                    "Confirmation resolved"
                );
            }
            Err(e) if e.is_not_found() => debug!("{}", e),
            Err(e) => warn!("Confirmation failed: {}", e),
        }
        result
    }
}

fn log_data_issues(issues: &[DataIssue]) {
    for issue in issues {
        match issue {
            DataIssue::MalformedFormData { record_id, reason } => {
                warn!(record_id = %record_id, "Malformed form data replaced with empty answers: {}", reason)
            }
            DataIssue::GroupSizeMismatch { declared, participants } => warn!(
                declared = *declared,
                participants = *participants,
                "Declared group size disagrees with stored participants"
            ),
            DataIssue::ExtraResponsible { record_id } => {
                warn!(record_id = %record_id, "Group has more than one responsible record")
            }
            DataIssue::ForeignPageRecord { record_id } => {
                warn!(record_id = %record_id, "Group record belongs to another page")
            }
        }
    }
}
