use async_trait::async_trait;

use crate::domain::{InscriptionRecord, PageDefinition};
use crate::error::Result;

/// Read-only access to pages and inscriptions. Calls are independent and
/// idempotent, so callers may retry them freely.
#[async_trait]
pub trait InscriptionSource: Send + Sync {
    async fn get_page(&self, slug: &str) -> Result<Option<PageDefinition>>;

    async fn get_inscription(&self, slug: &str, id: &str) -> Result<Option<InscriptionRecord>>;

    /// All records sharing `group_id`, oldest first. `None` when the group is unknown.
    async fn get_inscription_group(&self, group_id: &str) -> Result<Option<Vec<InscriptionRecord>>>;
}
