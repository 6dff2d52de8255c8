use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::app::ports::InscriptionSource;
use crate::domain::{InscriptionRecord, PageDefinition};
use crate::error::{RegistrationError, Result};

/// In-memory source for development/testing
#[derive(Default)]
pub struct InMemorySource {
    pages: Mutex<HashMap<String, PageDefinition>>,
    inscriptions: Mutex<Vec<InscriptionRecord>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| RegistrationError::Storage("in-memory store lock poisoned".to_string()))
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_page(&self, page: PageDefinition) -> Result<()> {
        debug!("Stored page: {}", page.slug);
        lock(&self.pages)?.insert(page.slug.clone(), page);
        Ok(())
    }

    /// Records are kept in insertion order, which is the order groups come back in.
    pub fn insert_inscription(&self, record: InscriptionRecord) -> Result<()> {
        debug!("Stored inscription: {}", record.id);
        lock(&self.inscriptions)?.push(record);
        Ok(())
    }
}

#[async_trait]
impl InscriptionSource for InMemorySource {
    async fn get_page(&self, slug: &str) -> Result<Option<PageDefinition>> {
        Ok(lock(&self.pages)?.get(slug).cloned())
    }

    async fn get_inscription(&self, slug: &str, id: &str) -> Result<Option<InscriptionRecord>> {
        let inscriptions = lock(&self.inscriptions)?;
        Ok(inscriptions
            .iter()
            .find(|r| r.id == id && r.page_slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn get_inscription_group(&self, group_id: &str) -> Result<Option<Vec<InscriptionRecord>>> {
        let records: Vec<InscriptionRecord> = lock(&self.inscriptions)?
            .iter()
            .filter(|r| r.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect();
        Ok((!records.is_empty()).then_some(records))
    }
}
