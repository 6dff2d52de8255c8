use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::app::ports::InscriptionSource;
use crate::config::SupabaseConfig;
use crate::domain::{InscriptionRecord, PageDefinition};
use crate::error::{RegistrationError, Result};

/// Reads pages and inscriptions through Supabase's PostgREST endpoint.
/// Config via `[supabase]` in config.toml or env:
/// - SUPABASE_URL (e.g., https://xyzcompany.supabase.co) OR SUPABASE_PROJECT_REF
/// - SUPABASE_ANON_KEY or SUPABASE_SERVICE_ROLE_KEY
pub struct SupabaseSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    pages_table: String,
    inscriptions_table: String,
}

impl SupabaseSource {
    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url()?,
            api_key: config.api_key()?.to_string(),
            pages_table: config.pages_table.clone(),
            inscriptions_table: config.inscriptions_table.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<T>> {
        let endpoint = self.table_url(table);
        debug!("Supabase select from {} with {:?}", table, filters);

        let resp = self
            .client
            .get(&endpoint)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistrationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json::<Vec<T>>().await?)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl InscriptionSource for SupabaseSource {
    async fn get_page(&self, slug: &str) -> Result<Option<PageDefinition>> {
        let pages: Vec<PageDefinition> = self
            .select(&self.pages_table, &[("slug", eq(slug)), ("limit", "1".to_string())])
            .await?;
        Ok(pages.into_iter().next())
    }

    async fn get_inscription(&self, slug: &str, id: &str) -> Result<Option<InscriptionRecord>> {
        let records: Vec<InscriptionRecord> = self
            .select(
                &self.inscriptions_table,
                &[
                    ("page_slug", eq(slug)),
                    ("id", eq(id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(records.into_iter().next())
    }

    async fn get_inscription_group(&self, group_id: &str) -> Result<Option<Vec<InscriptionRecord>>> {
        let records: Vec<InscriptionRecord> = self
            .select(
                &self.inscriptions_table,
                &[
                    ("group_id", eq(group_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;
        Ok((!records.is_empty()).then_some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_builds_rest_urls() {
        let config = SupabaseConfig {
            project_ref: Some("abcd".to_string()),
            api_key: Some("key".to_string()),
            ..SupabaseConfig::default()
        };
        let source = SupabaseSource::from_config(&config).unwrap();
        assert_eq!(
            source.table_url(&source.pages_table),
            "https://abcd.supabase.co/rest/v1/pages"
        );
        assert_eq!(eq("retiro"), "eq.retiro");
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = SupabaseConfig {
            url: Some("https://x.supabase.co".to_string()),
            ..SupabaseConfig::default()
        };
        assert!(matches!(
            SupabaseSource::from_config(&config),
            Err(RegistrationError::Config(_))
        ));
    }
}
