use serde::Deserialize;
use std::fs;
use std::path::Path;
use crate::error::{Result, RegistrationError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub project_ref: Option<String>,
    pub api_key: Option<String>,
    pub pages_table: String,
    pub inscriptions_table: String,
    pub timeout_seconds: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            project_ref: None,
            api_key: None,
            pages_table: "pages".to_string(),
            inscriptions_table: "inscriptions".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl SupabaseConfig {
    /// Either the full URL or one derived from the project ref.
    pub fn base_url(&self) -> Result<String> {
        match (&self.url, &self.project_ref) {
            (Some(url), _) => Ok(url.clone()),
            (None, Some(project_ref)) => Ok(format!("https://{}.supabase.co", project_ref)),
            (None, None) => Err(RegistrationError::Config(
                "Supabase URL missing: set supabase.url or SUPABASE_URL/SUPABASE_PROJECT_REF".to_string(),
            )),
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            RegistrationError::Config(
                "Supabase key missing: set supabase.api_key or SUPABASE_ANON_KEY".to_string(),
            )
        })
    }
}

impl Config {
    /// Loads `config.toml` when present, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file(DEFAULT_CONFIG_PATH)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path)?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Environment wins over file values. Blank variables are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(project_ref) = var("SUPABASE_PROJECT_REF") {
            self.supabase.project_ref = Some(project_ref);
        }
        if let Some(key) = var("SUPABASE_SERVICE_ROLE_KEY").or_else(|| var("SUPABASE_ANON_KEY")) {
            self.supabase.api_key = Some(key);
        }
        if let Some(port) = var("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }
}
