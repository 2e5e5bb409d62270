use anyhow::{Context, Result};
use std::env;

/// Connection settings for the vision chat-completion deployment.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub base_url: String,
    pub model: String,
    pub api_version: String,
    pub api_key: String,
}

impl RecognitionConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env::var("GENAI_BASE_URL")
                .unwrap_or_else(|_| "https://genai.hkbu.edu.hk/api/v0/rest".to_string()),
            model: env::var("GENAI_MODEL").unwrap_or_else(|_| "gpt-4.1".to_string()),
            api_version: env::var("GENAI_API_VERSION")
                .unwrap_or_else(|_| "2024-12-01-preview".to_string()),
            api_key: env::var("GENAI_API_KEY")
                .context("GENAI_API_KEY environment variable not set")?,
        })
    }
}

/// Credentials for the Edamam food-database lookup.
#[derive(Debug, Clone)]
pub struct NutritionConfig {
    pub app_id: String,
    pub app_key: String,
}

impl NutritionConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_id: env::var("EDAMAM_APP_ID")
                .context("EDAMAM_APP_ID environment variable not set")?,
            app_key: env::var("EDAMAM_APP_KEY")
                .context("EDAMAM_APP_KEY environment variable not set")?,
        })
    }
}
