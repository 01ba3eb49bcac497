use anyhow::Result;

use crate::store::DEFAULT_BATCH_SIZE;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Rows per batch in the full-table fetch loop.
    pub batch_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            supabase_url: std::env::var("SUPABASE_URL")?,
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY")?,
            batch_size: std::env::var("DERMABASE_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BATCH_SIZE),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SUPABASE_URL: {}", self.supabase_url);
        tracing::info!("  SUPABASE_ANON_KEY: {}", preview(&self.supabase_anon_key));
        tracing::info!("  batch_size: {}", self.batch_size);
    }
}
