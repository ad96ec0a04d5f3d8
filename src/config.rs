use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// The single account allowed to register, stored lowercase.
    pub allowed_email: String,
    pub token_ttl_days: i64,
    pub upload_dir: PathBuf,
    /// Prefix for absolute upload URLs, e.g. "https://pos.example.com".
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let allowed_email = std::env::var("ALLOWED_EMAIL")?.trim().to_lowercase();
        let token_ttl_days = std::env::var("TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads/products".into())
            .into();
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        Ok(Self {
            database_url,
            allowed_email,
            token_ttl_days,
            upload_dir,
            public_base_url,
        })
    }
}
