use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub spreadsheet_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            spreadsheet_path: std::env::var("SPREADSHEET_PATH")
                .or_else(|_| std::env::var("EXCEL_PATH"))
                .map_err(|_| {
                    anyhow::anyhow!("SPREADSHEET_PATH or EXCEL_PATH environment variable required")
                })
                .and_then(|path| {
                    if path.trim().is_empty() {
                        anyhow::bail!("SPREADSHEET_PATH cannot be empty");
                    }
                    Ok(path)
                })?,
        };

        // Log successful configuration load (without credentials)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Spreadsheet path: {}", config.spreadsheet_path);

        Ok(config)
    }
}
