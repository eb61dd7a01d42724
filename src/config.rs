use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub leads_csv_path: String,
    pub follow_up_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            leads_csv_path: std::env::var("LEADS_CSV_PATH")
                .unwrap_or_else(|_| "leads.csv".to_string())
                .trim()
                .to_string(),
            follow_up_secs: std::env::var("FOLLOW_UP_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("FOLLOW_UP_SECS must be a positive number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("FOLLOW_UP_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
        };

        if config.leads_csv_path.is_empty() {
            anyhow::bail!("LEADS_CSV_PATH cannot be empty");
        }

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Leads CSV path: {}", config.leads_csv_path);
        tracing::debug!("Follow-up interval: {}s", config.follow_up_secs);

        Ok(config)
    }

    /// Idle interval after which a consented-but-silent lead is followed up.
    ///
    /// Defaults to 10 seconds for testing; production intent is 24 hours,
    /// set via `FOLLOW_UP_SECS`.
    pub fn follow_up_interval(&self) -> Duration {
        Duration::from_secs(self.follow_up_secs)
    }
}
