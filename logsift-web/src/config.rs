use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub port: u16,
    pub max_upload_size: usize,
    pub cors_origins: Vec<String>,
    /// Pause between processing and aggregation, in milliseconds. Zero
    /// disables the pause; uploads have no observer waiting on pacing.
    pub settle_delay_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_upload_size: 50 * 1024 * 1024, // 50MB
            cors_origins: vec!["http://localhost:3000".to_string()],
            settle_delay_ms: 0,
        }
    }
}

impl WebConfig {
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();

        // Load from environment variables
        if let Ok(port) = env::var("LOGSIFT_PORT").or_else(|_| env::var("PORT")) {
            config.port = port.parse()?;
        }

        if let Ok(max_size) = env::var("LOGSIFT_MAX_UPLOAD_SIZE") {
            config.max_upload_size = max_size.parse()?;
        }

        if let Ok(origins) = env::var("LOGSIFT_CORS_ORIGINS") {
            config.cors_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(delay) = env::var("LOGSIFT_SETTLE_DELAY_MS") {
            config.settle_delay_ms = delay.parse()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_size, 50 * 1024 * 1024);
        assert_eq!(config.settle_delay_ms, 0);
    }
}
