use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the quotes_info module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotesInfoConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Default for QuotesInfoConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_name_length: default_max_name_length(),
        }
    }
}

impl QuotesInfoConfig {
    /// Reject page bounds that could never be satisfied.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_page_size == 0 {
            anyhow::bail!("quotes_info.max_page_size must be at least 1");
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "quotes_info.default_page_size must be between 1 and max_page_size ({})",
                self.max_page_size
            );
        }
        if self.max_name_length == 0 {
            anyhow::bail!("quotes_info.max_name_length must be at least 1");
        }
        Ok(())
    }
}

impl From<&QuotesInfoConfig> for ServiceConfig {
    fn from(cfg: &QuotesInfoConfig) -> Self {
        Self {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            max_name_length: cfg.max_name_length,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_max_name_length() -> usize {
    255
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: QuotesInfoConfig = serde_json::from_value(serde_json::json!({
            "max_page_size": 50
        }))
        .unwrap();
        assert_eq!(cfg.default_page_size, 10);
        assert_eq!(cfg.max_page_size, 50);
        assert_eq!(cfg.max_name_length, 255);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<QuotesInfoConfig, _> =
            serde_json::from_value(serde_json::json!({ "page_size": 5 }));
        assert!(res.is_err());
    }

    #[test]
    fn default_larger_than_max_is_invalid() {
        let cfg = QuotesInfoConfig {
            default_page_size: 200,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
