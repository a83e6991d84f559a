use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use crate::mozello::signature::SignatureOrder;
use crate::mozello::StaticMerchantKeys;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mozello: MozelloConfig,
    pub zenopay: ZenopayConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Externally reachable base URL, used to build webhook URLs
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct MozelloConfig {
    /// Shared signing secret for checkout requests and notifications
    pub api_key: String,
    pub signature_order: SignatureOrder,
    pub notify_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ZenopayConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Merchant API keys by Mozello website alias
    pub merchant_keys: HashMap<String, String>,
    pub default_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL").context("PUBLIC_BASE_URL not set")?,
        };

        let mozello = MozelloConfig {
            api_key: env::var("MOZELLO_API_KEY").context("MOZELLO_API_KEY not set")?,
            signature_order: env::var("MOZELLO_SIGNATURE_ORDER")
                .unwrap_or_else(|_| "insertion".to_string())
                .parse()
                .context("MOZELLO_SIGNATURE_ORDER must be 'insertion' or 'sorted'")?,
            notify_url: env::var("MOZELLO_NOTIFY_URL").context("MOZELLO_NOTIFY_URL not set")?,
            timeout_secs: env::var("MOZELLO_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("MOZELLO_TIMEOUT_SECS must be a valid number")?,
        };

        let merchant_keys = parse_merchant_keys(
            &env::var("ZENOPAY_MERCHANT_KEYS").unwrap_or_default(),
        )?;

        let zenopay = ZenopayConfig {
            base_url: env::var("ZENOPAY_BASE_URL")
                .unwrap_or_else(|_| "https://zenoapi.com".to_string()),
            timeout_secs: env::var("ZENOPAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("ZENOPAY_TIMEOUT_SECS must be a valid number")?,
            merchant_keys,
            default_api_key: env::var("ZENOPAY_DEFAULT_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        };

        let config = Config {
            server,
            mozello,
            zenopay,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if self.server.public_base_url.trim().is_empty() {
            return Err(anyhow!("PUBLIC_BASE_URL cannot be empty"));
        }

        if self.mozello.api_key.trim().is_empty() {
            return Err(anyhow!("MOZELLO_API_KEY cannot be empty"));
        }

        if self.mozello.notify_url.trim().is_empty() {
            return Err(anyhow!("MOZELLO_NOTIFY_URL cannot be empty"));
        }

        if self.zenopay.base_url.trim().is_empty() {
            return Err(anyhow!("ZENOPAY_BASE_URL cannot be empty"));
        }

        if self.mozello.timeout_secs == 0 || self.zenopay.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than 0"));
        }

        if StaticMerchantKeys::from_config(&self.zenopay).is_empty() {
            return Err(anyhow!(
                "Either ZENOPAY_MERCHANT_KEYS or ZENOPAY_DEFAULT_API_KEY must be set"
            ));
        }

        Ok(())
    }

    /// Webhook URL handed to ZenoPay for a given order
    pub fn webhook_url(&self, order_uuid: &str) -> String {
        format!(
            "{}/mozello/zenopay/webhook/{}",
            self.server.public_base_url.trim_end_matches('/'),
            order_uuid
        )
    }
}

/// Parses `alias=key,alias2=key2`
fn parse_merchant_keys(raw: &str) -> Result<HashMap<String, String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (alias, key) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("ZENOPAY_MERCHANT_KEYS entries must be alias=key"))?;
            let (alias, key) = (alias.trim(), key.trim());
            if alias.is_empty() || key.is_empty() {
                return Err(anyhow!("ZENOPAY_MERCHANT_KEYS contains an empty alias or key"));
            }
            Ok((alias.to_string(), key.to_string()))
        })
        .collect()
}

impl FromStr for SignatureOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(SignatureOrder::Insertion),
            "sorted" => Ok(SignatureOrder::Sorted),
            other => Err(anyhow!("unknown signature order '{}'", other)),
        }
    }
}
