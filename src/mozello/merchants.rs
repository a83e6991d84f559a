//! Merchant ZenoPay credentials
//!
//! Each Mozello shop (identified by its website alias) has its own ZenoPay API
//! key. The same keys are the only ones ZenoPay may present when calling our
//! webhook.

use async_trait::async_trait;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::config::ZenopayConfig;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait MerchantCredentials: Send + Sync {
    /// Resolve the ZenoPay API key to use for an order of the given shop.
    async fn resolve_api_key(&self, order_uuid: &str, website_alias: &str) -> AppResult<String>;

    /// Whether `key` belongs to a known merchant.
    fn is_valid_key(&self, key: &str) -> bool;
}

/// Credentials loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticMerchantKeys {
    keys: HashMap<String, String>,
    default_key: Option<String>,
}

impl StaticMerchantKeys {
    pub fn new(keys: HashMap<String, String>, default_key: Option<String>) -> Self {
        Self { keys, default_key }
    }

    pub fn from_config(config: &ZenopayConfig) -> Self {
        Self::new(config.merchant_keys.clone(), config.default_api_key.clone())
    }

    pub fn len(&self) -> usize {
        self.keys.len() + usize::from(self.default_key.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MerchantCredentials for StaticMerchantKeys {
    async fn resolve_api_key(&self, order_uuid: &str, website_alias: &str) -> AppResult<String> {
        if let Some(key) = self.keys.get(website_alias) {
            debug!(order_uuid, website_alias, "Resolved merchant ZenoPay key");
            return Ok(key.clone());
        }

        match &self.default_key {
            Some(key) => {
                debug!(order_uuid, website_alias, "Using default ZenoPay key");
                Ok(key.clone())
            }
            None => Err(AppError::not_found("Merchant", website_alias)
                .with_context(format!("order {}", order_uuid))),
        }
    }

    fn is_valid_key(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }

        // No short-circuit: every configured key is compared.
        self.keys
            .values()
            .chain(self.default_key.iter())
            .fold(0u8, |found, known| {
                found | known.as_bytes().ct_eq(key.as_bytes()).unwrap_u8()
            })
            == 1
    }
}
