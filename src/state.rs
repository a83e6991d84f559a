use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::mozello::{HttpMozelloNotifier, MerchantCredentials, MozelloNotifier, StaticMerchantKeys};
use crate::payments::providers::ZenopayProvider;
use crate::payments::PaymentProvider;
use crate::services::{PaymentInitiator, WebhookRelay};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub initiator: Arc<PaymentInitiator>,
    pub relay: Arc<WebhookRelay>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn PaymentProvider>,
        merchants: Arc<dyn MerchantCredentials>,
        notifier: Arc<dyn MozelloNotifier>,
    ) -> Self {
        let config = Arc::new(config);
        let initiator = PaymentInitiator::new(config.clone(), provider, merchants.clone());
        let relay = WebhookRelay::new(merchants, notifier);

        Self {
            config,
            initiator: Arc::new(initiator),
            relay: Arc::new(relay),
        }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let provider = Arc::new(ZenopayProvider::new(&config.zenopay)?);
        let merchants = Arc::new(StaticMerchantKeys::from_config(&config.zenopay));
        let notifier = Arc::new(HttpMozelloNotifier::new(&config.mozello)?);

        Ok(Self::new(config, provider, merchants, notifier))
    }
}
