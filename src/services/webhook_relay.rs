//! Webhook flow: ZenoPay status callback → Mozello notification

use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::mozello::{MerchantCredentials, MozelloNotifier, MozelloPaymentStatus};

/// What the webhook endpoint should answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// API key missing or unknown
    Denied,
    /// Mozello was notified with this status
    Relayed(MozelloPaymentStatus),
    /// Body could not be read or Mozello could not be notified
    Failed,
}

pub struct WebhookRelay {
    merchants: Arc<dyn MerchantCredentials>,
    notifier: Arc<dyn MozelloNotifier>,
}

impl WebhookRelay {
    pub fn new(merchants: Arc<dyn MerchantCredentials>, notifier: Arc<dyn MozelloNotifier>) -> Self {
        Self {
            merchants,
            notifier,
        }
    }

    pub async fn relay(&self, order_uuid: &str, api_key: Option<&str>, body: &[u8]) -> RelayOutcome {
        let result = match self.authenticate(api_key) {
            Ok(()) => self.forward(order_uuid, body).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(status) => RelayOutcome::Relayed(status),
            Err(e) if e.is_authentication() => {
                warn!(order_uuid, "Rejected webhook: {}", e);
                RelayOutcome::Denied
            }
            Err(e) => {
                error!(order_uuid, "Webhook error: {}", e);
                RelayOutcome::Failed
            }
        }
    }

    fn authenticate(&self, api_key: Option<&str>) -> AppResult<()> {
        match api_key {
            Some(key) if self.merchants.is_valid_key(key) => Ok(()),
            Some(_) => Err(AppError::authentication("unknown API key")),
            None => Err(AppError::authentication("missing API key")),
        }
    }

    async fn forward(&self, order_uuid: &str, body: &[u8]) -> AppResult<MozelloPaymentStatus> {
        let provider_status = if body.iter().all(u8::is_ascii_whitespace) {
            String::new()
        } else {
            let webhook: Value =
                serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody {
                    message: e.to_string(),
                })?;
            payment_status(&webhook)
        };

        let status = MozelloPaymentStatus::from_provider_status(&provider_status);
        info!(
            order_uuid,
            provider_status = provider_status.as_str(),
            %status,
            "Relaying ZenoPay status"
        );

        self.notifier.notify(order_uuid, status).await?;
        Ok(status)
    }
}

/// `payment_status` of a webhook object. Arrays, scalars and non-string
/// statuses carry no status.
fn payment_status(webhook: &Value) -> String {
    webhook
        .as_object()
        .and_then(|object| object.get("payment_status"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
