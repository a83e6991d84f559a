//! Checkout flow: Mozello checkout request → ZenoPay payment → browser redirect

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::mozello::signature::{self, SignedPayload};
use crate::mozello::{CheckoutRequest, MerchantCredentials};
use crate::payments::types::CURRENCY;
use crate::payments::{PaymentInitiation, PaymentProvider, ProviderPaymentRequest};

/// What the checkout endpoint should answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiationOutcome {
    /// Body was not a usable checkout request and carried no failure URL
    BadRequest,
    /// Signature did not verify
    Denied,
    /// Send the browser to `url`; `accepted` tells which of the two URLs it is
    Redirect { url: String, accepted: bool },
}

pub struct PaymentInitiator {
    config: Arc<Config>,
    provider: Arc<dyn PaymentProvider>,
    merchants: Arc<dyn MerchantCredentials>,
}

impl PaymentInitiator {
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn PaymentProvider>,
        merchants: Arc<dyn MerchantCredentials>,
    ) -> Self {
        Self {
            config,
            provider,
            merchants,
        }
    }

    /// Handle a raw checkout request body.
    pub async fn process(&self, body: &[u8]) -> InitiationOutcome {
        let payload = match SignedPayload::from_json_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Rejected checkout request: {}", e);
                return InitiationOutcome::BadRequest;
            }
        };

        if let Err(e) = self.authenticate(&payload) {
            warn!(
                order_uuid = payload.get("order_uuid").unwrap_or("-"),
                "Rejected checkout request: {}",
                e
            );
            return InitiationOutcome::Denied;
        }

        let checkout = match CheckoutRequest::from_payload(&payload) {
            Ok(checkout) => checkout,
            Err(e) => {
                warn!("Signed checkout request is incomplete: {}", e);
                return match payload.get("failure_url").filter(|url| !url.trim().is_empty()) {
                    Some(url) => InitiationOutcome::Redirect {
                        url: url.to_string(),
                        accepted: false,
                    },
                    None => InitiationOutcome::BadRequest,
                };
            }
        };

        match self.initiate(&checkout).await {
            Ok(initiation) if initiation.accepted => {
                info!(order_uuid = %checkout.order_uuid, "Payment initiated, redirecting to success URL");
                InitiationOutcome::Redirect {
                    url: checkout.success_url,
                    accepted: true,
                }
            }
            Ok(initiation) => {
                warn!(
                    order_uuid = %checkout.order_uuid,
                    message = initiation.message.as_deref().unwrap_or("-"),
                    "Payment declined, redirecting to failure URL"
                );
                InitiationOutcome::Redirect {
                    url: checkout.failure_url,
                    accepted: false,
                }
            }
            Err(e) if e.is_validation() => {
                warn!(order_uuid = %checkout.order_uuid, "Checkout rejected: {}", e);
                InitiationOutcome::Redirect {
                    url: checkout.failure_url,
                    accepted: false,
                }
            }
            Err(e) => {
                error!(
                    order_uuid = %checkout.order_uuid,
                    retryable = e.is_retryable(),
                    "Payment processing error: {}",
                    e
                );
                InitiationOutcome::Redirect {
                    url: checkout.failure_url,
                    accepted: false,
                }
            }
        }
    }

    fn authenticate(&self, payload: &SignedPayload) -> AppResult<()> {
        let mozello = &self.config.mozello;
        if payload.signature().is_none() {
            return Err(AppError::authentication("missing Mozello signature"));
        }
        if !signature::verify(payload, &mozello.api_key, mozello.signature_order) {
            return Err(AppError::authentication("invalid Mozello signature"));
        }
        Ok(())
    }

    /// Resolve the merchant key, translate the request and call the provider.
    pub async fn initiate(&self, checkout: &CheckoutRequest) -> AppResult<PaymentInitiation> {
        let api_key = self
            .merchants
            .resolve_api_key(&checkout.order_uuid, &checkout.website_alias)
            .await?;

        if let Some(currency) = checkout.currency.as_deref() {
            if currency != CURRENCY {
                warn!(
                    order_uuid = %checkout.order_uuid,
                    currency,
                    "Checkout currency is not {}, amount is sent as {}",
                    CURRENCY,
                    CURRENCY
                );
            }
        }

        let request = ProviderPaymentRequest::from_checkout(
            checkout,
            self.config.webhook_url(&checkout.order_uuid),
        )?;

        self.provider.initiate_payment(&api_key, &request).await
    }
}
