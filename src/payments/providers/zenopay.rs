//! ZenoPay payment provider implementation
//!
//! Integration with ZenoPay's mobile money API for Tanzania (TZS). Requests
//! authenticate with the merchant's key in the `x-api-key` header. Payment
//! initiation is never retried: a repeated request could push a second
//! payment prompt to the buyer's phone.

use crate::config::ZenopayConfig;
use crate::error::{AppError, AppResult, ExternalError, InfrastructureError};
use crate::payments::traits::PaymentProvider;
use crate::payments::types::{OrderStatus, PaymentInitiation, ProviderPaymentRequest};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const PROVIDER: &str = "ZenoPay";
const INITIATE_ENDPOINT: &str = "/api/payments/mobile_money_tanzania";
const ORDER_STATUS_ENDPOINT: &str = "/api/payments/order-status";

/// ZenoPay payment provider
pub struct ZenopayProvider {
    base_url: String,
    client: Client,
}

impl ZenopayProvider {
    /// Create a new ZenoPay provider instance
    pub fn new(config: &ZenopayConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::HttpClient {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make an authenticated request to the ZenoPay API
    async fn make_request<B, T>(
        &self,
        method: Method,
        url: Url,
        api_key: &str,
        body: Option<&B>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .request(method, url)
            .header("x-api-key", api_key);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} request failed: {}", PROVIDER, e);
            if e.is_timeout() {
                ExternalError::Timeout {
                    service: PROVIDER.to_string(),
                }
            } else {
                ExternalError::PaymentProvider {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                    is_retryable: true,
                }
            }
        })?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let error_msg = format!("HTTP {}: {}", status, response_text);
            error!("{} API error: {}", PROVIDER, error_msg);
            return Err(ExternalError::PaymentProvider {
                provider: PROVIDER.to_string(),
                message: error_msg,
                is_retryable: status.is_server_error(),
            }
            .into());
        }

        serde_json::from_str::<T>(&response_text).map_err(|e| {
            error!("Failed to parse {} response: {}", PROVIDER, e);
            AppError::from(ExternalError::PaymentProvider {
                provider: PROVIDER.to_string(),
                message: format!("Invalid response format: {}", e),
                is_retryable: false,
            })
        })
    }
}

#[async_trait]
impl PaymentProvider for ZenopayProvider {
    async fn initiate_payment(
        &self,
        api_key: &str,
        request: &ProviderPaymentRequest,
    ) -> AppResult<PaymentInitiation> {
        info!(
            "Initiating {} payment: order_id={} amount={} {}",
            PROVIDER, request.order_id, request.amount, request.currency
        );

        let url = Url::parse(&self.url(INITIATE_ENDPOINT))
            .map_err(|e| AppError::configuration(format!("Invalid {} URL: {}", PROVIDER, e)))?;

        let response: ZenopayInitiateResponse = self
            .make_request(Method::POST, url, api_key, Some(request))
            .await?;

        let accepted = response.status == "success";
        if accepted {
            info!(
                "{} accepted payment: order_id={} resultcode={}",
                PROVIDER,
                request.order_id,
                response.resultcode()
            );
        } else {
            warn!(
                "{} declined payment: order_id={} status={}",
                PROVIDER, request.order_id, response.status
            );
        }

        Ok(PaymentInitiation {
            accepted,
            message: response.message,
        })
    }

    async fn order_status(&self, api_key: &str, order_id: &str) -> AppResult<OrderStatus> {
        debug!("Querying {} order status: order_id={}", PROVIDER, order_id);

        let url = Url::parse_with_params(&self.url(ORDER_STATUS_ENDPOINT), &[("order_id", order_id)])
            .map_err(|e| AppError::configuration(format!("Invalid {} URL: {}", PROVIDER, e)))?;

        let response: ZenopayOrderStatusResponse = self
            .make_request::<(), _>(Method::GET, url, api_key, None)
            .await?;

        let status = response
            .data
            .into_iter()
            .next()
            .and_then(|entry| entry.payment_status)
            .filter(|status| !status.is_empty())
            .map(|status| OrderStatus::from_provider(&status))
            .unwrap_or(OrderStatus::Pending);

        debug!("{} order status: order_id={} status={}", PROVIDER, order_id, status);
        Ok(status)
    }
}

// Payment initiation response
#[derive(Debug, Deserialize)]
struct ZenopayInitiateResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    resultcode: Option<Value>,
}

impl ZenopayInitiateResponse {
    // Sent as "000" or 0 depending on the endpoint version
    fn resultcode(&self) -> String {
        match &self.resultcode {
            Some(Value::String(code)) => code.clone(),
            Some(code) => code.to_string(),
            None => "-".to_string(),
        }
    }
}

// Order status response. A body without a `data` array is not a status.
#[derive(Debug, Deserialize)]
struct ZenopayOrderStatusResponse {
    data: Vec<ZenopayOrderStatusEntry>,
}

#[derive(Debug, Deserialize)]
struct ZenopayOrderStatusEntry {
    #[serde(default)]
    payment_status: Option<String>,
}
