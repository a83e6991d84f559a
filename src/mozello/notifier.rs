//! Outbound payment notifications to Mozello

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use crate::config::MozelloConfig;
use crate::error::{AppResult, ExternalError, InfrastructureError};
use crate::mozello::signature::{self, SignatureOrder, SignedPayload};

/// Payment outcome as Mozello understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MozelloPaymentStatus {
    Approved,
    Failed,
}

impl MozelloPaymentStatus {
    /// `COMPLETED` is the only provider status that counts as paid. Pending,
    /// failed and unrecognized statuses are all reported as failed.
    pub fn from_provider_status(status: &str) -> Self {
        if status == "COMPLETED" {
            Self::Approved
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MozelloPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait MozelloNotifier: Send + Sync {
    async fn notify(&self, order_uuid: &str, status: MozelloPaymentStatus) -> AppResult<()>;
}

#[derive(Debug, Serialize)]
struct MozelloNotification<'a> {
    order_uuid: &'a str,
    status: &'static str,
    signature: String,
}

/// Posts signed JSON notifications to Mozello's notification URL
pub struct HttpMozelloNotifier {
    client: Client,
    notify_url: String,
    api_key: String,
    signature_order: SignatureOrder,
}

impl HttpMozelloNotifier {
    pub fn new(config: &MozelloConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            notify_url: config.notify_url.clone(),
            api_key: config.api_key.clone(),
            signature_order: config.signature_order,
        })
    }

    fn notification<'a>(
        &self,
        order_uuid: &'a str,
        status: MozelloPaymentStatus,
    ) -> MozelloNotification<'a> {
        let mut payload = SignedPayload::new();
        payload.push("order_uuid", order_uuid);
        payload.push("status", status.as_str());

        MozelloNotification {
            order_uuid,
            status: status.as_str(),
            signature: signature::sign(&payload, &self.api_key, self.signature_order),
        }
    }
}

#[async_trait]
impl MozelloNotifier for HttpMozelloNotifier {
    async fn notify(&self, order_uuid: &str, status: MozelloPaymentStatus) -> AppResult<()> {
        info!(order_uuid, %status, "Notifying Mozello");

        let response = self
            .client
            .post(&self.notify_url)
            .json(&self.notification(order_uuid, status))
            .send()
            .await
            .map_err(|e| {
                error!(order_uuid, "Mozello notification request failed: {}", e);
                if e.is_timeout() {
                    ExternalError::Timeout {
                        service: "Mozello".to_string(),
                    }
                } else {
                    ExternalError::Notification {
                        message: e.to_string(),
                    }
                }
            })?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(order_uuid, %http_status, "Mozello rejected notification");
            return Err(ExternalError::Notification {
                message: format!("HTTP {}: {}", http_status, body),
            }
            .into());
        }

        info!(order_uuid, %status, "Mozello notified");
        Ok(())
    }
}
