//! In-memory collaborators for service tests

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::{Config, MozelloConfig, ServerConfig, ZenopayConfig};
use crate::error::{AppError, AppResult, ExternalError};
use crate::mozello::signature::{self, SignatureOrder, SignedPayload, SIGNATURE_FIELD};
use crate::mozello::{MerchantCredentials, MozelloNotifier, MozelloPaymentStatus};
use crate::payments::{OrderStatus, PaymentInitiation, PaymentProvider, ProviderPaymentRequest};

pub fn test_config() -> Config {
    let mut merchant_keys = HashMap::new();
    merchant_keys.insert("shop-a".to_string(), "zp-key-a".to_string());

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            public_base_url: "https://relay.example.com".to_string(),
        },
        mozello: MozelloConfig {
            api_key: "mozello-secret".to_string(),
            signature_order: SignatureOrder::Insertion,
            notify_url: "https://mozello.example.com/notify".to_string(),
            timeout_secs: 5,
        },
        zenopay: ZenopayConfig {
            base_url: "https://zenoapi.example.com".to_string(),
            timeout_secs: 5,
            merchant_keys,
            default_api_key: None,
        },
    }
}

/// A checkout request body signed with `secret`, fields in Mozello's order.
pub fn signed_checkout_body(secret: &str, order: SignatureOrder) -> Vec<u8> {
    let fields = [
        ("order_uuid", "9f1c2a"),
        ("website_alias", "shop-a"),
        ("billing_email", "asha@example.com"),
        ("billing_first_name", "Asha"),
        ("billing_last_name", "Mwangi"),
        ("billing_phone", "+255 744 963 858"),
        ("amount", "12.50"),
        ("currency", "TZS"),
        ("success_url", "https://shop.example.com/ok"),
        ("failure_url", "https://shop.example.com/fail"),
    ];

    let mut payload = SignedPayload::new();
    let mut object = Map::new();
    for (key, value) in fields {
        payload.push(key, value);
        object.insert(key.to_string(), Value::String(value.to_string()));
    }
    object.insert(
        SIGNATURE_FIELD.to_string(),
        Value::String(signature::sign(&payload, secret, order)),
    );

    serde_json::to_vec(&Value::Object(object)).expect("serializable")
}

#[derive(Debug, Clone, Copy)]
pub enum ProviderBehaviour {
    Accept,
    Decline,
    Error,
}

pub struct MockProvider {
    behaviour: ProviderBehaviour,
    initiate_calls: AtomicUsize,
    last_request: Mutex<Option<(String, ProviderPaymentRequest)>>,
}

impl MockProvider {
    pub fn new(behaviour: ProviderBehaviour) -> Self {
        Self {
            behaviour,
            initiate_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn initiate_calls(&self) -> usize {
        self.initiate_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, ProviderPaymentRequest)> {
        self.last_request.lock().unwrap().clone()
    }

    fn failure() -> AppError {
        ExternalError::PaymentProvider {
            provider: "ZenoPay".to_string(),
            message: "HTTP 503".to_string(),
            is_retryable: true,
        }
        .into()
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn initiate_payment(
        &self,
        api_key: &str,
        request: &ProviderPaymentRequest,
    ) -> AppResult<PaymentInitiation> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((api_key.to_string(), request.clone()));

        match self.behaviour {
            ProviderBehaviour::Accept => Ok(PaymentInitiation {
                accepted: true,
                message: None,
            }),
            ProviderBehaviour::Decline => Ok(PaymentInitiation {
                accepted: false,
                message: Some("Invalid phone".to_string()),
            }),
            ProviderBehaviour::Error => Err(Self::failure()),
        }
    }

    async fn order_status(&self, _api_key: &str, _order_id: &str) -> AppResult<OrderStatus> {
        match self.behaviour {
            ProviderBehaviour::Accept => Ok(OrderStatus::Completed),
            ProviderBehaviour::Decline => Ok(OrderStatus::Pending),
            ProviderBehaviour::Error => Err(Self::failure()),
        }
    }
}

#[derive(Default)]
pub struct MockMerchants {
    fail: bool,
    resolve_calls: AtomicUsize,
}

impl MockMerchants {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MerchantCredentials for MockMerchants {
    async fn resolve_api_key(&self, _order_uuid: &str, website_alias: &str) -> AppResult<String> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::not_found("Merchant", website_alias));
        }
        Ok("zp-key-a".to_string())
    }

    fn is_valid_key(&self, key: &str) -> bool {
        key == "zp-key-a"
    }
}

#[derive(Default)]
pub struct MockNotifier {
    fail: bool,
    calls: Mutex<Vec<(String, MozelloPaymentStatus)>>,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, MozelloPaymentStatus)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MozelloNotifier for MockNotifier {
    async fn notify(&self, order_uuid: &str, status: MozelloPaymentStatus) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((order_uuid.to_string(), status));

        if self.fail {
            return Err(ExternalError::Notification {
                message: "HTTP 502".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
