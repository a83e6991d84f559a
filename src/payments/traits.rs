//! Payment provider trait definitions
//!
//! Defines the interface the relay needs from a mobile money provider.

use crate::error::AppResult;
use crate::payments::types::{OrderStatus, PaymentInitiation, ProviderPaymentRequest};
use async_trait::async_trait;

/// Trait for payment provider implementations
///
/// Provider credentials are per merchant, so every call carries the API key
/// of the merchant the order belongs to.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Initiate a mobile money payment
    ///
    /// # Arguments
    /// * `api_key` - Merchant API key
    /// * `request` - Order, buyer and amount details
    ///
    /// # Returns
    /// * `PaymentInitiation` - Whether the provider accepted the request
    async fn initiate_payment(
        &self,
        api_key: &str,
        request: &ProviderPaymentRequest,
    ) -> AppResult<PaymentInitiation>;

    /// Query the current status of an order
    ///
    /// An order the provider knows nothing about yet is reported as
    /// `OrderStatus::Pending`.
    async fn order_status(&self, api_key: &str, order_id: &str) -> AppResult<OrderStatus>;
}
