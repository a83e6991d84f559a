//! On-demand order status lookup

use tracing::error;

use crate::payments::{OrderStatus, PaymentProvider};

/// Ask the provider for an order's status.
///
/// Never fails: any error while querying is reported as
/// [`OrderStatus::Unknown`].
pub async fn check_order_status(
    provider: &dyn PaymentProvider,
    order_id: &str,
    api_key: &str,
) -> OrderStatus {
    match provider.order_status(api_key, order_id).await {
        Ok(status) => status,
        Err(e) => {
            error!(order_id, "Error checking order status: {}", e);
            OrderStatus::Unknown
        }
    }
}
