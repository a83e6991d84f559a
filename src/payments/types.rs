//! Payment provider types and data structures

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppResult, ValidationError};
use crate::mozello::CheckoutRequest;
use crate::payments::phone::normalize_tanzanian_phone;

/// The only currency ZenoPay mobile money accepts
pub const CURRENCY: &str = "TZS";

/// Mobile money payment request sent to ZenoPay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderPaymentRequest {
    pub order_id: String,
    pub buyer_email: String,
    pub buyer_name: String,
    /// Canonical local format, e.g. `0744963858`
    pub buyer_phone: String,
    /// Whole shillings, no fractional unit
    pub amount: u64,
    pub currency: String,
    /// Where ZenoPay posts the payment status
    pub webhook_url: String,
}

impl ProviderPaymentRequest {
    pub fn from_checkout(checkout: &CheckoutRequest, webhook_url: String) -> AppResult<Self> {
        Ok(Self {
            order_id: checkout.order_uuid.clone(),
            buyer_email: checkout.billing_email.clone(),
            buyer_name: checkout.buyer_name(),
            buyer_phone: normalize_tanzanian_phone(&checkout.billing_phone)?,
            amount: round_amount(&checkout.amount)?,
            currency: CURRENCY.to_string(),
            webhook_url,
        })
    }
}

/// Round a decimal amount to whole currency units, halves rounding up.
///
/// Zero, negative and non-numeric amounts are rejected.
pub fn round_amount(raw: &str) -> AppResult<u64> {
    let invalid = || ValidationError::InvalidAmount {
        value: raw.to_string(),
    };

    let amount = Decimal::from_str(raw.trim()).map_err(|_| invalid())?;
    if amount <= Decimal::ZERO {
        return Err(invalid().into());
    }

    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_u64() {
        Some(value) if value > 0 => Ok(value),
        _ => Err(invalid().into()),
    }
}

/// Synchronous answer to a payment initiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitiation {
    /// Provider accepted the request and pushed it to the buyer's phone
    pub accepted: bool,
    pub message: Option<String>,
}

/// Order status as reported by ZenoPay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
    /// The status could not be determined
    Unknown,
}

impl OrderStatus {
    pub fn from_provider(status: &str) -> Self {
        match status {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
