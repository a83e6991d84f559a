//! Checkout request posted by Mozello when a buyer picks ZenoPay

use crate::error::{AppResult, ValidationError};
use crate::mozello::signature::SignedPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order_uuid: String,
    pub website_alias: String,
    pub billing_email: String,
    pub billing_first_name: String,
    pub billing_last_name: String,
    pub billing_phone: String,
    /// Decimal amount as sent by Mozello
    pub amount: String,
    pub currency: Option<String>,
    pub success_url: String,
    pub failure_url: String,
}

impl CheckoutRequest {
    /// Extract the checkout fields from an already verified payload.
    pub fn from_payload(payload: &SignedPayload) -> AppResult<Self> {
        Ok(Self {
            order_uuid: required(payload, "order_uuid")?,
            website_alias: required(payload, "website_alias")?,
            billing_email: required(payload, "billing_email")?,
            billing_first_name: optional(payload, "billing_first_name").unwrap_or_default(),
            billing_last_name: optional(payload, "billing_last_name").unwrap_or_default(),
            billing_phone: required(payload, "billing_phone")?,
            amount: required(payload, "amount")?,
            currency: optional(payload, "currency"),
            success_url: required(payload, "success_url")?,
            failure_url: required(payload, "failure_url")?,
        })
    }

    /// First and last name joined by a single space.
    pub fn buyer_name(&self) -> String {
        format!("{} {}", self.billing_first_name, self.billing_last_name)
    }
}

fn optional(payload: &SignedPayload, field: &str) -> Option<String> {
    payload
        .get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required(payload: &SignedPayload, field: &str) -> AppResult<String> {
    optional(payload, field).ok_or_else(|| {
        ValidationError::InvalidField {
            field: field.to_string(),
        }
        .into()
    })
}
