//! Payment provider integration module
//!
//! Provides the interface to the mobile money provider (ZenoPay) together with
//! the request translation it needs: amount rounding and phone normalization.

pub mod phone;
pub mod providers;
pub mod traits;
pub mod types;

pub use traits::PaymentProvider;
pub use types::{OrderStatus, PaymentInitiation, ProviderPaymentRequest};
