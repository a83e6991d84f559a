//! Mozello side of the relay: request signatures, checkout requests,
//! merchant credentials and payment notifications.

pub mod checkout;
pub mod merchants;
pub mod notifier;
pub mod signature;

pub use checkout::CheckoutRequest;
pub use merchants::{MerchantCredentials, StaticMerchantKeys};
pub use notifier::{HttpMozelloNotifier, MozelloNotifier, MozelloPaymentStatus};
pub use signature::{SignatureOrder, SignedPayload};
