//! The relay's flows, independent of HTTP.
//!
//! Each flow returns an outcome enum; the `api` module turns it into a
//! response.

pub mod order_status;
pub mod payment_initiator;
pub mod webhook_relay;

#[cfg(test)]
pub(crate) mod testing;

pub use order_status::check_order_status;
pub use payment_initiator::{InitiationOutcome, PaymentInitiator};
pub use webhook_relay::{RelayOutcome, WebhookRelay};
