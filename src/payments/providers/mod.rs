//! Payment provider implementations
//!
//! Concrete implementations of the PaymentProvider trait.

pub mod zenopay;

pub use zenopay::ZenopayProvider;
