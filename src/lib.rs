//! Payment relay between the Mozello e-commerce platform and the ZenoPay
//! mobile money provider.
//!
//! - `POST /mozello/zenopay/process` verifies a signed Mozello checkout,
//!   starts a ZenoPay payment and redirects the buyer.
//! - `POST /mozello/zenopay/webhook/:order_uuid` receives ZenoPay's status
//!   callback and notifies Mozello.

pub mod api;
pub mod config;
pub mod error;
pub mod mozello;
pub mod payments;
pub mod services;
pub mod state;

pub use error::{AppError, AppErrorKind, AppResult};
pub use state::AppState;
