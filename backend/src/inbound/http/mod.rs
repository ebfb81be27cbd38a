//! HTTP inbound adapter exposing the waitlist endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod state;
pub mod subscribe;

pub use error::{ApiResult, json_error_handler};
