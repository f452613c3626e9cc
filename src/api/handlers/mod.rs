//! HTTP request handlers.

pub mod health;
pub mod redirect;

pub use health::health_handler;
pub use redirect::{missing_code_handler, redirect_handler};
