//! HTTP layer for request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Response serialization types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and observability middleware
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
