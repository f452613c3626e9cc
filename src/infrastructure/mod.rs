//! Infrastructure layer implementing domain traits against external systems.
//!
//! - [`backend`] - HTTP client for the link backend API

pub mod backend;
