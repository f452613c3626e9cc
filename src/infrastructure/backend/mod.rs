//! Backend API adapters.

pub mod http_backend;

pub use http_backend::HttpRedirectBackend;
