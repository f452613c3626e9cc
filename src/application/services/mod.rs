//! Application services orchestrating domain logic.

pub mod redirect_service;

pub use redirect_service::RedirectService;
