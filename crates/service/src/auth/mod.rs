//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and bearer-token issuance/verification. The HTTP layer
//! only calls into [`AuthService`] and [`token`].

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
