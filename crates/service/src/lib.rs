//! Service layer providing business-oriented operations on top of models.
//! - Separates business rules (validation, ownership) from data access.
//! - Repositories are traits so rules can be exercised against in-memory mocks.

pub mod errors;
pub mod auth;
pub mod shop;
