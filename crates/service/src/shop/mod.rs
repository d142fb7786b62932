//! Shops owned by users: repository abstraction, SeaORM implementation and ownership rules.

pub mod repository;
pub mod service;

pub use repository::{SeaOrmShopRepository, ShopRepository};
pub use service::ShopService;
