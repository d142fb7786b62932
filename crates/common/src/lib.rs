//! Cross-crate helpers shared by the server binary and library crates.

pub mod types;
pub mod utils;
