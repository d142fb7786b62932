//! SeaORM entities plus the field-level rules each record must satisfy before it is written.

pub mod errors;
pub mod db;
pub mod user;
pub mod password;
pub mod shop;

#[cfg(test)]
mod tests;
