//! Database entities

pub mod ship;
pub mod user;
