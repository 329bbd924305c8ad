//! API Handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod ships;
pub mod users;
