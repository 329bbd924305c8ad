//! REST API module
//!
//! HTTP endpoints for the ship registry: authentication, the gated
//! ship lifecycle operations and the reporting views.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod validated_json;

pub use router::create_api_router;
