//! API data transfer objects

pub mod common;
pub mod ship;

pub use common::{ApiResponse, Notice, NoticeTag};
pub use ship::{CreateShipRequest, ShipDto, UpdateShipRequest};
