pub mod error;
pub mod models;

pub use error::{ErrorResponse, UnknownRestaurant};
pub use models::*;
