use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::error::{ErrorResponse, UnknownRestaurant};
use thiserror::Error;
use tracing::error;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRestaurant(#[from] UnknownRestaurant),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let (status, message) = match &self {
            ApiError::InvalidRestaurant(_) => (Status::BadRequest, self.to_string()),
            ApiError::Store(e) => {
                error!("{} {} failed: {}", req.method(), req.uri(), e);
                (Status::InternalServerError, "Internal server error".to_string())
            }
        };

        rocket::Response::build_from(Json(ErrorResponse::new(message)).respond_to(req)?)
            .status(status)
            .ok()
    }
}
