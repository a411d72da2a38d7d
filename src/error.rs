use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("dotenv error")]
    DotEnvError(#[from] dotenv::Error),

    #[error("jwt error")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("places upstream error: {0}")]
    PlacesError(#[from] reqwest::Error),

    #[error("places search failed: {0}")]
    PlacesStatusError(String),

    #[error("business error: {0}")]
    BusinessError(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BusinessError(_) => StatusCode::BAD_REQUEST,
            Error::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::PlacesError(_) | Error::PlacesStatusError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
