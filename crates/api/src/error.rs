use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicklerError {
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("Forbidden request. Error message: `{0}`")]
    Forbidden(String),
}

impl actix_web::error::ResponseError for TicklerError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(self.to_string())
    }
}
