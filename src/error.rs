use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// AppError
///
/// Errors that abort a request. Form flows (add/edit) never raise these for
/// validation or store outcomes; they re-render the form with a flag instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed id, unknown record or an otherwise unusable request.
    #[error("Neispravan poziv")]
    InvalidCall,

    /// A mutation did not affect the expected number of rows.
    #[error("Operacija nije uspjela")]
    OperationFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCall => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::OperationFailed | Self::Database(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details go to the log, never to the page.
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Operacija nije uspjela".to_string()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                "Operacija nije uspjela".to_string()
            }
            _ => {
                tracing::debug!(status = %status, "request rejected: {}", self);
                self.to_string()
            }
        };

        let body = format!(
            "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{status}</title></head>\
             <body><h1>{message}</h1><p><a href=\"/competitions\">Natjecanja</a></p></body></html>"
        );

        (status, Html(body)).into_response()
    }
}
