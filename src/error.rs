use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::tmdb::MetadataError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("\"{0}\" is already in your collection")]
    DuplicateTitle(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A metadata failure where repeating `retry` is the way to try again.
    #[error("{source}")]
    MetadataAt { source: MetadataError, retry: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateTitle(_) => StatusCode::CONFLICT,
            AppError::Metadata(err) | AppError::MetadataAt { source: err, .. } => match err {
                MetadataError::Unauthenticated => StatusCode::SERVICE_UNAVAILABLE,
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                MetadataError::UpstreamUnavailable(_) | MetadataError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                },
            },
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Where the error page's "Try again" link points, for transient upstream failures.
    fn retry_href(&self) -> Option<&str> {
        match self {
            AppError::Metadata(MetadataError::UpstreamUnavailable(_)) => Some("/add"),
            AppError::MetadataAt { source: MetadataError::UpstreamUnavailable(_), retry } => {
                Some(retry.as_str())
            },
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Something went wrong while talking to the database.".to_string()
            },
            AppError::Metadata(err) | AppError::MetadataAt { source: err, .. } => {
                tracing::warn!(error = %err, "metadata lookup failed");
                err.to_string()
            },
            other => other.to_string(),
        };

        let body = crate::templates::error_page(&message, self.retry_href());
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
