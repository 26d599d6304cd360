use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Body of every failed store-backed request.
pub const GENERIC_FAILURE: &str = "An error occurred.";

#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("column {column}: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Logs the store failure and masks it behind the generic 500 body.
    pub fn store(err: StoreError) -> Self {
        tracing::error!(error = %err, "grocery query failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        Self::store(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_are_masked() {
        let err = ServerError::store(StoreError::Query(sqlx::Error::PoolClosed));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, GENERIC_FAILURE);
    }
}
