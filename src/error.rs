use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors surfaced to API clients as structured payloads.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Recipe dataset not found on server. Please upload the file.")]
    DatasetUnavailable,

    #[error("AI suggestion error: {0}")]
    Suggestion(String),

    #[error("Meal plan suggestion error: {0}")]
    MealPlan(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::DatasetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Suggestion(_) | AppError::MealPlan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
