use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::Plant, GlobalState};

pub const GREETING: &str = "Hello, this is your Golang server!";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error reading plants: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub async fn greeting() -> &'static str {
    GREETING
}

pub async fn list_plants(state: State<GlobalState>) -> Result<Json<Vec<Plant>>, ApiError> {
    let plants = state.plants.list_all().await?;
    Ok(Json(plants))
}
