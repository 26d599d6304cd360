use axum::Json;
use axum::extract::{
  Path as AxumPath,
  State
};
use axum::response::{
  IntoResponse,
  Response
};

use crate::app_state::AppState;
use crate::dinosaurs::Dinosaur;

/// Miss body. Sent with 200, not 404.
pub const NO_DINOSAURS: &str =
  "No dinosaurs found.";

pub async fn list_dinosaurs(
  State(state): State<AppState>
) -> Json<Vec<Dinosaur>> {
  Json(state.dinosaurs.all().to_vec())
}

pub async fn dinosaur_detail(
  State(state): State<AppState>,
  AxumPath(dinosaur): AxumPath<String>
) -> Response {
  match state.dinosaurs.find(&dinosaur) {
    | Some(found) => {
      Json(found.clone()).into_response()
    }
    | None => {
      tracing::debug!(
        dinosaur = %dinosaur,
        "no dinosaur matched"
      );

      NO_DINOSAURS.into_response()
    }
  }
}
