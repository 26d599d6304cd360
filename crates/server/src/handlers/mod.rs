mod dinosaurs;
mod docs;
mod greetings;
mod groceries;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

pub use dinosaurs::NO_DINOSAURS;
pub use greetings::WELCOME;

pub fn router(
  state: AppState
) -> Router {
  Router::new()
        .route("/", get(greetings::welcome))
        .route("/hello", get(greetings::hello))
        .route("/test", get(greetings::test))
        .route("/api/", get(dinosaurs::list_dinosaurs))
        .route("/api/dino/:dinosaur", get(dinosaurs::dinosaur_detail))
        .route("/api/groceries", get(groceries::list_groceries))
        .route("/api/groceriesLegacy", get(groceries::list_groceries_legacy))
        .route("/doc", get(docs::openapi))
        .route("/ui", get(docs::swagger_ui))
        .with_state(state)
}
