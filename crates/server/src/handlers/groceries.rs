use axum::Json;
use axum::extract::{
  Query,
  State
};
use axum::http::StatusCode;

use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::grocery_query::{
  DateRange,
  GroceryQuery,
  RequiredDateRange
};
use crate::rows::GroceryRow;

/// Raw query pairs. Repeated keys are
/// legal, so no struct deserializer.
type QueryPairs =
  Query<Vec<(String, String)>>;

pub async fn list_groceries(
  State(state): State<AppState>,
  Query(pairs): QueryPairs
) -> Result<
  Json<Vec<GroceryRow>>,
  ServerError
> {
  let query = GroceryQuery::from_range(
    DateRange::from_pairs(&pairs)
  );

  let rows = state
    .store
    .fetch_groceries(&query)
    .await?;

  Ok(Json(rows))
}

pub async fn list_groceries_legacy(
  State(state): State<AppState>,
  Query(pairs): QueryPairs
) -> Result<
  Json<Vec<GroceryRow>>,
  ServerError
> {
  let range =
    RequiredDateRange::from_pairs(&pairs)
      .ok_or_else(|| {
        ServerError::new(
          StatusCode::BAD_REQUEST,
          "start_date and end_date \
           are required"
        )
      })?;

  let rows = state
    .store
    .fetch_groceries(
      &GroceryQuery::legacy(range)
    )
    .await?;

  Ok(Json(rows))
}
