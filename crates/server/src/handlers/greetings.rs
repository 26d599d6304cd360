use axum::Json;

use crate::models::MessageResponse;

pub const WELCOME: &str =
  "Welcome to dinosaur API!";

pub async fn welcome() -> &'static str {
  WELCOME
}

pub async fn hello()
-> Json<MessageResponse> {
  Json(MessageResponse::new("hello"))
}

pub async fn test()
-> Json<MessageResponse> {
  Json(MessageResponse::new("test"))
}
