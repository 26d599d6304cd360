use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse};

const OPENAPI_JSON: &str = include_str!("../../res/openapi.json");

const SWAGGER_UI_HTML: &str = include_str!("../../res/swagger-ui.html");

pub async fn openapi() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], OPENAPI_JSON)
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}
