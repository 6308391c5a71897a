//! Routes and request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use shaclform_render::WEBFORM_JS;

use crate::state::AppState;

/// Builds the application router: the form page, the client script, and
/// the submission endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit))
        .route("/webform.js", get(script))
        .with_state(state)
}

/// Binds `addr` and serves the form until shutdown.
///
/// # Errors
///
/// Returns the underlying IO error when binding or serving fails.
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving form");
    axum::serve(listener, router(state)).await
}

async fn form_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.form_html.clone())
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript")], WEBFORM_JS)
}

/// Converts a submission; `201` with the result Turtle on success, `400`
/// with the conversion error otherwise.
async fn submit(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    match state.converter.convert_turtle(&fields) {
        Ok(turtle) => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "text/turtle")],
            turtle,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(%error, "rejected submission");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
    }
}
