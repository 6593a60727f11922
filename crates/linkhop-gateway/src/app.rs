use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, get_url_handler, health_handler, redirect_handler, submit_form_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", post(submit_form_handler))
            .route("/{short_code}", get(redirect_handler))
            .nest(
                "/v1",
                Router::new()
                    .route("/health", get(health_handler))
                    .route("/urls", post(create_url_handler))
                    .route("/urls/{short_code}", get(get_url_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
