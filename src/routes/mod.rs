pub mod health;
pub mod users;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::{error::Error, AppState};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/", get(health::health))
        .route(
            "/users/",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/users/:id/",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

pub(crate) fn route_not_found() -> Error {
    Error::NotFound("Not found".to_string())
}

async fn not_found() -> Error {
    route_not_found()
}
