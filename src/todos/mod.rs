use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod ownership;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
}
