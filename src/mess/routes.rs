use crate::mess::handlers;
use axum::{routing::get, Router};

pub fn mess_routes() -> Router {
    Router::new()
        .route(
            "/api/mess",
            get(handlers::list_messes).post(handlers::create_mess),
        )
        .route("/api/mess/mine", get(handlers::list_my_messes))
        .route("/api/mess/:mess_id", get(handlers::get_mess))
}
