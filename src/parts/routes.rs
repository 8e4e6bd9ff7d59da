// src/parts/routes.rs
//
// POST and GET take the parent id (car for parts, part for services);
// PUT and DELETE take the entity id. Same path pattern either way.

use axum::{routing::get, Router};

use super::handlers::{part, service};

pub fn part_routes() -> Router {
    Router::new()
        .route(
            "/part/:id",
            get(part::get_parts)
                .post(part::create_part)
                .put(part::update_part)
                .delete(part::delete_part),
        )
        .route(
            "/service/:id",
            get(service::get_services)
                .post(service::create_service)
                .put(service::update_service)
                .delete(service::delete_service),
        )
}
