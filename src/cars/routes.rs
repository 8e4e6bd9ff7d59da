// src/cars/routes.rs

use axum::{
    routing::get,
    Router,
};

use super::handlers;

pub fn car_routes() -> Router {
    Router::new()
        .route(
            "/car",
            get(handlers::get_cars).post(handlers::create_car),
        )
        .route(
            "/car/:id",
            get(handlers::get_car)
                .put(handlers::update_car)
                .delete(handlers::delete_car),
        )
}
