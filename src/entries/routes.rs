// src/entries/routes.rs
//
// POST and GET take the owning car id; DELETE takes the entry id. The two
// share one path pattern, which is why the parameter is just ":id" here.

use axum::{routing::get, Router};

use super::handlers::{full_tank, mileage, spending};

pub fn entry_routes() -> Router {
    Router::new()
        .route(
            "/mileage/:id",
            get(mileage::get_mileages)
                .post(mileage::add_mileage)
                .delete(mileage::delete_mileage),
        )
        .route(
            "/full-tank/:id",
            get(full_tank::get_full_tanks)
                .post(full_tank::add_full_tank)
                .delete(full_tank::delete_full_tank),
        )
        .route(
            "/spending/:id",
            get(spending::get_spendings)
                .post(spending::add_spending)
                .delete(spending::delete_spending),
        )
}
