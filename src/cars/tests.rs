//! Tests for the cars module: ownership scoping, partial-merge updates, and
//! cascading deletes.

use axum::extract::{Extension, Json, Path};

use super::handlers;
use super::models::{CreateCarRequest, UpdateCarRequest};
use crate::auth::extractors::AuthedUser;
use crate::common::test_support::{seed_user, test_state};
use crate::common::ApiError;

fn authed(id: &str) -> AuthedUser {
    AuthedUser {
        id: id.to_string(),
        email: format!("{}@example.com", id),
    }
}

fn create_request(name: &str) -> Json<CreateCarRequest> {
    Json(CreateCarRequest {
        name: name.to_string(),
        brand: Some("Tesla".to_string()),
        model: Some("Model S".to_string()),
        year: Some(2020),
        fuel_type: Some("ice".to_string()),
        mileage_at_start: Some(10000),
        image_data: None,
    })
}

#[tokio::test]
async fn test_create_and_get_car() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    let Json(fetched) = handlers::get_car(
        Extension(state),
        authed(&owner),
        Path(car.id.clone()),
    )
    .await
    .expect("car fetched");

    assert_eq!(fetched.id, car.id);
    assert_eq!(fetched.name, "My Tesla");
    assert_eq!(fetched.user_id, owner);
}

#[tokio::test]
async fn test_foreign_car_indistinguishable_from_missing() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    let foreign = handlers::get_car(
        Extension(state.clone()),
        authed(&other),
        Path(car.id.clone()),
    )
    .await;

    let missing = handlers::get_car(
        Extension(state),
        authed(&other),
        Path("C_MISSNG".to_string()),
    )
    .await;

    match (foreign, missing) {
        (Err(ApiError::NotFound(a)), Err(ApiError::NotFound(b))) => assert_eq!(a, b),
        _ => panic!("expected matching NotFound errors"),
    }
}

#[tokio::test]
async fn test_list_only_returns_own_cars() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;

    handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("Mine"),
    )
    .await
    .expect("car created");

    let Json(own) = handlers::get_cars(Extension(state.clone()), authed(&owner))
        .await
        .expect("list succeeds");
    let Json(others) = handlers::get_cars(Extension(state), authed(&other))
        .await
        .expect("list succeeds");

    assert_eq!(own.len(), 1);
    assert!(others.is_empty());
}

#[tokio::test]
async fn test_update_with_empty_body_is_identity() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    let Json(updated) = handlers::update_car(
        Extension(state),
        authed(&owner),
        Path(car.id.clone()),
        Json(UpdateCarRequest {
            name: Some("".to_string()),
            ..Default::default()
        }),
    )
    .await
    .expect("update succeeds");

    assert_eq!(updated.name, car.name);
    assert_eq!(updated.brand, car.brand);
    assert_eq!(updated.model, car.model);
    assert_eq!(updated.year, car.year);
    assert_eq!(updated.fuel_type, car.fuel_type);
    assert_eq!(updated.mileage_at_start, car.mileage_at_start);
}

#[tokio::test]
async fn test_update_merges_present_fields() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    let Json(updated) = handlers::update_car(
        Extension(state),
        authed(&owner),
        Path(car.id.clone()),
        Json(UpdateCarRequest {
            name: Some("Updated Tesla".to_string()),
            year: Some(2021),
            ..Default::default()
        }),
    )
    .await
    .expect("update succeeds");

    assert_eq!(updated.name, "Updated Tesla");
    assert_eq!(updated.year, Some(2021));
    assert_eq!(updated.brand, car.brand);
}

#[tokio::test]
async fn test_delete_cascades_to_all_children() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    // Seed one row of every child type, including a service two hops down.
    {
        let db = state.read().await.db.clone();

        sqlx::query(
            "INSERT INTO mileage_entries (id, car_id, mileage, date) VALUES ('M_TEST01', ?, 15000, '2023-01-01')",
        )
        .bind(&car.id)
        .execute(&db)
        .await
        .expect("mileage seeded");

        sqlx::query(
            "INSERT INTO full_tank_entries (id, car_id, quantity, unit, cost, mileage, date) \
             VALUES ('F_TEST01', ?, 50.0, 'liter', 80.5, 15000, '2023-01-01')",
        )
        .bind(&car.id)
        .execute(&db)
        .await
        .expect("full tank seeded");

        sqlx::query(
            "INSERT INTO parts (id, car_id, name, status) VALUES ('P_TEST01', ?, 'Brakes', 'enable')",
        )
        .bind(&car.id)
        .execute(&db)
        .await
        .expect("part seeded");

        sqlx::query(
            "INSERT INTO services (id, part_id, date, mileage) VALUES ('S_TEST01', 'P_TEST01', '2023-01-01', 15000)",
        )
        .execute(&db)
        .await
        .expect("service seeded");

        sqlx::query(
            "INSERT INTO spending_entries (id, car_id, amount, date, type) \
             VALUES ('E_TEST01', ?, 150.75, '2023-01-01', 'insurance')",
        )
        .bind(&car.id)
        .execute(&db)
        .await
        .expect("spending seeded");
    }

    handlers::delete_car(Extension(state.clone()), authed(&owner), Path(car.id.clone()))
        .await
        .expect("car deleted");

    let db = state.read().await.db.clone();
    for table in [
        "mileage_entries",
        "full_tank_entries",
        "parts",
        "services",
        "spending_entries",
    ] {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&db)
            .await
            .expect("count query");
        assert_eq!(count, 0, "expected {} to be empty after cascade", table);
    }
}

#[tokio::test]
async fn test_delete_foreign_car_rejected() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;

    let Json(car) = handlers::create_car(
        Extension(state.clone()),
        authed(&owner),
        create_request("My Tesla"),
    )
    .await
    .expect("car created");

    let result =
        handlers::delete_car(Extension(state.clone()), authed(&other), Path(car.id.clone())).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    // Still there for the owner.
    handlers::get_car(Extension(state), authed(&owner), Path(car.id))
        .await
        .expect("car still present");
}
