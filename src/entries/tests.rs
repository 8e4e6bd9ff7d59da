//! Tests for the entries module: ownership scoping across the car chain.

use axum::extract::{Extension, Json, Path};

use super::handlers::{mileage, spending};
use super::models::{CreateMileageRequest, CreateSpendingRequest};
use crate::auth::extractors::AuthedUser;
use crate::common::test_support::{seed_car, seed_user, test_state};
use crate::common::ApiError;

fn authed(id: &str) -> AuthedUser {
    AuthedUser {
        id: id.to_string(),
        email: format!("{}@example.com", id),
    }
}

fn mileage_request(mileage: i64, date: &str) -> Json<CreateMileageRequest> {
    Json(CreateMileageRequest {
        mileage,
        date: date.to_string(),
    })
}

#[tokio::test]
async fn test_add_and_list_mileage_sorted_by_date_desc() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    for (m, d) in [(15000, "2023-01-01"), (16000, "2023-03-01"), (15500, "2023-02-01")] {
        mileage::add_mileage(
            Extension(state.clone()),
            authed(&owner),
            Path(car_id.clone()),
            mileage_request(m, d),
        )
        .await
        .expect("entry created");
    }

    let Json(entries) = mileage::get_mileages(
        Extension(state),
        authed(&owner),
        Path(car_id),
    )
    .await
    .expect("list succeeds");

    let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2023-03-01", "2023-02-01", "2023-01-01"]);
}

#[tokio::test]
async fn test_add_mileage_to_foreign_car_rejected() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let result = mileage::add_mileage(
        Extension(state),
        authed(&other),
        Path(car_id),
        mileage_request(15000, "2023-01-01"),
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_mileage_scoped_to_owner() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let Json(entry) = mileage::add_mileage(
        Extension(state.clone()),
        authed(&owner),
        Path(car_id.clone()),
        mileage_request(15000, "2023-01-01"),
    )
    .await
    .expect("entry created");

    // A foreign caller cannot delete it, and gets the same NotFound a bogus
    // id would produce.
    let foreign = mileage::delete_mileage(
        Extension(state.clone()),
        authed(&other),
        Path(entry.id.clone()),
    )
    .await;
    assert!(matches!(foreign, Err(ApiError::NotFound(_))));

    mileage::delete_mileage(Extension(state.clone()), authed(&owner), Path(entry.id.clone()))
        .await
        .expect("owner delete succeeds");

    let Json(entries) = mileage::get_mileages(Extension(state), authed(&owner), Path(car_id))
        .await
        .expect("list succeeds");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_spending_part_link_must_match_car() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let car_a = seed_car(&state.read().await.db, &owner, "Car A").await;
    let car_b = seed_car(&state.read().await.db, &owner, "Car B").await;

    // Part belongs to car B.
    {
        let db = state.read().await.db.clone();
        sqlx::query("INSERT INTO parts (id, car_id, name, status) VALUES ('P_TEST01', ?, 'Brakes', 'enable')")
            .bind(&car_b)
            .execute(&db)
            .await
            .expect("part seeded");
    }

    let mismatch = spending::add_spending(
        Extension(state.clone()),
        authed(&owner),
        Path(car_a),
        Json(CreateSpendingRequest {
            amount: 150.75,
            date: "2023-01-01".to_string(),
            spending_type: "repair".to_string(),
            name: Some("Brake pads".to_string()),
            recurrence: None,
            quantity: None,
            unit: None,
            part_id: Some("P_TEST01".to_string()),
        }),
    )
    .await;
    assert!(matches!(mismatch, Err(ApiError::NotFound(_))));

    let Json(entry) = spending::add_spending(
        Extension(state),
        authed(&owner),
        Path(car_b.clone()),
        Json(CreateSpendingRequest {
            amount: 150.75,
            date: "2023-01-01".to_string(),
            spending_type: "repair".to_string(),
            name: Some("Brake pads".to_string()),
            recurrence: None,
            quantity: None,
            unit: None,
            part_id: Some("P_TEST01".to_string()),
        }),
    )
    .await
    .expect("spending created");

    assert_eq!(entry.car_id, car_b);
    assert_eq!(entry.part_id.as_deref(), Some("P_TEST01"));
}
