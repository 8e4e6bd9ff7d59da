//! Tests for the parts module, including the three-hop service chain.

use axum::extract::{Extension, Json, Path};

use super::handlers::{part, service};
use super::models::{CreatePartRequest, CreateServiceRequest, UpdatePartRequest, UpdateServiceRequest};
use crate::auth::extractors::AuthedUser;
use crate::common::test_support::{seed_car, seed_user, test_state};
use crate::common::ApiError;

fn authed(id: &str) -> AuthedUser {
    AuthedUser {
        id: id.to_string(),
        email: format!("{}@example.com", id),
    }
}

fn part_request(name: &str) -> Json<CreatePartRequest> {
    Json(CreatePartRequest {
        name: name.to_string(),
        status: "enable".to_string(),
        advised_revision: Some("Check every 20,000 km".to_string()),
    })
}

#[tokio::test]
async fn test_create_and_update_part() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let Json(created) = part::create_part(
        Extension(state.clone()),
        authed(&owner),
        Path(car_id.clone()),
        part_request("Brakes"),
    )
    .await
    .expect("part created");
    assert_eq!(created.car_id, car_id);

    let Json(updated) = part::update_part(
        Extension(state),
        authed(&owner),
        Path(created.id.clone()),
        Json(UpdatePartRequest {
            status: Some("disabled".to_string()),
            ..Default::default()
        }),
    )
    .await
    .expect("part updated");

    assert_eq!(updated.status, "disabled");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.advised_revision, created.advised_revision);
}

#[tokio::test]
async fn test_service_chain_blocks_foreign_users() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let other = seed_user(&state.read().await.db, "c@d.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let Json(created_part) = part::create_part(
        Extension(state.clone()),
        authed(&owner),
        Path(car_id),
        part_request("Brakes"),
    )
    .await
    .expect("part created");

    // Foreign user cannot create a service on someone else's part.
    let foreign_create = service::create_service(
        Extension(state.clone()),
        authed(&other),
        Path(created_part.id.clone()),
        Json(CreateServiceRequest {
            date: "2023-01-01".to_string(),
            mileage: 15000,
        }),
    )
    .await;
    assert!(matches!(foreign_create, Err(ApiError::NotFound(_))));

    let Json(created) = service::create_service(
        Extension(state.clone()),
        authed(&owner),
        Path(created_part.id.clone()),
        Json(CreateServiceRequest {
            date: "2023-01-01".to_string(),
            mileage: 15000,
        }),
    )
    .await
    .expect("service created");

    // Foreign reads, updates, and deletes all collapse to NotFound.
    let foreign_list = service::get_services(
        Extension(state.clone()),
        authed(&other),
        Path(created_part.id.clone()),
    )
    .await;
    assert!(matches!(foreign_list, Err(ApiError::NotFound(_))));

    let foreign_update = service::update_service(
        Extension(state.clone()),
        authed(&other),
        Path(created.id.clone()),
        Json(UpdateServiceRequest {
            mileage: Some(16000),
            ..Default::default()
        }),
    )
    .await;
    assert!(matches!(foreign_update, Err(ApiError::NotFound(_))));

    let foreign_delete = service::delete_service(
        Extension(state.clone()),
        authed(&other),
        Path(created.id.clone()),
    )
    .await;
    assert!(matches!(foreign_delete, Err(ApiError::NotFound(_))));

    // The owner still sees the untouched record.
    let Json(services) = service::get_services(
        Extension(state),
        authed(&owner),
        Path(created_part.id.clone()),
    )
    .await
    .expect("list succeeds");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].mileage, 15000);
}

#[tokio::test]
async fn test_service_update_partial_merge() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let Json(created_part) = part::create_part(
        Extension(state.clone()),
        authed(&owner),
        Path(car_id),
        part_request("Brakes"),
    )
    .await
    .expect("part created");

    let Json(created) = service::create_service(
        Extension(state.clone()),
        authed(&owner),
        Path(created_part.id.clone()),
        Json(CreateServiceRequest {
            date: "2023-01-01".to_string(),
            mileage: 15000,
        }),
    )
    .await
    .expect("service created");

    let Json(updated) = service::update_service(
        Extension(state),
        authed(&owner),
        Path(created.id.clone()),
        Json(UpdateServiceRequest {
            mileage: Some(16000),
            date: None,
        }),
    )
    .await
    .expect("service updated");

    assert_eq!(updated.mileage, 16000);
    assert_eq!(updated.date, created.date);
}

#[tokio::test]
async fn test_delete_part_cascades_services() {
    let state = test_state().await;
    let owner = seed_user(&state.read().await.db, "a@b.com").await;
    let car_id = seed_car(&state.read().await.db, &owner, "My Tesla").await;

    let Json(created_part) = part::create_part(
        Extension(state.clone()),
        authed(&owner),
        Path(car_id),
        part_request("Brakes"),
    )
    .await
    .expect("part created");

    service::create_service(
        Extension(state.clone()),
        authed(&owner),
        Path(created_part.id.clone()),
        Json(CreateServiceRequest {
            date: "2023-01-01".to_string(),
            mileage: 15000,
        }),
    )
    .await
    .expect("service created");

    part::delete_part(
        Extension(state.clone()),
        authed(&owner),
        Path(created_part.id.clone()),
    )
    .await
    .expect("part deleted");

    let db = state.read().await.db.clone();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
        .fetch_one(&db)
        .await
        .expect("count query");
    assert_eq!(count, 0);
}
