// src/parts/handlers/part.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreatePartRequest, Part, UpdatePartRequest};
use super::super::validators::PartValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::{delete_car_scoped, fetch_car_scoped, resolve_car};
use crate::common::{generate_part_id, non_empty, ApiError, AppState, StatusMessage, Validator};

/// POST /part/:car_id - Create a custom part on an owned car
pub async fn create_part(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
    Json(request): Json<CreatePartRequest>,
) -> Result<Json<Part>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = PartValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            car_id = %car_id,
            errors = ?validation_result.errors,
            "Part creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let part_id = generate_part_id();

    sqlx::query("INSERT INTO parts (id, car_id, name, status, advised_revision) VALUES (?, ?, ?, ?, ?)")
        .bind(&part_id)
        .bind(&car.id)
        .bind(&request.name)
        .bind(&request.status)
        .bind(request.advised_revision.as_deref())
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, car_id = %car.id, "Database error creating part");
            ApiError::Database(e)
        })?;

    let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = ?")
        .bind(&part_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %authed.id,
        car_id = %car.id,
        part_id = %part_id,
        "Part created successfully"
    );

    Ok(Json(part))
}

/// GET /part/:car_id - List parts of an owned car, newest first
pub async fn get_parts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<Vec<Part>>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let parts = sqlx::query_as::<_, Part>(
        "SELECT * FROM parts WHERE car_id = ? ORDER BY created_at DESC",
    )
    .bind(&car.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error fetching parts");
        ApiError::Database(e)
    })?;

    Ok(Json(parts))
}

/// PUT /part/:id - Partial-merge update of a part
pub async fn update_part(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(part_id): Path<String>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<Part>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = PartValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    // One scoped lookup covers existence and ownership at once.
    let _current: Part =
        fetch_car_scoped(&state.db, "parts", "Part", &part_id, &authed.id).await?;

    sqlx::query(
        r#"
        UPDATE parts
        SET name = COALESCE(?, name),
            status = COALESCE(?, status),
            advised_revision = COALESCE(?, advised_revision),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(non_empty(request.name))
    .bind(non_empty(request.status))
    .bind(non_empty(request.advised_revision))
    .bind(&part_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, part_id = %part_id, "Database error updating part");
        ApiError::Database(e)
    })?;

    let part = fetch_car_scoped(&state.db, "parts", "Part", &part_id, &authed.id).await?;

    info!(user_id = %authed.id, part_id = %part_id, "Part updated successfully");

    Ok(Json(part))
}

/// DELETE /part/:id - Delete a part and, through the cascade, its services
pub async fn delete_part(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(part_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    delete_car_scoped(&state.db, "parts", "Part", &part_id, &authed.id).await?;

    info!(user_id = %authed.id, part_id = %part_id, "Part deleted successfully");

    Ok(Json(StatusMessage::new(200, "Part deleted successfully.")))
}
