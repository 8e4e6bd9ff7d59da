// src/entries/handlers/mileage.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreateMileageRequest, MileageEntry};
use super::super::validators::MileageValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::{delete_car_scoped, resolve_car};
use crate::common::{generate_mileage_id, ApiError, AppState, StatusMessage, Validator};

/// POST /mileage/:car_id - Add a mileage entry to an owned car
pub async fn add_mileage(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
    Json(request): Json<CreateMileageRequest>,
) -> Result<Json<MileageEntry>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = MileageValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            car_id = %car_id,
            errors = ?validation_result.errors,
            "Mileage entry validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let entry_id = generate_mileage_id();

    sqlx::query("INSERT INTO mileage_entries (id, car_id, mileage, date) VALUES (?, ?, ?, ?)")
        .bind(&entry_id)
        .bind(&car.id)
        .bind(request.mileage)
        .bind(&request.date)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, car_id = %car.id, "Database error creating mileage entry");
            ApiError::Database(e)
        })?;

    let entry = sqlx::query_as::<_, MileageEntry>("SELECT * FROM mileage_entries WHERE id = ?")
        .bind(&entry_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %authed.id,
        car_id = %car.id,
        entry_id = %entry_id,
        "Mileage entry created successfully"
    );

    Ok(Json(entry))
}

/// GET /mileage/:car_id - List mileage entries for an owned car, newest first
pub async fn get_mileages(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<Vec<MileageEntry>>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let entries = sqlx::query_as::<_, MileageEntry>(
        "SELECT * FROM mileage_entries WHERE car_id = ? ORDER BY date DESC",
    )
    .bind(&car.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error fetching mileage entries");
        ApiError::Database(e)
    })?;

    Ok(Json(entries))
}

/// DELETE /mileage/:id - Delete a mileage entry through its ownership chain
pub async fn delete_mileage(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    delete_car_scoped(
        &state.db,
        "mileage_entries",
        "Mileage entry",
        &entry_id,
        &authed.id,
    )
    .await?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Mileage entry deleted successfully");

    Ok(Json(StatusMessage::new(
        200,
        "Mileage entry deleted successfully.",
    )))
}
