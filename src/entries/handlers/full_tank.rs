// src/entries/handlers/full_tank.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreateFullTankRequest, FullTankEntry};
use super::super::validators::FullTankValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::{delete_car_scoped, resolve_car};
use crate::common::{generate_full_tank_id, ApiError, AppState, StatusMessage, Validator};

/// POST /full-tank/:car_id - Add a fill-up entry to an owned car
pub async fn add_full_tank(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
    Json(request): Json<CreateFullTankRequest>,
) -> Result<Json<FullTankEntry>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = FullTankValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            car_id = %car_id,
            errors = ?validation_result.errors,
            "Full tank entry validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let entry_id = generate_full_tank_id();

    sqlx::query(
        r#"
        INSERT INTO full_tank_entries (id, car_id, quantity, unit, cost, mileage, date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry_id)
    .bind(&car.id)
    .bind(request.quantity)
    .bind(&request.unit)
    .bind(request.cost)
    .bind(request.mileage)
    .bind(&request.date)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error creating full tank entry");
        ApiError::Database(e)
    })?;

    let entry = sqlx::query_as::<_, FullTankEntry>("SELECT * FROM full_tank_entries WHERE id = ?")
        .bind(&entry_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %authed.id,
        car_id = %car.id,
        entry_id = %entry_id,
        "Full tank entry created successfully"
    );

    Ok(Json(entry))
}

/// GET /full-tank/:car_id - List fill-up entries for an owned car, newest first
pub async fn get_full_tanks(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<Vec<FullTankEntry>>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let entries = sqlx::query_as::<_, FullTankEntry>(
        "SELECT * FROM full_tank_entries WHERE car_id = ? ORDER BY date DESC",
    )
    .bind(&car.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error fetching full tank entries");
        ApiError::Database(e)
    })?;

    Ok(Json(entries))
}

/// DELETE /full-tank/:id - Delete a fill-up entry through its ownership chain
pub async fn delete_full_tank(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    delete_car_scoped(
        &state.db,
        "full_tank_entries",
        "Full tank entry",
        &entry_id,
        &authed.id,
    )
    .await?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Full tank entry deleted successfully");

    Ok(Json(StatusMessage::new(
        200,
        "Full tank entry deleted successfully.",
    )))
}
