// src/entries/handlers/spending.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreateSpendingRequest, SpendingEntry};
use super::super::validators::SpendingValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::{delete_car_scoped, resolve_car, resolve_part};
use crate::common::{generate_spending_id, ApiError, AppState, StatusMessage, Validator};

/// POST /spending/:car_id - Add a spending entry to an owned car
pub async fn add_spending(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
    Json(request): Json<CreateSpendingRequest>,
) -> Result<Json<SpendingEntry>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = SpendingValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            car_id = %car_id,
            errors = ?validation_result.errors,
            "Spending entry validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    // An optional part link must point at a part of the same car.
    if let Some(part_id) = &request.part_id {
        let part = resolve_part(&state.db, part_id, &authed.id).await?;
        if part.car_id != car.id {
            return Err(ApiError::NotFound("Part not found.".to_string()));
        }
    }

    let entry_id = generate_spending_id();

    sqlx::query(
        r#"
        INSERT INTO spending_entries (id, car_id, amount, date, type, name, recurrence, quantity, unit, part_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry_id)
    .bind(&car.id)
    .bind(request.amount)
    .bind(&request.date)
    .bind(&request.spending_type)
    .bind(request.name.as_deref())
    .bind(request.recurrence.as_deref())
    .bind(request.quantity)
    .bind(request.unit.as_deref())
    .bind(request.part_id.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error creating spending entry");
        ApiError::Database(e)
    })?;

    let entry = sqlx::query_as::<_, SpendingEntry>("SELECT * FROM spending_entries WHERE id = ?")
        .bind(&entry_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %authed.id,
        car_id = %car.id,
        entry_id = %entry_id,
        "Spending entry created successfully"
    );

    Ok(Json(entry))
}

/// GET /spending/:car_id - List spending entries for an owned car, newest first
pub async fn get_spendings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<Vec<SpendingEntry>>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    let entries = sqlx::query_as::<_, SpendingEntry>(
        "SELECT * FROM spending_entries WHERE car_id = ? ORDER BY date DESC",
    )
    .bind(&car.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, car_id = %car.id, "Database error fetching spending entries");
        ApiError::Database(e)
    })?;

    Ok(Json(entries))
}

/// DELETE /spending/:id - Delete a spending entry through its ownership chain
pub async fn delete_spending(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    delete_car_scoped(
        &state.db,
        "spending_entries",
        "Spending entry",
        &entry_id,
        &authed.id,
    )
    .await?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Spending entry deleted successfully");

    Ok(Json(StatusMessage::new(
        200,
        "Spending entry deleted successfully.",
    )))
}
