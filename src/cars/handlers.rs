// src/cars/handlers.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{Car, CreateCarRequest, UpdateCarRequest};
use super::validators::CarValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::resolve_car;
use crate::common::{generate_car_id, non_empty, ApiError, AppState, StatusMessage, Validator};

const CAR_IMAGE_DIM: u32 = 800;

/// POST /car - Create a new car for the authenticated user
pub async fn create_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<Car>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = CarValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "Car creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    info!(user_id = %authed.id, name = %request.name, "Creating new car");

    let image_url = match &request.image_data {
        Some(data) => Some(state.image_store.store_base64(data, CAR_IMAGE_DIM).await?),
        None => None,
    };

    let car_id = generate_car_id();

    sqlx::query(
        r#"
        INSERT INTO cars (id, user_id, name, brand, model, year, fuel_type, mileage_at_start, image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&car_id)
    .bind(&authed.id)
    .bind(&request.name)
    .bind(request.brand.as_deref())
    .bind(request.model.as_deref())
    .bind(request.year)
    .bind(request.fuel_type.as_deref())
    .bind(request.mileage_at_start)
    .bind(image_url.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, car_id = %car_id, "Database error creating car");
        ApiError::Database(e)
    })?;

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    info!(user_id = %authed.id, car_id = %car_id, "Car created successfully");

    Ok(Json(car))
}

/// GET /car - Get all cars for the authenticated user
pub async fn get_cars(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();

    let cars = sqlx::query_as::<_, Car>(
        "SELECT * FROM cars WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error fetching cars");
        ApiError::Database(e)
    })?;

    Ok(Json(cars))
}

/// GET /car/:id - Get one car, scoped to its owner
pub async fn get_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    Ok(Json(car))
}

/// PUT /car/:id - Partial-merge update of a car
pub async fn update_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<Car>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = CarValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            car_id = %car_id,
            errors = ?validation_result.errors,
            "Car update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let current = resolve_car(&state.db, &car_id, &authed.id).await?;

    let new_image_url = match non_empty(request.image_data) {
        Some(data) => {
            let url = state.image_store.store_base64(&data, CAR_IMAGE_DIM).await?;
            if let Some(old) = &current.image_url {
                state.image_store.remove(old).await;
            }
            Some(url)
        }
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE cars
        SET name = COALESCE(?, name),
            brand = COALESCE(?, brand),
            model = COALESCE(?, model),
            year = COALESCE(?, year),
            fuel_type = COALESCE(?, fuel_type),
            mileage_at_start = COALESCE(?, mileage_at_start),
            image_url = COALESCE(?, image_url),
            updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(non_empty(request.name))
    .bind(non_empty(request.brand))
    .bind(non_empty(request.model))
    .bind(request.year)
    .bind(non_empty(request.fuel_type))
    .bind(request.mileage_at_start)
    .bind(new_image_url.as_deref())
    .bind(&car_id)
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, car_id = %car_id, "Database error updating car");
        ApiError::Database(e)
    })?;

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    info!(user_id = %authed.id, car_id = %car_id, "Car updated successfully");

    Ok(Json(car))
}

/// DELETE /car/:id - Delete a car and, through cascading foreign keys, all of
/// its mileage, full tank, part, spending, and service rows
pub async fn delete_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(car_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    let car = resolve_car(&state.db, &car_id, &authed.id).await?;

    if let Some(image_url) = &car.image_url {
        state.image_store.remove(image_url).await;
    }

    let result = sqlx::query("DELETE FROM cars WHERE id = ? AND user_id = ?")
        .bind(&car_id)
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, car_id = %car_id, "Database error deleting car");
            ApiError::Database(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Car not found.".to_string()));
    }

    info!(user_id = %authed.id, car_id = %car_id, "Car deleted successfully");

    Ok(Json(StatusMessage::new(200, "Car deleted successfully.")))
}
