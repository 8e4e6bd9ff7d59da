// src/parts/handlers/service.rs
//
// Services hang off parts, so every lookup walks the full
// service -> part -> car -> user chain.

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CreateServiceRequest, Service, UpdateServiceRequest};
use super::super::validators::ServiceValidator;
use crate::auth::AuthedUser;
use crate::common::ownership::{delete_part_scoped, fetch_part_scoped, resolve_part};
use crate::common::{generate_service_id, non_empty, ApiError, AppState, StatusMessage, Validator};

/// POST /service/:part_id - Create a service record on an owned part
pub async fn create_service(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(part_id): Path<String>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ServiceValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            part_id = %part_id,
            errors = ?validation_result.errors,
            "Service creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let part = resolve_part(&state.db, &part_id, &authed.id).await?;

    let service_id = generate_service_id();

    sqlx::query("INSERT INTO services (id, part_id, date, mileage) VALUES (?, ?, ?, ?)")
        .bind(&service_id)
        .bind(&part.id)
        .bind(&request.date)
        .bind(request.mileage)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, part_id = %part.id, "Database error creating service record");
            ApiError::Database(e)
        })?;

    let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
        .bind(&service_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %authed.id,
        part_id = %part.id,
        service_id = %service_id,
        "Service record created successfully"
    );

    Ok(Json(service))
}

/// GET /service/:part_id - List service records of an owned part, newest first
pub async fn get_services(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(part_id): Path<String>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let state = state_lock.read().await.clone();

    let part = resolve_part(&state.db, &part_id, &authed.id).await?;

    let services = sqlx::query_as::<_, Service>(
        "SELECT * FROM services WHERE part_id = ? ORDER BY date DESC",
    )
    .bind(&part.id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, part_id = %part.id, "Database error fetching service records");
        ApiError::Database(e)
    })?;

    Ok(Json(services))
}

/// PUT /service/:id - Partial-merge update of a service record
pub async fn update_service(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(service_id): Path<String>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ServiceValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let _current: Service =
        fetch_part_scoped(&state.db, "services", "Service", &service_id, &authed.id).await?;

    sqlx::query(
        r#"
        UPDATE services
        SET date = COALESCE(?, date),
            mileage = COALESCE(?, mileage),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(non_empty(request.date))
    .bind(request.mileage)
    .bind(&service_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, service_id = %service_id, "Database error updating service record");
        ApiError::Database(e)
    })?;

    let service =
        fetch_part_scoped(&state.db, "services", "Service", &service_id, &authed.id).await?;

    info!(user_id = %authed.id, service_id = %service_id, "Service record updated successfully");

    Ok(Json(service))
}

/// DELETE /service/:id - Delete a service record through the full chain
pub async fn delete_service(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(service_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    delete_part_scoped(&state.db, "services", "Service", &service_id, &authed.id).await?;

    info!(user_id = %authed.id, service_id = %service_id, "Service record deleted successfully");

    Ok(Json(StatusMessage::new(200, "Service deleted successfully.")))
}
