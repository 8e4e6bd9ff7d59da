// src/common/ownership.rs
//! Ownership-chain resolution shared by every resource handler.
//!
//! Each entity is reachable only through its chain of foreign keys back to
//! the authenticated user (car -> user, entry -> car -> user,
//! service -> part -> car -> user). Lookups filter by the whole chain in a
//! single query, so a row that exists but belongs to someone else is
//! indistinguishable from a row that does not exist at all.

use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

use super::error::ApiError;
use crate::cars::models::Car;
use crate::parts::models::Part;

fn not_found(label: &str) -> ApiError {
    ApiError::NotFound(format!("{} not found.", label))
}

/// Fetch a car by id, scoped to its owner.
pub async fn resolve_car(
    pool: &SqlitePool,
    car_id: &str,
    user_id: &str,
) -> Result<Car, ApiError> {
    sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ? AND user_id = ?")
        .bind(car_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| not_found("Car"))
}

/// Fetch a part by id, scoped through its car to the owner.
pub async fn resolve_part(
    pool: &SqlitePool,
    part_id: &str,
    user_id: &str,
) -> Result<Part, ApiError> {
    sqlx::query_as::<_, Part>(
        "SELECT p.* FROM parts p JOIN cars c ON c.id = p.car_id WHERE p.id = ? AND c.user_id = ?",
    )
    .bind(part_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(ApiError::Database)?
    .ok_or_else(|| not_found("Part"))
}

/// Fetch a car-owned child row (mileage, full tank, part, spending) by id,
/// scoped to the owner in one JOINed query.
pub async fn fetch_car_scoped<T>(
    pool: &SqlitePool,
    table: &str,
    label: &str,
    id: &str,
    user_id: &str,
) -> Result<T, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT t.* FROM {} t JOIN cars c ON c.id = t.car_id WHERE t.id = ? AND c.user_id = ?",
        table
    );

    sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| not_found(label))
}

/// Fetch a part-owned child row (service) by id, scoped through part and car
/// to the owner.
pub async fn fetch_part_scoped<T>(
    pool: &SqlitePool,
    table: &str,
    label: &str,
    id: &str,
    user_id: &str,
) -> Result<T, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT t.* FROM {} t \
         JOIN parts p ON p.id = t.part_id \
         JOIN cars c ON c.id = p.car_id \
         WHERE t.id = ? AND c.user_id = ?",
        table
    );

    sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| not_found(label))
}

/// Delete a car-owned child row in a single ownership-filtered statement.
/// Zero rows affected means absent or foreign-owned; both map to NotFound.
pub async fn delete_car_scoped(
    pool: &SqlitePool,
    table: &str,
    label: &str,
    id: &str,
    user_id: &str,
) -> Result<(), ApiError> {
    let sql = format!(
        "DELETE FROM {} WHERE id = ? AND car_id IN (SELECT id FROM cars WHERE user_id = ?)",
        table
    );

    let result = sqlx::query(&sql)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(ApiError::Database)?;

    if result.rows_affected() == 0 {
        return Err(not_found(label));
    }

    Ok(())
}

/// Delete a part-owned child row in a single ownership-filtered statement.
pub async fn delete_part_scoped(
    pool: &SqlitePool,
    table: &str,
    label: &str,
    id: &str,
    user_id: &str,
) -> Result<(), ApiError> {
    let sql = format!(
        "DELETE FROM {} WHERE id = ? AND part_id IN \
         (SELECT p.id FROM parts p JOIN cars c ON c.id = p.car_id WHERE c.user_id = ?)",
        table
    );

    let result = sqlx::query(&sql)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(ApiError::Database)?;

    if result.rows_affected() == 0 {
        return Err(not_found(label));
    }

    Ok(())
}
