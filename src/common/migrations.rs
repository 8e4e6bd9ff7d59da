// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Only drop tables if RESET_DB environment variable is set to "true"
    // This prevents data loss on server restarts
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    }

    create_user_tables(pool).await?;
    create_car_tables(pool).await?;
    create_part_tables(pool).await?;
    create_entry_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Drop tables in reverse dependency order
    let tables = vec![
        "spending_entries",
        "services",
        "parts",
        "full_tank_entries",
        "mileage_entries",
        "cars",
        "users",
    ];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            provider TEXT NOT NULL DEFAULT 'carkit_api',
            image_url TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            deleted_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Exactly one live account per email; soft-deleted rows free the address
    // for re-registration.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_live_email ON users(email) WHERE is_deleted = 0",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_car_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cars (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            brand TEXT,
            model TEXT,
            year INTEGER,
            fuel_type TEXT,
            mileage_at_start INTEGER,
            image_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_entry_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mileage_entries (
            id TEXT PRIMARY KEY,
            car_id TEXT NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
            mileage INTEGER NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS full_tank_entries (
            id TEXT PRIMARY KEY,
            car_id TEXT NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            cost REAL NOT NULL,
            mileage INTEGER NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spending_entries (
            id TEXT PRIMARY KEY,
            car_id TEXT NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            type TEXT NOT NULL,
            name TEXT,
            recurrence TEXT,
            quantity REAL,
            unit TEXT,
            part_id TEXT REFERENCES parts(id) ON DELETE SET NULL,
            service_id TEXT REFERENCES services(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_part_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parts (
            id TEXT PRIMARY KEY,
            car_id TEXT NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            advised_revision TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id TEXT PRIMARY KEY,
            part_id TEXT NOT NULL REFERENCES parts(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            mileage INTEGER NOT NULL,
            spending_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = vec![
        "CREATE INDEX IF NOT EXISTS idx_cars_user_id ON cars(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_mileage_entries_car_id ON mileage_entries(car_id)",
        "CREATE INDEX IF NOT EXISTS idx_mileage_entries_date ON mileage_entries(date)",
        "CREATE INDEX IF NOT EXISTS idx_full_tank_entries_car_id ON full_tank_entries(car_id)",
        "CREATE INDEX IF NOT EXISTS idx_full_tank_entries_date ON full_tank_entries(date)",
        "CREATE INDEX IF NOT EXISTS idx_spending_entries_car_id ON spending_entries(car_id)",
        "CREATE INDEX IF NOT EXISTS idx_spending_entries_date ON spending_entries(date)",
        "CREATE INDEX IF NOT EXISTS idx_parts_car_id ON parts(car_id)",
        "CREATE INDEX IF NOT EXISTS idx_services_part_id ON services(part_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}
