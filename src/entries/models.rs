// src/entries/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Car-owned entry models
// ============================================================================

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct MileageEntry {
    pub id: String,
    #[serde(rename = "carId")]
    pub car_id: String,
    pub mileage: i64,
    pub date: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct FullTankEntry {
    pub id: String,
    #[serde(rename = "carId")]
    pub car_id: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: f64,
    pub mileage: i64,
    pub date: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct SpendingEntry {
    pub id: String,
    #[serde(rename = "carId")]
    pub car_id: String,
    pub amount: f64,
    pub date: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub spending_type: String,
    pub name: Option<String>,
    pub recurrence: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(rename = "partId")]
    pub part_id: Option<String>,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

// ============================================================================
// Request models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateMileageRequest {
    pub mileage: i64,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFullTankRequest {
    pub quantity: f64,
    pub unit: String,
    pub cost: f64,
    pub mileage: i64,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpendingRequest {
    pub amount: f64,
    pub date: String,
    #[serde(rename = "type")]
    pub spending_type: String,
    pub name: Option<String>,
    pub recurrence: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(rename = "partId")]
    pub part_id: Option<String>,
}
