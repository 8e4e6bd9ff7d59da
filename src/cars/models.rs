// src/cars/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Car {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    #[serde(rename = "type")]
    pub fuel_type: Option<String>,
    #[serde(rename = "mileageAtStart")]
    pub mileage_at_start: Option<i64>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    #[serde(rename = "type")]
    pub fuel_type: Option<String>,
    #[serde(rename = "mileageAtStart")]
    pub mileage_at_start: Option<i64>,
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateCarRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    #[serde(rename = "type")]
    pub fuel_type: Option<String>,
    #[serde(rename = "mileageAtStart")]
    pub mileage_at_start: Option<i64>,
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}
