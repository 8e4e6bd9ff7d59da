// src/parts/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Part {
    pub id: String,
    #[serde(rename = "carId")]
    pub car_id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "advisedRevision")]
    pub advised_revision: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Service record, owned by a part. Authorization walks three hops:
/// service -> part -> car -> user.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Service {
    pub id: String,
    #[serde(rename = "partId")]
    pub part_id: String,
    pub date: String,
    pub mileage: i64,
    #[serde(rename = "spendingId")]
    pub spending_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePartRequest {
    pub name: String,
    pub status: String,
    #[serde(rename = "advisedRevision")]
    pub advised_revision: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdatePartRequest {
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "advisedRevision")]
    pub advised_revision: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub date: String,
    pub mileage: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateServiceRequest {
    pub date: Option<String>,
    pub mileage: Option<i64>,
}
