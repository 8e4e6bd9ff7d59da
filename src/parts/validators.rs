// src/parts/validators.rs

use chrono::NaiveDate;

use super::models::*;
use crate::common::{ValidationResult, Validator};

pub struct PartValidator;

impl Validator<CreatePartRequest> for PartValidator {
    fn validate(&self, data: &CreatePartRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Part name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Part name must be less than 255 characters");
        }

        if data.status.trim().is_empty() {
            result.add_error("status", "Part status is required");
        }

        result
    }
}

impl Validator<UpdatePartRequest> for PartValidator {
    fn validate(&self, data: &UpdatePartRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if name.len() > 255 {
                result.add_error("name", "Part name must be less than 255 characters");
            }
        }

        result
    }
}

pub struct ServiceValidator;

impl Validator<CreateServiceRequest> for ServiceValidator {
    fn validate(&self, data: &CreateServiceRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.mileage < 0 {
            result.add_error("mileage", "Mileage cannot be negative");
        }
        if NaiveDate::parse_from_str(&data.date, "%Y-%m-%d").is_err() {
            result.add_error("date", "Date must be in YYYY-MM-DD format");
        }

        result
    }
}

impl Validator<UpdateServiceRequest> for ServiceValidator {
    fn validate(&self, data: &UpdateServiceRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(mileage) = data.mileage {
            if mileage < 0 {
                result.add_error("mileage", "Mileage cannot be negative");
            }
        }
        if let Some(date) = &data.date {
            if !date.trim().is_empty() && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                result.add_error("date", "Date must be in YYYY-MM-DD format");
            }
        }

        result
    }
}
