// src/entries/validators.rs

use chrono::NaiveDate;

use super::models::*;
use crate::common::{ValidationResult, Validator};

fn validate_date(result: &mut ValidationResult, date: &str) {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        result.add_error("date", "Date must be in YYYY-MM-DD format");
    }
}

pub struct MileageValidator;

impl Validator<CreateMileageRequest> for MileageValidator {
    fn validate(&self, data: &CreateMileageRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.mileage < 0 {
            result.add_error("mileage", "Mileage cannot be negative");
        }
        validate_date(&mut result, &data.date);

        result
    }
}

pub struct FullTankValidator;

impl Validator<CreateFullTankRequest> for FullTankValidator {
    fn validate(&self, data: &CreateFullTankRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.quantity <= 0.0 {
            result.add_error("quantity", "Quantity must be positive");
        }
        if data.unit.trim().is_empty() {
            result.add_error("unit", "Unit is required");
        }
        if data.cost < 0.0 {
            result.add_error("cost", "Cost cannot be negative");
        }
        if data.mileage < 0 {
            result.add_error("mileage", "Mileage cannot be negative");
        }
        validate_date(&mut result, &data.date);

        result
    }
}

pub struct SpendingValidator;

impl Validator<CreateSpendingRequest> for SpendingValidator {
    fn validate(&self, data: &CreateSpendingRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.amount < 0.0 {
            result.add_error("amount", "Amount cannot be negative");
        }
        if data.spending_type.trim().is_empty() {
            result.add_error("type", "Spending type is required");
        }
        validate_date(&mut result, &data.date);

        result
    }
}
