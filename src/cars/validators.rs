// src/cars/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

pub struct CarValidator;

fn validate_year(result: &mut ValidationResult, year: i64) {
    if !(1900..=2100).contains(&year) {
        result.add_error("year", "Year must be between 1900 and 2100");
    }
}

fn validate_mileage(result: &mut ValidationResult, mileage: i64) {
    if mileage < 0 {
        result.add_error("mileageAtStart", "Starting mileage cannot be negative");
    }
}

impl Validator<CreateCarRequest> for CarValidator {
    fn validate(&self, data: &CreateCarRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Car name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Car name must be less than 255 characters");
        }

        if let Some(year) = data.year {
            validate_year(&mut result, year);
        }

        if let Some(mileage) = data.mileage_at_start {
            validate_mileage(&mut result, mileage);
        }

        result
    }
}

impl Validator<UpdateCarRequest> for CarValidator {
    fn validate(&self, data: &UpdateCarRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if name.len() > 255 {
                result.add_error("name", "Car name must be less than 255 characters");
            }
        }

        if let Some(year) = data.year {
            validate_year(&mut result, year);
        }

        if let Some(mileage) = data.mileage_at_start {
            validate_mileage(&mut result, mileage);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name() {
        let result = CarValidator.validate(&CreateCarRequest {
            name: "  ".to_string(),
            brand: None,
            model: None,
            year: None,
            fuel_type: None,
            mileage_at_start: None,
            image_data: None,
        });
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "name");
    }

    #[test]
    fn test_create_rejects_out_of_range_year() {
        let result = CarValidator.validate(&CreateCarRequest {
            name: "My Tesla".to_string(),
            brand: Some("Tesla".to_string()),
            model: Some("Model S".to_string()),
            year: Some(1850),
            fuel_type: Some("ice".to_string()),
            mileage_at_start: Some(-5),
            image_data: None,
        });
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_update_with_no_fields_is_valid() {
        let result = CarValidator.validate(&UpdateCarRequest::default());
        assert!(result.is_valid);
    }
}
