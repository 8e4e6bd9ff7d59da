// src/users/validators.rs

use regex::Regex;

use super::models::*;
use crate::common::{ValidationResult, Validator};

const MIN_PASSWORD_LENGTH: usize = 8;

fn is_valid_email(email: &str) -> bool {
    // Intentionally permissive; the mail provider has the last word.
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex");
    re.is_match(email)
}

fn validate_password(result: &mut ValidationResult, password: &str) {
    if password.len() < MIN_PASSWORD_LENGTH {
        result.add_error("password", "Password must be at least 8 characters");
    }
}

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email address is not valid");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        } else {
            validate_password(&mut result, &data.password);
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        }
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

pub struct UpdateUserValidator;

impl Validator<UpdateUserRequest> for UpdateUserValidator {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate email if provided (blank values are treated as absent)
        if let Some(email) = &data.email {
            if !email.trim().is_empty() && !is_valid_email(email) {
                result.add_error("email", "Email address is not valid");
            }
        }

        // Validate password if provided
        if let Some(password) = &data.password {
            if !password.is_empty() {
                validate_password(&mut result, password);
            }
        }

        result
    }
}
