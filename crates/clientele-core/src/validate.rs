// ── Field validation rules ──
//
// Named rules shared by the coordinator's pre-flight checks and any
// view adapter that wants to validate as the user types. A failed
// check never reaches the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{AddressInput, CustomerInput};

/// Ten digits, nothing else.
pub static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("Invalid regex"));

/// Six digits, nothing else.
pub static PIN_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("Invalid regex"));

/// A single field-attributable violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects violations in field order.
#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn required(&mut self, field: &'static str, value: &str, message: &'static str) -> bool {
        if value.trim().is_empty() {
            self.0.push(FieldError { field, message });
            return false;
        }
        true
    }

    fn pattern(&mut self, field: &'static str, value: &str, rule: &Regex, message: &'static str) {
        if !rule.is_match(value) {
            self.0.push(FieldError { field, message });
        }
    }

    fn finish(self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation { errors: self.0 })
        }
    }
}

pub fn customer(input: &CustomerInput) -> Result<(), CoreError> {
    let mut v = Violations::default();
    v.required("first_name", &input.first_name, "First name is required.");
    v.required("last_name", &input.last_name, "Last name is required.");
    if v.required("phone_number", &input.phone_number, "Phone number is required.") {
        v.pattern(
            "phone_number",
            &input.phone_number,
            &PHONE_NUMBER,
            "Phone number must be 10 digits.",
        );
    }
    v.finish()
}

pub fn address(input: &AddressInput) -> Result<(), CoreError> {
    let mut v = Violations::default();
    v.required("address_details", &input.address_details, "Address is required.");
    v.required("city", &input.city, "City is required.");
    v.required("state", &input.state, "State is required.");
    if v.required("pin_code", &input.pin_code, "Pin code is required.") {
        v.pattern("pin_code", &input.pin_code, &PIN_CODE, "Pin code must be 6 digits.");
    }
    v.finish()
}
