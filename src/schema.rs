//! Response validation against the API contract
//!
//! Every payload is first deserialized structurally (serde) and then checked
//! for domain constraints serde cannot express. Both stages report
//! `ValidationIssue`s; the caller decides whether a failure is fatal.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{TransportError, ValidationError, ValidationIssue};
use crate::models::{Category, ExternalRestaurant, OpenStatus, PriceRange};

/// An entity with a known JSON shape.
pub trait Schema: DeserializeOwned {
    /// Name used in error messages and logs.
    const ENTITY: &'static str;

    /// Domain constraints checked after structural deserialization.
    fn check(&self) -> Vec<ValidationIssue> {
        Vec::new()
    }
}

impl Schema for Category {
    const ENTITY: &'static str = "category";
}

impl Schema for PriceRange {
    const ENTITY: &'static str = "price range";
}

impl Schema for OpenStatus {
    const ENTITY: &'static str = "open status";
}

impl Schema for ExternalRestaurant {
    const ENTITY: &'static str = "restaurant";

    fn check(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if !self.rating.is_finite() {
            issues.push(ValidationIssue::new("rating", "must be a finite number"));
        }
        if !self.delivery_time_minutes.is_finite() || self.delivery_time_minutes < 0.0 {
            issues.push(ValidationIssue::new(
                "delivery_time_minutes",
                format!(
                    "must be a non-negative number, got {}",
                    self.delivery_time_minutes
                ),
            ));
        }
        issues
    }
}

/// Validate a single entity.
pub fn validate<T: Schema>(value: Value) -> Result<T, ValidationError> {
    validate_entity::<T>(value).map_err(|issues| ValidationError::new(T::ENTITY, issues))
}

/// Validate a list of entities. One bad element fails the whole list.
pub fn validate_list<T: Schema>(value: Value) -> Result<Vec<T>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ValidationError::single(
                T::ENTITY,
                ValidationIssue::new("", format!("expected an array, found {}", kind_of(&other))),
            ))
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    let mut issues = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match validate_entity::<T>(item) {
            Ok(entity) => parsed.push(entity),
            Err(item_issues) => {
                let prefix = format!("[{}]", index);
                issues.extend(item_issues.into_iter().map(|i| i.nested_under(&prefix)));
            }
        }
    }

    if issues.is_empty() {
        Ok(parsed)
    } else {
        Err(ValidationError::new(T::ENTITY, issues))
    }
}

/// Pull a wrapper key out of a response envelope.
///
/// An absent or `null` key is a transport-class failure, not an empty result.
pub fn extract_field(body: Value, field: &'static str) -> Result<Value, TransportError> {
    match body {
        Value::Object(mut map) => match map.remove(field) {
            None | Some(Value::Null) => Err(TransportError::MissingField { field }),
            Some(value) => Ok(value),
        },
        _ => Err(TransportError::MissingField { field }),
    }
}

fn validate_entity<T: Schema>(value: Value) -> Result<T, Vec<ValidationIssue>> {
    if !value.is_object() {
        return Err(vec![ValidationIssue::new(
            "",
            format!("expected an object, found {}", kind_of(&value)),
        )]);
    }

    let entity: T = serde_json::from_value(value)
        .map_err(|e| vec![ValidationIssue::new("", e.to_string())])?;

    let issues = entity.check();
    if issues.is_empty() {
        Ok(entity)
    } else {
        Err(issues)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
