// Helper functions for building tool input schemas

use serde_json::{Value, json};

/// Korean business registration number, e.g. 123-45-67890
pub const BUSINESS_NUMBER_PATTERN: &str = r"^\d{3}-\d{2}-\d{5}$";

/// Calendar date, YYYY-MM-DD
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Closed object schema; undeclared properties are dropped before validation
#[inline]
pub fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

#[inline]
pub fn string_pattern(description: &str, pattern: &str) -> Value {
    json!({
        "type": "string",
        "pattern": pattern,
        "description": description
    })
}

#[inline]
pub fn string_length(description: &str, min_length: u32, max_length: u32) -> Value {
    json!({
        "type": "string",
        "minLength": min_length,
        "maxLength": max_length,
        "description": description
    })
}

#[inline]
pub fn string_enum(description: &str, values: &[&str], default: Option<&str>) -> Value {
    let mut schema = json!({
        "type": "string",
        "enum": values,
        "description": description
    });
    if let Some(default) = default {
        schema["default"] = json!(default);
    }
    schema
}

#[inline]
pub fn integer(description: &str, minimum: i64, maximum: Option<i64>, default: Option<i64>) -> Value {
    let mut schema = json!({
        "type": "integer",
        "minimum": minimum,
        "description": description
    });
    if let Some(maximum) = maximum {
        schema["maximum"] = json!(maximum);
    }
    if let Some(default) = default {
        schema["default"] = json!(default);
    }
    schema
}

#[inline]
pub fn boolean(description: &str, default: bool) -> Value {
    json!({
        "type": "boolean",
        "default": default,
        "description": description
    })
}

#[inline]
pub fn business_number(description: &str) -> Value {
    string_pattern(description, BUSINESS_NUMBER_PATTERN)
}

#[inline]
pub fn date(description: &str) -> Value {
    string_pattern(description, DATE_PATTERN)
}
