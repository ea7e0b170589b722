//! Validation of free-form application responses against an opportunity's
//! dynamic `input_fields` schema.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::models::application::FieldResponse;
use crate::models::form::{FieldType, InputField};

#[derive(Debug, Default)]
pub struct FormValidation {
    /// Field name -> human-readable violation. All violations are collected,
    /// not just the first.
    pub errors: BTreeMap<String, String>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_message(self) -> String {
        self.errors
            .into_iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn validate(input_fields: &[InputField], responses: &[FieldResponse]) -> FormValidation {
    let values: BTreeMap<&str, &JsonValue> = responses
        .iter()
        .map(|r| (r.field_name.as_str(), &r.value))
        .collect();

    let mut result = FormValidation::default();

    for field in input_fields {
        let value = values.get(field.field_name.as_str()).copied();

        match value {
            None | Some(JsonValue::Null) => {
                if field.required {
                    result
                        .errors
                        .insert(field.field_name.clone(), "This field is required".into());
                }
            }
            Some(value) => match field.field_type {
                FieldType::Text => {
                    if field.required && is_blank(value) {
                        result
                            .errors
                            .insert(field.field_name.clone(), "This field is required".into());
                    }
                }
                // Number inputs are never rejected: non-numeric values get
                // coerced to 0 downstream. Deliberately lenient.
                FieldType::Number => {}
                FieldType::Select => {
                    if field.required && is_blank(value) {
                        result
                            .errors
                            .insert(field.field_name.clone(), "This field is required".into());
                    } else if !is_blank(value) {
                        let chosen = match value {
                            JsonValue::String(s) => s.trim().to_string(),
                            other => other.to_string(),
                        };
                        if !field.options.iter().any(|o| o == &chosen) {
                            result.errors.insert(
                                field.field_name.clone(),
                                "Value must be one of the listed options".into(),
                            );
                        }
                    }
                }
                // File responses are opaque URLs uploaded out-of-band; only
                // presence can be checked here.
                FieldType::File => {
                    if field.required && is_blank(value) {
                        result
                            .errors
                            .insert(field.field_name.clone(), "A file upload is required".into());
                    }
                }
            },
        }
    }

    result
}

/// Normalizes number-typed responses in place: numeric strings become JSON
/// numbers, anything else non-numeric becomes 0.
pub fn coerce(input_fields: &[InputField], responses: &mut [FieldResponse]) {
    for response in responses.iter_mut() {
        let Some(field) = input_fields
            .iter()
            .find(|f| f.field_name == response.field_name)
        else {
            continue;
        };
        if field.field_type != FieldType::Number {
            continue;
        }

        let coerced = match &response.value {
            JsonValue::Number(n) => JsonValue::Number(n.clone()),
            JsonValue::String(s) => match s.trim().parse::<f64>() {
                Ok(n) => serde_json::Number::from_f64(n)
                    .map(JsonValue::Number)
                    .unwrap_or_else(|| JsonValue::from(0)),
                Err(_) => JsonValue::from(0),
            },
            _ => JsonValue::from(0),
        };
        response.value = coerced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, field_type: FieldType, required: bool, options: &[&str]) -> InputField {
        InputField {
            field_name: name.into(),
            field_type,
            placeholder: None,
            required,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn response(name: &str, value: JsonValue) -> FieldResponse {
        FieldResponse {
            field_name: name.into(),
            value,
        }
    }

    #[test]
    fn missing_required_field() {
        let fields = vec![field("gpa", FieldType::Text, true, &[])];
        let result = validate(&fields, &[]);
        assert!(!result.is_valid());
        assert!(result.errors.contains_key("gpa"));
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let fields = vec![field("why_us", FieldType::Text, true, &[])];
        let result = validate(&fields, &[response("why_us", json!("   "))]);
        assert!(!result.is_valid());
    }

    #[test]
    fn optional_field_may_be_absent() {
        let fields = vec![field("portfolio", FieldType::Text, false, &[])];
        assert!(validate(&fields, &[]).is_valid());
    }

    #[test]
    fn all_violations_are_collected() {
        let fields = vec![
            field("a", FieldType::Text, true, &[]),
            field("b", FieldType::File, true, &[]),
        ];
        let result = validate(&fields, &[]);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn select_value_outside_options() {
        let fields = vec![field("shift", FieldType::Select, true, &["Day", "Night"])];
        let result = validate(&fields, &[response("shift", json!("Evening"))]);
        assert!(!result.is_valid());

        let result = validate(&fields, &[response("shift", json!("Night"))]);
        assert!(result.is_valid());
    }

    #[test]
    fn required_file_presence() {
        let fields = vec![field("resume", FieldType::File, true, &[])];
        assert!(!validate(&fields, &[response("resume", json!(""))]).is_valid());
        assert!(validate(
            &fields,
            &[response("resume", json!("https://cdn.example.com/r.pdf"))]
        )
        .is_valid());
    }

    #[test]
    fn number_coercion_defaults_to_zero() {
        let fields = vec![field("gpa", FieldType::Number, true, &[])];
        let mut responses = vec![
            response("gpa", json!("not a number")),
        ];
        coerce(&fields, &mut responses);
        assert_eq!(responses[0].value, json!(0));
    }

    #[test]
    fn numeric_string_becomes_number() {
        let fields = vec![field("gpa", FieldType::Number, true, &[])];
        let mut responses = vec![response("gpa", json!("8.5"))];
        coerce(&fields, &mut responses);
        assert_eq!(responses[0].value, json!(8.5));
    }

    #[test]
    fn coercion_leaves_other_fields_alone() {
        let fields = vec![field("gpa", FieldType::Number, true, &[])];
        let mut responses = vec![response("name", json!("Asha"))];
        coerce(&fields, &mut responses);
        assert_eq!(responses[0].value, json!("Asha"));
    }
}
