//! Base contract system

use staff_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Validates an input value before it is applied
pub trait Contract<T>: Send + Sync {
    fn validate(&self, input: &T) -> ValidationResult;
}

/// Convert `validator` derive output into the crate-wide error collection.
///
/// Field names are reported in camelCase, as they appear in request bodies.
pub fn from_validator(errors: &validator::ValidationErrors) -> ValidationErrors {
    let mut out = ValidationErrors::new();
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    for (field, field_errors) in fields {
        let name = camel_case(field);
        for error in field_errors {
            let message = match error.message {
                Some(ref message) => message.to_string(),
                None => describe(&error.code),
            };
            out.add(name.clone(), message);
        }
    }
    out
}

fn describe(code: &str) -> String {
    match code {
        "length" => "has an invalid length".to_string(),
        "range" => "is out of range".to_string(),
        "email" => "is not a valid email".to_string(),
        other => format!("is invalid ({other})"),
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Collapse an accumulated error set into a result
pub fn finish(errors: ValidationErrors) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
