/// Request body validation
///
/// Each request body type implements [`RequestSchema`], which turns a raw
/// JSON value into the typed request or a list of field-level issues:
///
/// 1. serde checks the shape (required fields, types, enum values)
/// 2. `validator` checks the rules declared on the struct
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use taskboard_api::validation::RequestSchema;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Rename {
///     #[validate(length(min = 1, message = "Name is required"))]
///     name: String,
/// }
///
/// impl RequestSchema for Rename {}
///
/// let issues = Rename::parse(json!({ "name": "" })).err().unwrap();
/// assert_eq!(issues[0].field, "name");
/// ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// One violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Offending field (empty when the whole body is at fault)
    pub field: String,

    /// Machine-readable rule name (e.g. `length`, `email`, `invalid_type`)
    pub code: String,

    /// Human-readable explanation
    pub message: String,
}

impl ValidationIssue {
    /// Converts a serde shape error into an issue
    ///
    /// serde reports missing fields as "missing field `name`"; that name is
    /// lifted into `field`.
    pub fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();

        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(field) = rest.split('`').next() {
                return Self {
                    field: field.to_string(),
                    code: "required".to_string(),
                    message: "Required".to_string(),
                };
            }
        }

        Self {
            field: String::new(),
            code: "invalid_type".to_string(),
            message,
        }
    }
}

/// Flattens validator errors into issues, sorted by field
pub fn issues_from(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationIssue {
                field: field.to_string(),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    issues.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    issues
}

/// Deserializes an optional field that may be omitted but never `null`
///
/// Pair with `#[serde(default)]`: an absent field stays `None`, while an
/// explicit `null` fails with serde's "invalid type: null" error.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A request body that can be checked against its schema
pub trait RequestSchema: DeserializeOwned + Validate + Sized {
    /// Parses and validates a raw JSON body
    ///
    /// # Errors
    ///
    /// Returns every issue found. A shape error stops before rule checks.
    fn parse(raw: Value) -> Result<Self, Vec<ValidationIssue>> {
        let parsed: Self =
            serde_json::from_value(raw).map_err(|e| vec![ValidationIssue::from_serde(&e)])?;

        parsed.validate().map_err(|e| issues_from(&e))?;

        Ok(parsed)
    }
}
