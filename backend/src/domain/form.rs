//! Field-level validation feedback for submitted forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Error;

/// Validation messages keyed by form field name.
///
/// Keys are sorted so the JSON echo is stable.
///
/// # Examples
/// ```
/// use blog::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// errors.add("text", "This field is required.");
/// assert!(!errors.is_empty());
/// assert_eq!(errors.get("text"), Some(&["This field is required.".to_owned()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Record `message` against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Whether `field` has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Succeed with `value` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// A rejected submission: the input as received plus what was wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidForm<F> {
    /// The submitted values, echoed back for redisplay.
    pub form: F,
    /// Per-field messages.
    pub errors: FieldErrors,
}

impl<F: Serialize> InvalidForm<F> {
    /// Convert into an `invalid_request` error whose details carry the echo.
    ///
    /// Used by JSON-only surfaces such as the admin endpoints.
    #[must_use]
    pub fn into_error(self) -> Error {
        let details = serde_json::to_value(&self).unwrap_or(Value::Null);
        Error::invalid_request("submitted form is invalid").with_details(details)
    }
}
