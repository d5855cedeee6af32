//! Session configuration.

use serde::{Deserialize, Serialize};

/// Default name of the field that returns the unwrapped root.
pub const ORIGINAL_FIELD: &str = "easyOriginal";

/// Options for an interception session.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use easy_set::Options;
///
/// let options: Options = serde_json::from_str(r#"{"vivifyNull": false}"#).unwrap();
/// assert!(!options.vivify_null);
/// assert_eq!(options.original_field, "easyOriginal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Reading this field on any view returns the original root instead of
    /// materializing a child.
    pub original_field: String,
    /// Replace explicit `null` values with an empty mapping when they are read
    /// through, the same way absent fields are.
    pub vivify_null: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            original_field: ORIGINAL_FIELD.to_owned(),
            vivify_null: true,
        }
    }
}

impl Options {
    pub fn with_original_field(mut self, field: impl Into<String>) -> Self {
        self.original_field = field.into();
        self
    }

    pub fn with_vivify_null(mut self, vivify_null: bool) -> Self {
        self.vivify_null = vivify_null;
        self
    }
}
