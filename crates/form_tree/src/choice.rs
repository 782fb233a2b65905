//! Value/label pairs offered by choice-style fields (selects, radios).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single selectable option.
///
/// Options are plain data and carry no tree links; `Clone` yields a snapshot
/// that does not follow later edits of the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: Value,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the option as not selectable.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}
