//! Dropdown selection values.

use serde::Deserialize;

/// Dropdown value meaning "no filter applied".
pub const NO_SELECTION: &str = "No Selection";

/// A dropdown value: either the sentinel or a concrete year/indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Selection {
    #[default]
    NoSelection,
    Value(String),
}

impl Selection {
    /// The concrete value, or `None` for the sentinel.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::NoSelection => None,
            Selection::Value(v) => Some(v),
        }
    }
}

impl From<&str> for Selection {
    fn from(raw: &str) -> Self {
        // A cleared dropdown sends an empty value.
        if raw.is_empty() || raw == NO_SELECTION {
            Selection::NoSelection
        } else {
            Selection::Value(raw.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(raw: String) -> Self {
        Selection::from(raw.as_str())
    }
}
