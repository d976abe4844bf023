//! Control Panel Module
//! Dropdown options for the year and health indicator controls.

use crate::charts::NO_SELECTION;
use crate::data::ShapedTable;
use serde::Serialize;

/// Public page of the dataset, linked from the dashboard.
pub const SOURCE_LINK: &str =
    "https://data.cdc.gov/Chronic-Disease-Indicators/U-S-Chronic-Disease-Indicators-CDI-/g4ie-h725/about_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    fn new(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// Options for both dropdowns, each led by the "No Selection" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlPanel {
    pub years: Vec<DropdownOption>,
    pub indicators: Vec<DropdownOption>,
    pub default_value: &'static str,
    pub source_link: &'static str,
}

impl ControlPanel {
    pub fn from_table(table: &ShapedTable) -> Self {
        let with_sentinel = |values: Vec<DropdownOption>| {
            let mut options = Vec::with_capacity(values.len() + 1);
            options.push(DropdownOption::new(NO_SELECTION));
            options.extend(values);
            options
        };

        Self {
            years: with_sentinel(
                table
                    .years()
                    .iter()
                    .map(|y| DropdownOption::new(y))
                    .collect(),
            ),
            indicators: with_sentinel(
                table
                    .indicators()
                    .iter()
                    .map(|i| DropdownOption::new(i))
                    .collect(),
            ),
            default_value: NO_SELECTION,
            source_link: SOURCE_LINK,
        }
    }
}

#[cfg(test)]
#[path = "control_panel_test.rs"]
mod tests;
