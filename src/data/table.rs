//! Shaped Table Module
//! Wide-form table keyed by the composite key, one column per indicator.

use crate::data::columns::{
    DATA_SOURCE, LOCATION_ABBR, LOCATION_DESC, STRATIFICATION_CATEGORY, VALUE_TYPE, YEAR,
};
use crate::data::ProcessorError;
use polars::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Display label of the stratification column.
pub const DEMOGRAPHIC: &str = "Demographic";

/// Key columns in table order. Indicator columns follow them.
pub const KEY_COLUMNS: [&str; 7] = [
    YEAR,
    LOCATION_ABBR,
    LOCATION_DESC,
    DATA_SOURCE,
    VALUE_TYPE,
    DEMOGRAPHIC,
    STRATIFICATION_CATEGORY,
];

/// One row of a filtered view with the selected indicator coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub location_abbr: String,
    pub location_desc: String,
    pub data_source: String,
    pub value_type: String,
    pub demographic: String,
    pub value: f64,
}

/// The reshaped dataset. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ShapedTable {
    df: DataFrame,
    indicators: Vec<String>,
}

impl ShapedTable {
    pub(crate) fn new(df: DataFrame, indicators: Vec<String>) -> Self {
        Self { df, indicators }
    }

    /// Get a reference to the underlying DataFrame.
    #[cfg(test)]
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Indicator column names, in column order.
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn has_indicator(&self, name: &str) -> bool {
        self.indicators.iter().any(|i| i == name)
    }

    /// Distinct years in table order (ascending, since rows are sorted).
    pub fn years(&self) -> Vec<String> {
        let Ok(years) = self.df.column(YEAR).and_then(|c| c.str()) else {
            return Vec::new();
        };

        let mut unique: Vec<String> = Vec::new();
        for year in years.into_iter().flatten() {
            if unique.last().map(String::as_str) != Some(year) {
                unique.push(year.to_string());
            }
        }
        unique
    }

    /// Get a single cell as text; `None` for nulls and out-of-range rows.
    #[cfg(test)]
    pub fn cell(&self, row: usize, column: &str) -> Option<String> {
        let col = self.df.column(column).ok()?;
        col.str().ok()?.get(row).map(str::to_string)
    }

    /// Rows for `year` (exact match) whose `indicator` value parses as a
    /// number once surrounding whitespace is stripped. Null, non-numeric and
    /// NaN values are dropped, not reported.
    pub fn select(&self, year: &str, indicator: &str) -> Result<Vec<Observation>, ProcessorError> {
        if !self.has_indicator(indicator) {
            return Err(ProcessorError::UnknownIndicator(indicator.to_string()));
        }

        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(YEAR).eq(lit(year)))
            .with_column(col(indicator).str().strip_chars(lit(NULL)))
            .collect()?;

        let values = filtered.column(indicator)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        let abbrs = filtered.column(LOCATION_ABBR)?.str()?;
        let descs = filtered.column(LOCATION_DESC)?.str()?;
        let sources = filtered.column(DATA_SOURCE)?.str()?;
        let value_types = filtered.column(VALUE_TYPE)?.str()?;
        let demographics = filtered.column(DEMOGRAPHIC)?.str()?;

        let mut observations = Vec::new();
        for i in 0..filtered.height() {
            let Some(value) = values.get(i) else {
                continue;
            };
            if value.is_nan() {
                continue;
            }

            let text = |ca: &StringChunked| ca.get(i).unwrap_or_default().to_string();
            observations.push(Observation {
                location_abbr: text(abbrs),
                location_desc: text(descs),
                data_source: text(sources),
                value_type: text(value_types),
                demographic: text(demographics),
                value,
            });
        }

        Ok(observations)
    }

    /// Write the whole table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), ProcessorError> {
        let mut df = self.df.clone();
        CsvWriter::new(writer).include_header(true).finish(&mut df)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
