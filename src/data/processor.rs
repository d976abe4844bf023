//! Data Processor Module
//! Reshapes Raw Records into the wide Shaped Table (pivot operation).

use crate::data::columns::KEY_COLUMNS;
use crate::data::{RawRecord, RecordKey, ShapedTable};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown health indicator: {0}")]
    UnknownIndicator(String),
}

/// Handles the one-time reshape of the fetched dataset.
pub struct DataProcessor;

impl DataProcessor {
    /// Pivot records into one row per composite key and one column per
    /// indicator.
    ///
    /// Within a key, the first record carrying a value for an indicator wins.
    /// Rows come out sorted by year, location abbreviation and location name,
    /// with the remaining key fields breaking ties. Records missing a key field
    /// or the indicator name are skipped. Empty input gives an empty table.
    pub fn shape(records: &[RawRecord]) -> Result<ShapedTable, ProcessorError> {
        // BTreeMap keeps the groups in key order, which is the output order.
        let mut groups: BTreeMap<RecordKey, HashMap<&str, &str>> = BTreeMap::new();
        let mut indicators: BTreeSet<&str> = BTreeSet::new();
        let mut skipped = 0usize;

        for record in records {
            let (Some(key), Some(question)) = (record.key(), record.question.as_deref()) else {
                skipped += 1;
                continue;
            };

            indicators.insert(question);
            let cells = groups.entry(key).or_default();
            if let Some(value) = record.datavalue.as_deref() {
                cells.entry(question).or_insert(value);
            }
        }

        if skipped > 0 {
            debug!(skipped, "records missing key fields were skipped");
        }

        let height = groups.len();
        let mut years = Vec::with_capacity(height);
        let mut location_abbrs = Vec::with_capacity(height);
        let mut location_descs = Vec::with_capacity(height);
        let mut data_sources = Vec::with_capacity(height);
        let mut value_types = Vec::with_capacity(height);
        let mut demographics = Vec::with_capacity(height);
        let mut categories = Vec::with_capacity(height);
        let mut indicator_values: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(height); indicators.len()];

        for (key, cells) in &groups {
            years.push(key.year.clone());
            location_abbrs.push(key.location_abbr.clone());
            location_descs.push(key.location_desc.clone());
            data_sources.push(key.data_source.clone());
            value_types.push(key.value_type.clone());
            demographics.push(key.stratification.clone());
            categories.push(key.stratification_category.clone());

            for (values, indicator) in indicator_values.iter_mut().zip(&indicators) {
                values.push(cells.get(indicator).map(|v| v.to_string()));
            }
        }

        let key_values = [
            years,
            location_abbrs,
            location_descs,
            data_sources,
            value_types,
            demographics,
            categories,
        ];
        let mut columns: Vec<Column> = KEY_COLUMNS
            .iter()
            .zip(key_values)
            .map(|(name, values)| Column::new((*name).into(), values))
            .collect();

        // Names already taken: key columns plus every indicator that keeps its own name.
        let mut taken: HashSet<String> = KEY_COLUMNS.iter().map(|c| c.to_string()).collect();
        taken.extend(
            indicators
                .iter()
                .filter(|i| !KEY_COLUMNS.contains(*i))
                .map(|i| i.to_string()),
        );

        let mut indicator_names = Vec::with_capacity(indicators.len());
        for (indicator, values) in indicators.iter().zip(indicator_values) {
            let name = Self::indicator_column_name(indicator, &mut taken);
            columns.push(Column::new(name.as_str().into(), values));
            indicator_names.push(name);
        }

        let df = DataFrame::new(columns)?;
        info!(
            records = records.len(),
            rows = df.height(),
            indicators = indicator_names.len(),
            "dataset shaped"
        );

        Ok(ShapedTable::new(df, indicator_names))
    }

    /// Indicator names share the column namespace with the key columns; an
    /// indicator that happens to match one is renamed to the first free
    /// `<name> (indicator)` / `<name> (indicator N)`.
    fn indicator_column_name(indicator: &str, taken: &mut HashSet<String>) -> String {
        if !KEY_COLUMNS.contains(&indicator) {
            return indicator.to_string();
        }

        let mut name = format!("{indicator} (indicator)");
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{indicator} (indicator {n})");
            n += 1;
        }
        taken.insert(name.clone());
        name
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
