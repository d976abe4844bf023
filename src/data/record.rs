//! Raw Record Module
//! One observation of the CDI dataset as returned by the Socrata API.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const YEAR: &str = "yearend";
pub const LOCATION_ABBR: &str = "locationabbr";
pub const LOCATION_DESC: &str = "locationdesc";
pub const DATA_SOURCE: &str = "datasource";
pub const VALUE_TYPE: &str = "datavaluetype";
pub const STRATIFICATION_CATEGORY: &str = "stratificationcategoryid1";

/// A single row of the remote dataset, restricted to the columns the
/// dashboard uses. Any other column in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub yearend: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locationabbr: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locationdesc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub datasource: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub datavaluetype: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub datavalue: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stratification1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stratificationcategoryid1: Option<String>,
}

/// Composite key of a Shaped Table row.
///
/// Field order is the sort order of the table: year, location abbreviation and
/// location name first, the remaining fields only break ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub year: String,
    pub location_abbr: String,
    pub location_desc: String,
    pub data_source: String,
    pub value_type: String,
    pub stratification: String,
    pub stratification_category: String,
}

impl RawRecord {
    /// Composite key, or `None` when any key field is missing.
    pub fn key(&self) -> Option<RecordKey> {
        Some(RecordKey {
            year: self.yearend.clone()?,
            location_abbr: self.locationabbr.clone()?,
            location_desc: self.locationdesc.clone()?,
            data_source: self.datasource.clone()?,
            value_type: self.datavaluetype.clone()?,
            stratification: self.stratification1.clone()?,
            stratification_category: self.stratificationcategoryid1.clone()?,
        })
    }
}

/// Socrata serves every column as a string, but hand-made dumps often carry
/// bare numbers. Accept both and keep the textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
