//! Data module - dataset loading, reshaping and filtering

mod loader;
mod processor;
mod record;
mod table;

pub use loader::DataLoader;
pub use processor::{DataProcessor, ProcessorError};
pub use record::{RawRecord, RecordKey};
pub use table::{Observation, ShapedTable};

/// Column names shared by the raw payload and the Shaped Table.
pub mod columns {
    pub use super::record::{
        DATA_SOURCE, LOCATION_ABBR, LOCATION_DESC, STRATIFICATION_CATEGORY, VALUE_TYPE, YEAR,
    };
    pub use super::table::{DEMOGRAPHIC, KEY_COLUMNS};
}
