//! Data cleaning and categorical encoding

mod clean;
mod encoder;

pub use clean::{CleanConfig, CleanReport, DataCleaner, OutlierStrategy};
pub use encoder::LabelEncoder;
