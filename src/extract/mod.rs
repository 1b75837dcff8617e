//! Resource flattening - fixed-path field extraction into [`FlatRecord`]s.
//!
//! Each field of the flat record is produced by an independent,
//! side-effect-free lookup over the resource JSON; absent or malformed
//! source data flattens to empty defaults.

pub mod extensions;
pub mod extractor;
pub mod paths;
pub mod types;

pub use extensions::{
    extension_manifestations, format_coding, format_coding_who_stripped, ResourceExtension,
    RiskCategory, RiskCodes, ALLERGY_MANIFESTATION_URL, CODING_SEPARATOR,
    SUBSTANCE_EXPOSURE_RISK_URL, WHO_ATC_PREFIX,
};
pub use extractor::{flatten_resource, Extraction};
pub use types::{FieldValue, FlatRecord, EXPLODE_COLUMNS};
