//! Built-in Reference Table
//!
//! The NEC table is compiled into the binary from `tables/nec_2023.json` and
//! parsed once per process on first use.

use std::sync::OnceLock;

use super::ReferenceTables;
use crate::core::SizingError;

const EMBEDDED_NEC_2023: &str = include_str!("../../tables/nec_2023.json");

static BUILTIN: OnceLock<Result<ReferenceTables, String>> = OnceLock::new();

/// Get the built-in reference tables.
pub fn builtin_tables() -> Result<&'static ReferenceTables, SizingError> {
    BUILTIN
        .get_or_init(|| {
            ReferenceTables::from_json_str(EMBEDDED_NEC_2023).map_err(|e| {
                tracing::error!("Failed to parse embedded reference table: {}", e);
                e.to_string()
            })
        })
        .as_ref()
        .map_err(|msg| SizingError::InvalidTable(msg.clone()))
}
