//! Reference Tables
//!
//! Conductor cross-sectional area and minimum bending space per conductor
//! size. The built-in table ships as an embedded JSON asset (see
//! [`builtin`]); replacement tables in the same format can be loaded from
//! disk for review against other code editions.
//!
//! # Format
//!
//! ```json
//! {
//!   "edition": "NEC 2023",
//!   "area_reference": "NEC Chapter 9, Table 5",
//!   "bending_reference": "NEC Table 312.6(A)",
//!   "conductors": [
//!     { "size": "14", "area_sq_in": 0.0097, "bending_space_in": 1.5 }
//!   ]
//! }
//! ```

pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::conductor::ConductorSize;
use crate::core::SizingError;

pub use builtin::builtin_tables;

/// Area and bending space for one conductor size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    /// Cross-sectional area in square inches
    pub area_sq_in: f64,
    /// Minimum wire bending space at terminals in inches
    pub bending_space_in: f64,
}

/// One row of the on-disk table format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableRow {
    size: ConductorSize,
    #[serde(flatten)]
    spec: ConductorSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableFile {
    edition: String,
    #[serde(default)]
    area_reference: String,
    #[serde(default)]
    bending_reference: String,
    conductors: Vec<TableRow>,
}

/// Validated, immutable lookup tables keyed by conductor size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTables {
    edition: String,
    area_reference: String,
    bending_reference: String,
    conductors: BTreeMap<ConductorSize, ConductorSpec>,
}

impl ReferenceTables {
    /// Parse and validate a table from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SizingError> {
        let file: TableFile = serde_json::from_str(json)?;
        Self::from_table_file(file)
    }

    /// Load a replacement table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SizingError> {
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_json_str(&content).map_err(|e| match e {
            SizingError::Json(err) => {
                SizingError::InvalidTable(format!("{}: {}", path.display(), err))
            }
            other => other,
        })?;
        tracing::info!(
            "Loaded reference table {:?} ({} sizes) from {}",
            tables.edition,
            tables.len(),
            path.display()
        );
        Ok(tables)
    }

    fn from_table_file(file: TableFile) -> Result<Self, SizingError> {
        if file.edition.trim().is_empty() {
            return Err(SizingError::InvalidTable("edition must not be empty".to_string()));
        }

        let mut conductors = BTreeMap::new();
        for row in file.conductors {
            let ConductorSpec {
                area_sq_in,
                bending_space_in,
            } = row.spec;
            if !(area_sq_in.is_finite() && area_sq_in > 0.0) {
                return Err(SizingError::InvalidTable(format!(
                    "area for {} must be positive, got {}",
                    row.size, area_sq_in
                )));
            }
            if !(bending_space_in.is_finite() && bending_space_in > 0.0) {
                return Err(SizingError::InvalidTable(format!(
                    "bending space for {} must be positive, got {}",
                    row.size, bending_space_in
                )));
            }
            if conductors.insert(row.size, row.spec).is_some() {
                return Err(SizingError::InvalidTable(format!(
                    "duplicate entry for size {}",
                    row.size
                )));
            }
        }

        Ok(Self {
            edition: file.edition,
            area_reference: file.area_reference,
            bending_reference: file.bending_reference,
            conductors,
        })
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn area_reference(&self) -> &str {
        &self.area_reference
    }

    pub fn bending_reference(&self) -> &str {
        &self.bending_reference
    }

    pub fn len(&self) -> usize {
        self.conductors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conductors.is_empty()
    }

    /// Look up both figures for a size. Sizes missing from the table are an
    /// error, never a zero.
    pub fn get(&self, size: ConductorSize) -> Result<&ConductorSpec, SizingError> {
        self.conductors
            .get(&size)
            .ok_or_else(|| SizingError::UnknownConductorSize(size.as_str().to_string()))
    }

    pub fn area(&self, size: ConductorSize) -> Result<f64, SizingError> {
        self.get(size).map(|spec| spec.area_sq_in)
    }

    pub fn bending_space(&self, size: ConductorSize) -> Result<f64, SizingError> {
        self.get(size).map(|spec| spec.bending_space_in)
    }

    /// Rows in ascending conductor order.
    pub fn iter(&self) -> impl Iterator<Item = (ConductorSize, &ConductorSpec)> {
        self.conductors.iter().map(|(size, spec)| (*size, spec))
    }
}
