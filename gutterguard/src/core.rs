//! Core sizing logic shared by the CLI and any other front end.
//! No I/O beyond optional options/table files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::conductor::{ConductorEntry, EntryInput};
use crate::tables::{builtin_tables, ReferenceTables};

/// Maximum share of the enclosure cross-section conductors may fill (NEC 366.22).
pub const FILL_RATIO: f64 = 0.2;

/// Standard square gutter sizes in inches, ascending.
pub const STANDARD_SIZES: [u32; 8] = [4, 6, 8, 10, 12, 16, 20, 24];

#[derive(Debug, thiserror::Error)]
pub enum SizingError {
    #[error("Unknown conductor size: {0}")]
    UnknownConductorSize(String),
    #[error("Invalid reference table: {0}")]
    InvalidTable(String),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("Import error: {0}")]
    Import(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for a sizing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingOptions {
    pub fill_ratio: f64,
    pub standard_sizes: Vec<u32>,
    /// Replacement reference table; the built-in table is used when unset.
    pub tables: Option<PathBuf>,
}

impl Default for SizingOptions {
    fn default() -> Self {
        Self {
            fill_ratio: FILL_RATIO,
            standard_sizes: STANDARD_SIZES.to_vec(),
            tables: None,
        }
    }
}

impl SizingOptions {
    /// Read options from a JSON file. Missing keys take their defaults; a
    /// relative `tables` path is taken relative to the options file.
    pub fn from_file(path: &Path) -> Result<Self, SizingError> {
        let content = std::fs::read_to_string(path)?;
        let mut options: SizingOptions = serde_json::from_str(&content)
            .map_err(|e| SizingError::InvalidOptions(format!("{}: {}", path.display(), e)))?;
        options.validate()?;
        if let (Some(tables), Some(dir)) = (options.tables.as_mut(), path.parent()) {
            if tables.is_relative() {
                *tables = dir.join(&*tables);
            }
        }
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        if !(self.fill_ratio.is_finite() && self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return Err(SizingError::InvalidOptions(format!(
                "fill_ratio must be in (0, 1], got {}",
                self.fill_ratio
            )));
        }
        if self.standard_sizes.is_empty() {
            return Err(SizingError::InvalidOptions(
                "standard_sizes must not be empty".to_string(),
            ));
        }
        if self.standard_sizes.contains(&0) {
            return Err(SizingError::InvalidOptions(
                "standard_sizes must not contain 0".to_string(),
            ));
        }
        if !self.standard_sizes.windows(2).all(|w| w[0] < w[1]) {
            return Err(SizingError::InvalidOptions(
                "standard_sizes must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the table these options point at, if any.
    pub fn load_tables(&self) -> Result<Option<ReferenceTables>, SizingError> {
        self.tables
            .as_deref()
            .map(ReferenceTables::from_file)
            .transpose()
    }
}

/// Figures produced by one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Sum of conductor areas in square inches
    pub total_area: f64,
    /// Enclosure cross-section needed to stay within the fill ratio, sq in
    pub min_cross_section: f64,
    /// Largest bending space among the entered sizes, inches
    pub min_bending_space: f64,
    /// Side of a square meeting the cross-section, rounded up to whole inches
    pub min_dimension: f64,
    /// Larger of `min_dimension` and `min_bending_space`
    pub min_required_side: f64,
    pub recommended_size: Option<u32>,
    pub requires_custom_size: bool,
}

impl SizingResult {
    /// `"NxN"` for a standard recommendation.
    pub fn recommended_label(&self) -> Option<String> {
        self.recommended_size.map(|s| format!("{}x{}", s, s))
    }
}

/// Smallest standard size that is at least `min_side`.
pub fn select_standard_size(min_side: f64, standard_sizes: &[u32]) -> Option<u32> {
    standard_sizes
        .iter()
        .copied()
        .find(|&size| f64::from(size) >= min_side)
}

/// Sizing API over a set of reference tables.
#[derive(Debug, Clone)]
pub struct SizingEngine<'a> {
    tables: &'a ReferenceTables,
    fill_ratio: f64,
    standard_sizes: Vec<u32>,
}

impl SizingEngine<'static> {
    /// Engine over the built-in NEC tables with default options.
    pub fn builtin() -> Result<Self, SizingError> {
        Ok(Self::new(builtin_tables()?))
    }
}

impl<'a> SizingEngine<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            fill_ratio: FILL_RATIO,
            standard_sizes: STANDARD_SIZES.to_vec(),
        }
    }

    /// Apply fill ratio and standard sizes from `options`. The `tables` path
    /// in the options is not read here; see [`SizingOptions::load_tables`].
    pub fn with_options(
        tables: &'a ReferenceTables,
        options: &SizingOptions,
    ) -> Result<Self, SizingError> {
        options.validate()?;
        Ok(Self {
            tables,
            fill_ratio: options.fill_ratio,
            standard_sizes: options.standard_sizes.clone(),
        })
    }

    pub fn tables(&self) -> &ReferenceTables {
        self.tables
    }

    pub fn fill_ratio(&self) -> f64 {
        self.fill_ratio
    }

    pub fn standard_sizes(&self) -> &[u32] {
        &self.standard_sizes
    }

    /// Compute the recommended enclosure size for `entries`.
    ///
    /// Every entry's size must be in the tables, whatever its quantity.
    pub fn compute(&self, entries: &[ConductorEntry]) -> Result<SizingResult, SizingError> {
        let mut total_area = 0.0;
        let mut max_bending_space: f64 = 0.0;

        for entry in entries {
            let spec = self.tables.get(entry.size)?;
            total_area += spec.area_sq_in * f64::from(entry.quantity);
            // Zero-quantity rows still set the bending space.
            max_bending_space = max_bending_space.max(spec.bending_space_in);
        }

        let min_cross_section = total_area / self.fill_ratio;
        let min_dimension = min_cross_section.sqrt().ceil();
        let min_required_side = min_dimension.max(max_bending_space);
        let recommended_size = select_standard_size(min_required_side, &self.standard_sizes);
        let requires_custom_size = recommended_size.is_none();

        tracing::debug!(
            entries = entries.len(),
            total_area,
            min_cross_section,
            min_dimension,
            max_bending_space,
            "Computed gutter size {:?}",
            recommended_size
        );
        if requires_custom_size {
            tracing::warn!(
                "Required side {} in exceeds largest standard size; custom enclosure required",
                min_required_side
            );
        }

        Ok(SizingResult {
            total_area,
            min_cross_section,
            min_bending_space: max_bending_space,
            min_dimension,
            min_required_side,
            recommended_size,
            requires_custom_size,
        })
    }

    /// Resolve raw rows, then compute. Stops at the first unknown size.
    pub fn compute_input(&self, rows: &[EntryInput]) -> Result<SizingResult, SizingError> {
        let entries = rows
            .iter()
            .map(EntryInput::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        self.compute(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::ConductorSize;

    fn engine() -> SizingEngine<'static> {
        SizingEngine::builtin().unwrap()
    }

    #[test]
    fn test_select_standard_size() {
        assert_eq!(select_standard_size(0.0, &STANDARD_SIZES), Some(4));
        assert_eq!(select_standard_size(4.0, &STANDARD_SIZES), Some(4));
        assert_eq!(select_standard_size(4.5, &STANDARD_SIZES), Some(6));
        assert_eq!(select_standard_size(13.0, &STANDARD_SIZES), Some(16));
        assert_eq!(select_standard_size(24.0, &STANDARD_SIZES), Some(24));
        assert_eq!(select_standard_size(25.0, &STANDARD_SIZES), None);
        assert_eq!(select_standard_size(1.0, &[]), None);
    }

    #[test]
    fn test_empty_entries() {
        let result = engine().compute(&[]).unwrap();
        assert_eq!(result.total_area, 0.0);
        assert_eq!(result.min_cross_section, 0.0);
        assert_eq!(result.min_dimension, 0.0);
        assert_eq!(result.min_bending_space, 0.0);
        assert_eq!(result.recommended_size, Some(4));
        assert!(!result.requires_custom_size);
    }

    #[test]
    fn test_bending_space_drives_size() {
        // One 1000 kcmil: area alone needs 3", bending space needs 10".
        let result = engine()
            .compute(&[ConductorEntry::new(ConductorSize::Kcmil1000, 1)])
            .unwrap();
        assert_eq!(result.min_dimension, 3.0);
        assert_eq!(result.min_bending_space, 10.0);
        assert_eq!(result.min_required_side, 10.0);
        assert_eq!(result.recommended_size, Some(10));
    }

    #[test]
    fn test_half_inch_bending_space_rounds_up() {
        let result = engine()
            .compute(&[ConductorEntry::new(ConductorSize::Kcmil250, 1)])
            .unwrap();
        assert_eq!(result.min_bending_space, 4.5);
        assert_eq!(result.recommended_size, Some(6));
    }

    #[test]
    fn test_zero_quantity_counts_for_bending_only() {
        let with_zero = engine()
            .compute(&[
                ConductorEntry::new(ConductorSize::Awg12, 2),
                ConductorEntry::new(ConductorSize::Kcmil600, 0),
            ])
            .unwrap();
        let without = engine()
            .compute(&[ConductorEntry::new(ConductorSize::Awg12, 2)])
            .unwrap();
        assert_eq!(with_zero.total_area, without.total_area);
        assert_eq!(with_zero.min_bending_space, 8.0);
        assert_eq!(with_zero.recommended_size, Some(8));
        assert_eq!(without.recommended_size, Some(4));
    }

    #[test]
    fn test_unknown_size_in_partial_table() {
        let tables = ReferenceTables::from_json_str(
            r#"{"edition":"partial","conductors":[
                {"size":"12","area_sq_in":0.0133,"bending_space_in":1.5}
            ]}"#,
        )
        .unwrap();
        let engine = SizingEngine::new(&tables);
        let err = engine
            .compute(&[
                ConductorEntry::new(ConductorSize::Awg12, 1),
                ConductorEntry::new(ConductorSize::Awg10, 0),
            ])
            .unwrap_err();
        assert!(matches!(err, SizingError::UnknownConductorSize(_)));
    }

    #[test]
    fn test_compute_input_unknown_size() {
        let err = engine()
            .compute_input(&[EntryInput::new("12", "1"), EntryInput::new("7/0", "1")])
            .unwrap_err();
        assert!(matches!(err, SizingError::UnknownConductorSize(ref s) if s == "7/0"));
    }

    #[test]
    fn test_custom_fill_ratio_and_sizes() {
        let tables = builtin_tables().unwrap();
        let options = SizingOptions {
            fill_ratio: 0.4,
            standard_sizes: vec![6, 12],
            tables: None,
        };
        let engine = SizingEngine::with_options(tables, &options).unwrap();
        // 20 x 4/0 = 6.474 sq in; / 0.4 = 16.185; sqrt -> 4.02 -> 5
        let result = engine
            .compute(&[ConductorEntry::new(ConductorSize::Awg4_0, 20)])
            .unwrap();
        assert!((result.min_cross_section - result.total_area / 0.4).abs() < 1e-12);
        assert_eq!(result.min_dimension, 5.0);
        assert_eq!(result.recommended_size, Some(6));
    }

    #[test]
    fn test_options_validation() {
        let mut options = SizingOptions::default();
        assert!(options.validate().is_ok());

        options.fill_ratio = 0.0;
        assert!(options.validate().is_err());
        options.fill_ratio = 1.5;
        assert!(options.validate().is_err());

        let mut options = SizingOptions::default();
        options.standard_sizes = vec![];
        assert!(options.validate().is_err());
        options.standard_sizes = vec![6, 4];
        assert!(options.validate().is_err());
        options.standard_sizes = vec![0, 4];
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_recommended_label() {
        let result = engine()
            .compute(&[ConductorEntry::new(ConductorSize::Awg2, 1)])
            .unwrap();
        assert_eq!(result.recommended_label().as_deref(), Some("4x4"));
    }
}
