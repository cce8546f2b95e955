//! GutterGuard - gutter and wireway sizing library
//!
//! Computes the smallest standard square gutter that satisfies both the 20%
//! conductor fill rule (NEC 366.22) and the terminal bending-space
//! requirement (NEC 312.6(A)) for a list of conductors.
//!
//! # Quick Start
//!
//! ```no_run
//! use gutterguard::{compute_size, ConductorEntry, ConductorSize};
//!
//! let result = compute_size(&[
//!     ConductorEntry::new(ConductorSize::Awg4_0, 3),
//!     ConductorEntry::new(ConductorSize::Awg2, 2),
//! ])
//! .unwrap();
//!
//! match result.recommended_size {
//!     Some(size) => println!("{}x{} minimum gutter size", size, size),
//!     None => println!("custom size required"),
//! }
//! ```
//!
//! # Features
//!
//! - **Sizing engine**: fill ratio, bending space and standard-size selection
//! - **Reference tables**: embedded NEC table, replaceable from JSON
//! - **Import**: entry lists from CSV spreadsheet exports or JSON

pub mod conductor;
pub mod core;
pub mod import;
pub mod tables;

// Re-export main types
pub use conductor::{parse_quantity, ConductorEntry, ConductorSize, EntryInput};
pub use crate::core::{
    select_standard_size, SizingEngine, SizingError, SizingOptions, SizingResult, FILL_RATIO,
    STANDARD_SIZES,
};
pub use import::{load_entries_file, parse_entries_csv, parse_entries_json};
pub use tables::{builtin_tables, ConductorSpec, ReferenceTables};

/// Size a gutter for `entries` using the built-in tables (convenience wrapper).
pub fn compute_size(entries: &[ConductorEntry]) -> Result<SizingResult, SizingError> {
    SizingEngine::builtin()?.compute(entries)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        compute_size, ConductorEntry, ConductorSize, EntryInput, ReferenceTables, SizingEngine,
        SizingError, SizingOptions, SizingResult,
    };
}
