//! Nastran bulk data reader and writer.
//!
//! Parses small-field bulk data text into typed entries and writes them back:
//!
//! - [`field`]: fixed-width column codec (absent vs present, real formatting)
//! - [`entries`]: one type per supported card (GRID, CROD, CONROD, PROD, MAT1,
//!   FORCE, SPC, RBE2) and the [`BulkDataEntry`] sum type
//! - [`section`]: [`BulkDataSection`], the ordered entry list read from a deck

pub mod entries;
pub mod error;
pub mod field;
pub mod section;

pub use entries::{
    BulkDataEntry, Conrod, Crod, Force, Grid, Mat1, Prod, Rbe2, Spc, component_digits,
};
pub use error::{BulkError, Result};
pub use field::{CardLayout, FIELD_WIDTH, Field, FieldValue, RawCard, format_card, format_real, parse_real};
pub use section::BulkDataSection;
