//! Bulk data entry kinds.
//!
//! Each supported card lives in its own module with a `parse` reading a
//! [`RawCard`] and a `to_line` writing small-field text.

mod conrod;
mod crod;
mod force;
mod grid;
mod mat1;
mod prod;
mod rbe2;
mod spc;

pub use conrod::Conrod;
pub use crod::Crod;
pub use force::Force;
pub use grid::Grid;
pub use mat1::Mat1;
pub use prod::Prod;
pub use rbe2::Rbe2;
pub use spc::{Spc, component_digits};

use crate::error::{BulkError, Result};
use crate::field::RawCard;

/// One parsed bulk data card.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkDataEntry {
    Grid(Grid),
    Crod(Crod),
    Conrod(Conrod),
    Prod(Prod),
    Mat1(Mat1),
    Force(Force),
    Spc(Spc),
    Rbe2(Rbe2),
}

impl BulkDataEntry {
    /// Dispatch on the card identifier.
    pub fn parse(card: &RawCard) -> Result<Self> {
        match card.identifier() {
            Grid::IDENTIFIER => Grid::parse(card).map(Self::Grid),
            Crod::IDENTIFIER => Crod::parse(card).map(Self::Crod),
            Conrod::IDENTIFIER => Conrod::parse(card).map(Self::Conrod),
            Prod::IDENTIFIER => Prod::parse(card).map(Self::Prod),
            Mat1::IDENTIFIER => Mat1::parse(card).map(Self::Mat1),
            Force::IDENTIFIER => Force::parse(card).map(Self::Force),
            Spc::IDENTIFIER => Spc::parse(card).map(Self::Spc),
            Rbe2::IDENTIFIER => Rbe2::parse(card).map(Self::Rbe2),
            other => Err(BulkError::UnsupportedEntry {
                identifier: other.to_string(),
                line: card.line_start(),
            }),
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Grid(_) => Grid::IDENTIFIER,
            Self::Crod(_) => Crod::IDENTIFIER,
            Self::Conrod(_) => Conrod::IDENTIFIER,
            Self::Prod(_) => Prod::IDENTIFIER,
            Self::Mat1(_) => Mat1::IDENTIFIER,
            Self::Force(_) => Force::IDENTIFIER,
            Self::Spc(_) => Spc::IDENTIFIER,
            Self::Rbe2(_) => Rbe2::IDENTIFIER,
        }
    }

    pub fn to_line(&self) -> String {
        match self {
            Self::Grid(entry) => entry.to_line(),
            Self::Crod(entry) => entry.to_line(),
            Self::Conrod(entry) => entry.to_line(),
            Self::Prod(entry) => entry.to_line(),
            Self::Mat1(entry) => entry.to_line(),
            Self::Force(entry) => entry.to_line(),
            Self::Spc(entry) => entry.to_line(),
            Self::Rbe2(entry) => entry.to_line(),
        }
    }
}

macro_rules! impl_from_entry {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for BulkDataEntry {
                fn from(entry: $kind) -> Self {
                    Self::$kind(entry)
                }
            }
        )*
    };
}

impl_from_entry!(Grid, Crod, Conrod, Prod, Mat1, Force, Spc, Rbe2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_by_identifier() {
        let entry = BulkDataEntry::parse(&RawCard::from_line("CROD          12      13      21      23"))
            .expect("crod should parse");
        assert_eq!(entry, BulkDataEntry::Crod(Crod::new(12, 13, 21, 23)));
        assert_eq!(entry.identifier(), "CROD");
    }

    #[test]
    fn unknown_identifier() {
        let err = BulkDataEntry::parse(&RawCard::from_lines(&["CQUAD4         1       1       1       2"], 7))
            .expect_err("CQUAD4 is not read");
        assert_eq!(
            err,
            BulkError::UnsupportedEntry {
                identifier: "CQUAD4".to_string(),
                line: 7
            }
        );
        assert_eq!(err.to_string(), "line 7: CQUAD4 is not a supported entry type");
    }

    #[test]
    fn entries_render_through_their_kind() {
        let entry: BulkDataEntry = Grid::new(1, 0.0, 0.0, 0.0).into();
        assert_eq!(entry.to_line(), "GRID           1             0.0     0.0     0.0");
    }
}
