//! GRID: geometric grid point.

use crate::error::Result;
use crate::field::{CardLayout, Field, RawCard, format_card};

/// A grid point location with its optional coordinate system references.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Grid point identification number
    pub id: i32,
    /// Coordinate system in which the location is given
    pub cp: Option<i32>,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    /// Coordinate system for displacements and constraints
    pub cd: Option<i32>,
    /// Permanent single-point constraint components, e.g. `"123"`
    pub ps: Option<String>,
    /// Superelement identification number
    pub seid: Option<i32>,
}

impl Grid {
    pub const IDENTIFIER: &'static str = "GRID";

    /// Grid in the basic coordinate system.
    pub fn new(id: i32, x1: f64, x2: f64, x3: f64) -> Self {
        Self {
            id,
            cp: None,
            x1,
            x2,
            x3,
            cd: None,
            ps: None,
            seid: None,
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        // Bare whitespace cannot spell a blank CP, so `GRID id x y z` is read as a location.
        if card.layout() == CardLayout::Whitespace && card.len() == 5 {
            return Ok(Self::new(
                card.required(1, "ID")?,
                card.required(2, "X1")?,
                card.required(3, "X2")?,
                card.required(4, "X3")?,
            ));
        }

        Ok(Self {
            id: card.required(1, "ID")?,
            cp: card.optional(2, "CP")?,
            x1: card.or_default(3, "X1", 0.0)?,
            x2: card.or_default(4, "X2", 0.0)?,
            x3: card.or_default(5, "X3", 0.0)?,
            cd: card.optional(6, "CD")?,
            ps: card.optional(7, "PS")?,
            seid: card.optional(8, "SEID")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.id),
                Field::from(self.cp),
                Field::from(self.x1),
                Field::from(self.x2),
                Field::from(self.x3),
                Field::from(self.cd),
                Field::from(self.ps.clone()),
                Field::from(self.seid),
            ],
        )
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x1, self.x2, self.x3]
    }

    /// Superelement id, 0 when the field is blank.
    pub fn superelement_id(&self) -> i32 {
        self.seid.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_with_defaults() {
        let grid = Grid::parse(&RawCard::from_line("GRID           2          1000.0     0.0"))
            .expect("grid should parse");
        assert_eq!(grid.id, 2);
        assert_eq!(grid.cp, None);
        assert_eq!(grid.coords(), [1000.0, 0.0, 0.0]);
        assert_eq!(grid.superelement_id(), 0);
    }

    #[test]
    fn parses_every_field() {
        let line = "GRID           2       5  1000.0     0.0     2.0       3     123       7";
        let grid = Grid::parse(&RawCard::from_line(line)).expect("grid should parse");
        assert_eq!(grid.cp, Some(5));
        assert_eq!(grid.cd, Some(3));
        assert_eq!(grid.ps.as_deref(), Some("123"));
        assert_eq!(grid.seid, Some(7));
        assert_eq!(grid.to_line(), line);
    }

    #[test]
    fn blank_cp_is_padded_on_output() {
        let grid = Grid::new(2, 1000.0, 0.0, 3.0);
        assert_eq!(grid.to_line(), "GRID           2          1000.0     0.0     3.0");
    }

    #[test]
    fn whitespace_location_shorthand() {
        let grid = Grid::parse(&RawCard::from_line("GRID 2 1000 0 0")).expect("grid should parse");
        assert_eq!(grid, Grid::new(2, 1000.0, 0.0, 0.0));
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(Grid::parse(&RawCard::from_line("GRID")).is_err());
    }
}
