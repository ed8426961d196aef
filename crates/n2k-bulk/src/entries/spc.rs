//! SPC: single-point constraint.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Enforced displacement on up to two grids.
///
/// `c1` and `c2` are component numbers whose decimal digits (1..=6) name the
/// constrained degrees of freedom, e.g. `123` for all translations.
#[derive(Debug, Clone, PartialEq)]
pub struct Spc {
    /// Constraint set id
    pub sid: i32,
    pub g1: i32,
    pub c1: i32,
    pub d1: f64,
    pub g2: Option<i32>,
    pub c2: Option<i32>,
    pub d2: Option<f64>,
}

impl Spc {
    pub const IDENTIFIER: &'static str = "SPC";

    pub fn new(sid: i32, g1: i32, c1: i32) -> Self {
        Self {
            sid,
            g1,
            c1,
            d1: 0.0,
            g2: None,
            c2: None,
            d2: None,
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            sid: card.required(1, "SID")?,
            g1: card.required(2, "G1")?,
            c1: card.required(3, "C1")?,
            d1: card.or_default(4, "D1", 0.0)?,
            g2: card.optional(5, "G2")?,
            c2: card.optional(6, "C2")?,
            d2: card.optional(7, "D2")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.sid),
                Field::from(self.g1),
                Field::from(self.c1),
                Field::from(self.d1),
                Field::from(self.g2),
                Field::from(self.c2),
                Field::from(self.d2),
            ],
        )
    }

    /// Whether component `digit` (1..=6) appears in `c1`.
    pub fn constrains(&self, digit: u32) -> bool {
        component_digits(self.c1).contains(&digit)
    }
}

/// Decimal digits of a component number.
pub fn component_digits(components: i32) -> Vec<u32> {
    components
        .unsigned_abs()
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect()
}
