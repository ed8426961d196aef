//! CONROD: rod element carrying its own section properties.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Rod connection that names its material and area directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Conrod {
    pub eid: i32,
    pub g1: i32,
    pub g2: i32,
    pub mid: i32,
    /// Cross-sectional area
    pub a: f64,
    /// Torsional constant
    pub j: Option<f64>,
    /// Torsional stress coefficient
    pub c: Option<f64>,
    /// Non-structural mass per unit length
    pub nsm: Option<f64>,
}

impl Conrod {
    pub const IDENTIFIER: &'static str = "CONROD";

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            eid: card.required(1, "EID")?,
            g1: card.required(2, "G1")?,
            g2: card.required(3, "G2")?,
            mid: card.required(4, "MID")?,
            a: card.required(5, "A")?,
            j: card.optional(6, "J")?,
            c: card.optional(7, "C")?,
            nsm: card.optional(8, "NSM")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.eid),
                Field::from(self.g1),
                Field::from(self.g2),
                Field::from(self.mid),
                Field::from(self.a),
                Field::from(self.j),
                Field::from(self.c),
                Field::from(self.nsm),
            ],
        )
    }
}
