//! PROD: rod property.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Section properties shared by CROD elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Prod {
    pub pid: i32,
    pub mid: i32,
    /// Cross-sectional area
    pub a: f64,
    /// Torsional constant
    pub j: Option<f64>,
    /// Torsional stress coefficient
    pub c: f64,
    /// Non-structural mass per unit length
    pub nsm: Option<f64>,
}

impl Prod {
    pub const IDENTIFIER: &'static str = "PROD";

    pub fn new(pid: i32, mid: i32, a: f64) -> Self {
        Self {
            pid,
            mid,
            a,
            j: None,
            c: 0.0,
            nsm: None,
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            pid: card.required(1, "PID")?,
            mid: card.required(2, "MID")?,
            a: card.required(3, "A")?,
            j: card.optional(4, "J")?,
            c: card.or_default(5, "C", 0.0)?,
            nsm: card.optional(6, "NSM")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.pid),
                Field::from(self.mid),
                Field::from(self.a),
                Field::from(self.j),
                Field::from(self.c),
                Field::from(self.nsm),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_field() {
        let line = "PROD          17      23    42.6   17.92  4.2356     0.5";
        let prod = Prod::parse(&RawCard::from_line(line)).expect("prod should parse");
        assert_eq!(prod.pid, 17);
        assert_eq!(prod.mid, 23);
        assert_eq!(prod.a, 42.6);
        assert_eq!(prod.j, Some(17.92));
        assert_eq!(prod.c, 4.2356);
        assert_eq!(prod.nsm, Some(0.5));
        assert_eq!(prod.to_line(), line);
    }

    #[test]
    fn blank_torsion_fields() {
        let prod = Prod::parse(&RawCard::from_line("PROD           1       1   350.0"))
            .expect("prod should parse");
        assert_eq!(prod, Prod::new(1, 1, 350.0));
        assert_eq!(prod.to_line(), "PROD           1       1   350.0             0.0");
    }
}
