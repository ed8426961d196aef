//! FORCE: static concentrated force at a grid point.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Force of magnitude `f` along `(n1, n2, n3)` applied at grid `g`.
#[derive(Debug, Clone, PartialEq)]
pub struct Force {
    /// Load set id
    pub sid: i32,
    pub g: i32,
    /// Coordinate system of the direction vector
    pub cid: i32,
    pub f: f64,
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
}

impl Force {
    pub const IDENTIFIER: &'static str = "FORCE";

    pub fn new(sid: i32, g: i32, f: f64, direction: [f64; 3]) -> Self {
        Self {
            sid,
            g,
            cid: 0,
            f,
            n1: direction[0],
            n2: direction[1],
            n3: direction[2],
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            sid: card.required(1, "SID")?,
            g: card.required(2, "G")?,
            cid: card.or_default(3, "CID", 0)?,
            f: card.required(4, "F")?,
            n1: card.or_default(5, "N1", 0.0)?,
            n2: card.or_default(6, "N2", 0.0)?,
            n3: card.or_default(7, "N3", 0.0)?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.sid),
                Field::from(self.g),
                Field::from(self.cid),
                Field::from(self.f),
                Field::from(self.n1),
                Field::from(self.n2),
                Field::from(self.n3),
            ],
        )
    }

    pub fn direction(&self) -> [f64; 3] {
        [self.n1, self.n2, self.n3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_blank_cid() {
        let card = RawCard::from_line("FORCE          2       5             2.9     0.0     1.0     0.0");
        let force = Force::parse(&card).expect("force should parse");
        assert_eq!(force, Force::new(2, 5, 2.9, [0.0, 1.0, 0.0]));
        assert_eq!(
            force.to_line(),
            "FORCE          2       5       0     2.9     0.0     1.0     0.0"
        );
    }

    #[test]
    fn explicit_cid() {
        let card = RawCard::from_line("FORCE          2       5       6     2.9     0.0     1.0     0.0");
        let force = Force::parse(&card).expect("force should parse");
        assert_eq!(force.cid, 6);
        assert_eq!(force.direction(), [0.0, 1.0, 0.0]);
    }
}
