//! MAT1: isotropic material.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Linear isotropic material. Only `mid` is mandatory; everything else may be blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Mat1 {
    pub mid: i32,
    /// Young's modulus
    pub e: Option<f64>,
    /// Shear modulus
    pub g: Option<f64>,
    /// Poisson's ratio
    pub nu: Option<f64>,
    /// Mass density
    pub rho: Option<f64>,
    /// Thermal expansion coefficient
    pub a: Option<f64>,
    /// Reference temperature
    pub tref: f64,
    /// Structural damping coefficient
    pub ge: Option<f64>,
    /// Stress limits for tension, compression and shear
    pub st: Option<f64>,
    pub sc: Option<f64>,
    pub ss: Option<f64>,
    /// Material coordinate system
    pub mcsid: Option<i32>,
}

impl Mat1 {
    pub const IDENTIFIER: &'static str = "MAT1";

    /// Material with every optional field blank.
    pub fn new(mid: i32) -> Self {
        Self {
            mid,
            e: None,
            g: None,
            nu: None,
            rho: None,
            a: None,
            tref: 0.0,
            ge: None,
            st: None,
            sc: None,
            ss: None,
            mcsid: None,
        }
    }

    pub fn with_young_modulus(mut self, e: f64) -> Self {
        self.e = Some(e);
        self
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            mid: card.required(1, "MID")?,
            e: card.optional(2, "E")?,
            g: card.optional(3, "G")?,
            nu: card.optional(4, "NU")?,
            rho: card.optional(5, "RHO")?,
            a: card.optional(6, "A")?,
            tref: card.or_default(7, "TREF", 0.0)?,
            ge: card.optional(8, "GE")?,
            st: card.optional(9, "ST")?,
            sc: card.optional(10, "SC")?,
            ss: card.optional(11, "SS")?,
            mcsid: card.optional(12, "MCSID")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.mid),
                Field::from(self.e),
                Field::from(self.g),
                Field::from(self.nu),
                Field::from(self.rho),
                Field::from(self.a),
                Field::from(self.tref),
                Field::from(self.ge),
                Field::from(self.st),
                Field::from(self.sc),
                Field::from(self.ss),
                Field::from(self.mcsid),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mid_and_modulus() {
        let mat = Mat1::parse(&RawCard::from_line("MAT1           1210000.0")).expect("mat1 should parse");
        assert_eq!(mat, Mat1::new(1).with_young_modulus(210000.0));
        assert_eq!(
            mat.to_line(),
            "MAT1           1210000.0                                     0.0"
        );
    }

    #[test]
    fn full_card_reads_back() {
        let mat = Mat1 {
            mid: 17,
            e: Some(3.0e7),
            g: None,
            nu: Some(0.33),
            rho: Some(4.28),
            a: Some(6.5e-6),
            tref: 537.0,
            ge: Some(0.23),
            st: Some(20.0e4),
            sc: Some(15.0e4),
            ss: Some(12.0e4),
            mcsid: Some(1003),
        };
        let line = mat.to_line();
        assert!(line.starts_with("MAT1          17   3.0e7            0.33    4.28  6.5e-6   537.0"));
        let back = Mat1::parse(&RawCard::from_line(&line)).expect("rendered line should parse");
        assert_eq!(back, mat);
    }
}
