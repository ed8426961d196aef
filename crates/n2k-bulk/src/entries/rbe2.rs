//! RBE2: rigid body element.
//!
//! The dependent grid list has no fixed length, so the card is read as a flat
//! run of present fields rather than by position: `EID GN CM GM1 GM2 ...
//! [ALPHA [TREF]]`. Integer fields after CM are dependent grids; the first
//! non-integer field ends the list and starts the optional reals. See
//! [`RawCard::tokens`] for how fields are cut out of each layout.

use crate::error::Result;
use crate::field::{Field, FieldValue, RawCard, decode_field, format_card};

/// Rigid element tying dependent grids `gmi` to the independent grid `gn`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rbe2 {
    pub eid: i32,
    /// Independent grid
    pub gn: i32,
    /// Constrained component mask
    pub cm: i32,
    /// Dependent grids
    pub gmi: Vec<i32>,
    /// Thermal expansion coefficient
    pub alpha: Option<f64>,
    /// Reference temperature; written after `alpha`, so it only reads back when `alpha` is set.
    pub tref: Option<f64>,
}

impl Rbe2 {
    pub const IDENTIFIER: &'static str = "RBE2";

    pub fn new(eid: i32, gn: i32, cm: i32, gmi: Vec<i32>) -> Self {
        Self {
            eid,
            gn,
            cm,
            gmi,
            alpha: None,
            tref: None,
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        let tokens = card.tokens();
        let integer = |index: usize, name: &'static str| -> Result<i32> {
            match tokens.get(index) {
                Some(text) => decode_field(card, text, index, name),
                None => Err(card.format_error(index, name, "required field is absent".to_string())),
            }
        };
        let eid = integer(1, "EID")?;
        let gn = integer(2, "GN")?;
        let cm = integer(3, "CM")?;

        let mut index = 4;
        let mut gmi = Vec::new();
        while let Some(grid) = tokens.get(index).and_then(|text| i32::decode(text)) {
            gmi.push(grid);
            index += 1;
        }

        let real = |index: usize, name: &'static str| -> Result<Option<f64>> {
            tokens
                .get(index)
                .map(|text| decode_field(card, text, index, name))
                .transpose()
        };
        let alpha = real(index, "ALPHA")?;
        let tref = real(index + 1, "TREF")?;
        if let Some(extra) = tokens.get(index + 2) {
            return Err(card.format_error(
                index + 2,
                "TREF",
                format!("unexpected value {extra:?} after TREF"),
            ));
        }

        Ok(Self {
            eid,
            gn,
            cm,
            gmi,
            alpha,
            tref,
        })
    }

    pub fn to_line(&self) -> String {
        let mut fields = vec![
            Field::from(self.eid),
            Field::from(self.gn),
            Field::from(self.cm),
        ];
        fields.extend(self.gmi.iter().copied().map(Field::from));
        fields.push(Field::from(self.alpha));
        fields.push(Field::from(self.tref));
        format_card(Self::IDENTIFIER, &fields)
    }
}
