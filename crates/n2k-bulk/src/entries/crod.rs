//! CROD: rod element referencing a PROD property.

use crate::error::Result;
use crate::field::{Field, RawCard, format_card};

/// Rod connection between two grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crod {
    pub eid: i32,
    /// Property id; blank means it defaults to `eid` in a solver deck.
    pub pid: Option<i32>,
    pub g1: i32,
    pub g2: i32,
}

impl Crod {
    pub const IDENTIFIER: &'static str = "CROD";

    pub fn new(eid: i32, pid: i32, g1: i32, g2: i32) -> Self {
        Self {
            eid,
            pid: Some(pid),
            g1,
            g2,
        }
    }

    pub fn parse(card: &RawCard) -> Result<Self> {
        Ok(Self {
            eid: card.required(1, "EID")?,
            pid: card.optional(2, "PID")?,
            g1: card.required(3, "G1")?,
            g2: card.required(4, "G2")?,
        })
    }

    pub fn to_line(&self) -> String {
        format_card(
            Self::IDENTIFIER,
            &[
                Field::from(self.eid),
                Field::from(self.pid),
                Field::from(self.g1),
                Field::from(self.g2),
            ],
        )
    }
}
