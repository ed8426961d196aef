//! Bulk data section: an ordered list of entries read from deck text.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::entries::{BulkDataEntry, Conrod, Crod, Force, Grid, Mat1, Prod, Rbe2, Spc};
use crate::error::{BulkError, Result};
use crate::field::{RawCard, identifier_of};

/// Identifiers of control lines that carry no model data.
const CONTROL_IDENTIFIERS: [&str; 5] = ["SOL", "CEND", "BEGIN", "ENDDATA", "PARAM"];

/// Entries in deck order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkDataSection {
    entries: Vec<BulkDataEntry>,
}

macro_rules! typed_view {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        pub fn $name(&self) -> impl Iterator<Item = &$kind> {
            self.entries.iter().filter_map(|entry| match entry {
                BulkDataEntry::$kind(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl BulkDataSection {
    pub fn new(entries: Vec<BulkDataEntry>) -> Self {
        Self { entries }
    }

    /// Parse deck text.
    ///
    /// When the text has an executive and case control section (a `CEND`
    /// line), everything up to `BEGIN BULK` is skipped. Reading stops at
    /// `ENDDATA`; anything after it is not bulk data. Lines starting with `$`
    /// are comments. Lines starting with `+` or `*` continue the previous
    /// card, and so do indented lines unless their first token is an entry
    /// identifier, in which case the line starts a new card.
    pub fn parse_str(raw: &str) -> Result<Self> {
        let lines: Vec<&str> = raw.lines().collect();
        Self::parse_lines(&lines)
    }

    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let cards = group_cards(lines)?;
        let mut entries = Vec::with_capacity(cards.len());
        for card in &cards {
            if CONTROL_IDENTIFIERS.contains(&card.identifier()) {
                trace!(identifier = card.identifier(), line = card.line_start(), "skipping control line");
                continue;
            }
            entries.push(BulkDataEntry::parse(card)?);
        }

        let section = Self { entries };
        debug!(entries = section.len(), counts = ?section.summary(), "parsed bulk data section");
        Ok(section)
    }

    pub fn entries(&self) -> &[BulkDataEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    typed_view!(grids, Grid);
    typed_view!(crods, Crod);
    typed_view!(conrods, Conrod);
    typed_view!(prods, Prod);
    typed_view!(mat1s, Mat1);
    typed_view!(forces, Force);
    typed_view!(spcs, Spc);
    typed_view!(rbe2s, Rbe2);

    /// Entry count per identifier.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.identifier()).or_insert(0) += 1;
        }
        counts
    }

    /// One line per entry, in order.
    pub fn to_lines(&self) -> Vec<String> {
        self.entries.iter().map(BulkDataEntry::to_line).collect()
    }

    /// Bulk data text framed by `BEGIN BULK` and `ENDDATA`.
    pub fn to_file_content(&self) -> String {
        let mut content = String::from("BEGIN BULK\n");
        for line in self.to_lines() {
            content.push_str(&line);
            content.push('\n');
        }
        content.push_str("ENDDATA\n");
        content
    }
}

impl FromIterator<BulkDataEntry> for BulkDataSection {
    fn from_iter<I: IntoIterator<Item = BulkDataEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('$')
}

fn is_continuation(line: &str) -> bool {
    if line.starts_with(['+', '*']) {
        return true;
    }
    line.starts_with(char::is_whitespace) && !starts_with_identifier(line.trim_start())
}

fn starts_with_identifier(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Group physical lines into cards, attaching continuation lines to their head.
fn group_cards<S: AsRef<str>>(lines: &[S]) -> Result<Vec<RawCard>> {
    let has_case_control = lines.iter().any(|line| identifier_of(line.as_ref().trim_start()) == "CEND");
    let mut in_bulk = !has_case_control;
    let mut pending: Option<(usize, Vec<&str>)> = None;
    let mut cards = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        if !in_bulk {
            in_bulk = identifier_of(line.trim_start()) == "BEGIN";
            continue;
        }

        if is_continuation(line) {
            match pending.as_mut() {
                Some((_, group)) => group.push(line),
                None => {
                    return Err(BulkError::Format {
                        record: "continuation".to_string(),
                        line: i + 1,
                        index: 0,
                        field: "continuation",
                        message: "continuation line without a preceding card".to_string(),
                    });
                }
            }
            continue;
        }

        if let Some((start, group)) = pending.take() {
            cards.push(RawCard::from_lines(&group, start));
        }
        if identifier_of(line.trim_start()) == "ENDDATA" {
            break;
        }
        pending = Some((i + 1, vec![line.trim_start()]));
    }

    if let Some((start, group)) = pending {
        cards.push(RawCard::from_lines(&group, start));
    }
    Ok(cards)
}
