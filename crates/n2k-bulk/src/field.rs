//! Fixed-width field codec for small-field bulk data cards.
//!
//! A small-field card is a run of 8-character columns. Column 0 holds the
//! entry identifier and data fields start at column 1. A column that is
//! missing, or made only of blanks, is *absent*; absent is distinct from a
//! present zero and every entry keeps that distinction.
//!
//! Two free-field spellings are accepted on input as well: comma separated
//! (`GRID,1,,0.,0.,0.`) and bare whitespace (`SPC 2 1 123456 0`). Output is
//! always small-field.

use crate::error::{BulkError, Result};

/// Width of one small-field column.
pub const FIELD_WIDTH: usize = 8;

/// Data columns carried by one physical line; column 9 is the continuation marker.
const DATA_COLUMNS_PER_LINE: usize = 8;

/// How the head line of a card lays out its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLayout {
    /// 8-character columns.
    Fixed,
    /// Comma separated free field.
    Comma,
    /// Whitespace separated tokens.
    Whitespace,
}

/// One logical card: a head line plus its continuation lines, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCard {
    identifier: String,
    layout: CardLayout,
    columns: Vec<String>,
    lines: Vec<String>,
    line_start: usize,
}

impl RawCard {
    /// Split a single physical line.
    pub fn from_line(line: &str) -> Self {
        Self::from_lines(&[line], 1)
    }

    /// Split a head line and its continuation lines. `line_start` is the
    /// 1-based line number of the head line, used in error reports.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], line_start: usize) -> Self {
        let lines: Vec<String> = lines
            .iter()
            .map(|line| strip_line_ending(line.as_ref()).to_string())
            .collect();
        let head = lines.first().map(String::as_str).unwrap_or_default();
        let layout = detect_layout(head);
        let identifier = identifier_of(head);

        let columns = match layout {
            CardLayout::Fixed => fixed_columns(&lines),
            CardLayout::Comma => free_columns(&lines, split_commas, true),
            CardLayout::Whitespace => free_columns(&lines, split_blanks, false),
        };

        Self {
            identifier,
            layout,
            columns,
            lines,
            line_start,
        }
    }

    /// Upper-cased entry identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn layout(&self) -> CardLayout {
        self.layout
    }

    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// Number of columns, identifier included.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Trimmed text of column `index`, or `None` when the column is absent.
    pub fn column(&self, index: usize) -> Option<&str> {
        let trimmed = self.columns.get(index)?.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }

    /// Present fields across every line, continuation markers dropped.
    ///
    /// Entries with a variable number of trailing values (RBE2) read their
    /// fields from here instead of from fixed positions. A fixed-layout card
    /// yields one token per non-blank column, so full-width values that touch
    /// their neighbours stay apart. A card whose head only looks fixed but
    /// carries several blank-separated values in one column is read as
    /// whitespace tokens instead.
    pub fn tokens(&self) -> Vec<String> {
        let column_tokens = || -> Vec<String> {
            self.columns
                .iter()
                .map(|column| column.trim())
                .filter(|column| !column.is_empty())
                .map(str::to_string)
                .collect()
        };
        match self.layout {
            CardLayout::Comma => column_tokens(),
            CardLayout::Fixed if self.is_column_aligned() => column_tokens(),
            CardLayout::Fixed | CardLayout::Whitespace => {
                free_columns(&self.lines, split_blanks, false)
            }
        }
    }

    fn is_column_aligned(&self) -> bool {
        self.columns
            .iter()
            .all(|column| column.split_whitespace().nth(1).is_none())
    }

    /// Read a field that must be present.
    pub fn required<T: FieldValue>(&self, index: usize, name: &'static str) -> Result<T> {
        match self.optional(index, name)? {
            Some(value) => Ok(value),
            None => Err(self.format_error(index, name, "required field is absent".to_string())),
        }
    }

    /// Read a field that may be absent.
    pub fn optional<T: FieldValue>(&self, index: usize, name: &'static str) -> Result<Option<T>> {
        self.column(index)
            .map(|text| decode_field(self, text, index, name))
            .transpose()
    }

    /// Read a field, substituting `default` when it is absent.
    pub fn or_default<T: FieldValue>(&self, index: usize, name: &'static str, default: T) -> Result<T> {
        Ok(self.optional(index, name)?.unwrap_or(default))
    }

    /// Build a format error located at this card.
    pub fn format_error(&self, index: usize, field: &'static str, message: String) -> BulkError {
        BulkError::Format {
            record: self.identifier.clone(),
            line: self.line_start,
            index,
            field,
            message,
        }
    }
}

/// Decode `text` as `T`, reporting failures against `card`.
pub fn decode_field<T: FieldValue>(
    card: &RawCard,
    text: &str,
    index: usize,
    name: &'static str,
) -> Result<T> {
    T::decode(text).ok_or_else(|| {
        card.format_error(index, name, format!("cannot read {text:?} as {}", T::KIND))
    })
}

/// A value kind that can be read from one field.
pub trait FieldValue: Sized {
    /// Human readable kind used in error messages.
    const KIND: &'static str;

    fn decode(text: &str) -> Option<Self>;
}

impl FieldValue for i32 {
    const KIND: &'static str = "integer";

    fn decode(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

impl FieldValue for f64 {
    const KIND: &'static str = "real";

    fn decode(text: &str) -> Option<Self> {
        parse_real(text)
    }
}

impl FieldValue for String {
    const KIND: &'static str = "string";

    fn decode(text: &str) -> Option<Self> {
        Some(text.trim().to_string())
    }
}

/// Parse a real, accepting the implicit-exponent spellings `1.5-3` and `2.+4`
/// and a `D` exponent marker as well as ordinary decimal text. Infinities and
/// NaN are not reals in bulk data and read as `None`.
pub fn parse_real(text: &str) -> Option<f64> {
    parse_real_spelling(text.trim()).filter(|value| value.is_finite())
}

fn parse_real_spelling(text: &str) -> Option<f64> {
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }

    let normalized = text.replace(['D', 'd'], "e");
    if let Ok(value) = normalized.parse::<f64>() {
        return Some(value);
    }

    let bytes = normalized.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))?;
    format!("{}e{}", &normalized[..split], &normalized[split..])
        .parse()
        .ok()
}

/// Render a real so that it fits one column and always reads back as a real.
///
/// The shortest exact text is used when it fits (`1000.0`, `6.5e-6`,
/// `3.0e7`); otherwise precision is reduced to the closest value that fits.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let plain = with_decimal_point(value.to_string());
    if plain.len() <= FIELD_WIDTH {
        return plain;
    }

    let scientific = exponent_with_point(format!("{value:e}"));
    if scientific.len() <= FIELD_WIDTH {
        return scientific;
    }

    closest_fitting(value).unwrap_or(scientific)
}

fn closest_fitting(value: f64) -> Option<String> {
    let mut candidates = Vec::with_capacity(2 * FIELD_WIDTH);
    for precision in 0..FIELD_WIDTH {
        candidates.push(with_decimal_point(format!("{value:.precision$}")));
        candidates.push(exponent_with_point(format!("{value:.precision$e}")));
    }

    candidates
        .into_iter()
        .filter(|candidate| candidate.len() <= FIELD_WIDTH)
        .filter_map(|candidate| {
            let parsed = candidate.parse::<f64>().ok()?;
            Some(((parsed - value).abs(), candidate))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.len().cmp(&b.1.len())))
        .map(|(_, candidate)| candidate)
}

fn with_decimal_point(mut text: String) -> String {
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

fn exponent_with_point(text: String) -> String {
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0e{exponent}")
        }
        _ => text,
    }
}

/// A value destined for one output column.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Integer(i32),
    Real(f64),
    Text(String),
    Absent,
}

impl Field {
    /// Unpadded text, or `None` for an absent field.
    pub fn encode(&self) -> Option<String> {
        match self {
            Field::Integer(value) => Some(value.to_string()),
            Field::Real(value) => Some(format_real(*value)),
            Field::Text(text) => Some(text.clone()),
            Field::Absent => None,
        }
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Field::Integer(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Real(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Absent, Into::into)
    }
}

/// Render a small-field card: the identifier left-justified in column 0, each
/// field right-justified in its own column.
///
/// Absent fields followed by a present one are written as blank columns so
/// later fields keep their positions; trailing absent fields are omitted.
pub fn format_card(identifier: &str, fields: &[Field]) -> String {
    let mut line = format!("{identifier:<width$}", width = FIELD_WIDTH);
    let Some(last) = fields.iter().rposition(|field| *field != Field::Absent) else {
        return line;
    };

    for field in &fields[..=last] {
        match field.encode() {
            Some(text) => line.push_str(&format!("{text:>width$}", width = FIELD_WIDTH)),
            None => line.push_str(&" ".repeat(FIELD_WIDTH)),
        }
    }
    line
}

/// Split a line into 8-character columns; the last one may be shorter.
pub fn split_columns(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(FIELD_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Upper-cased first token of the first column.
pub(crate) fn identifier_of(line: &str) -> String {
    let head: String = line.chars().take(FIELD_WIDTH).collect();
    head.split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| !token.is_empty())
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// Column 9 markers (`+C1`, `*`) that tie a card to its continuation lines.
pub(crate) fn is_continuation_marker(token: &str) -> bool {
    if token.starts_with('*') {
        return true;
    }
    match token.strip_prefix('+') {
        Some(rest) => !rest.starts_with(|c: char| c.is_ascii_digit() || c == '.'),
        None => false,
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn detect_layout(head: &str) -> CardLayout {
    if head.contains(',') {
        return CardLayout::Comma;
    }
    let first: String = head.chars().take(FIELD_WIDTH).collect();
    if first.split_whitespace().count() > 1 {
        CardLayout::Whitespace
    } else {
        CardLayout::Fixed
    }
}

fn fixed_columns(lines: &[String]) -> Vec<String> {
    let Some(head) = lines.first() else {
        return Vec::new();
    };
    let mut columns = split_columns(head);
    if lines.len() == 1 {
        return columns;
    }

    let blank = " ".repeat(FIELD_WIDTH);
    columns.resize(DATA_COLUMNS_PER_LINE + 1, blank.clone());
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate().skip(1) {
        let mut data: Vec<String> = split_columns(line)
            .into_iter()
            .skip(1)
            .take(DATA_COLUMNS_PER_LINE)
            .collect();
        if i < last {
            data.resize(DATA_COLUMNS_PER_LINE, blank.clone());
        }
        columns.extend(data);
    }
    columns
}

fn free_columns(lines: &[String], split: fn(&str) -> Vec<String>, lead_is_marker: bool) -> Vec<String> {
    let mut columns = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let mut tokens = split(line);
        if i > 0
            && tokens
                .first()
                .is_some_and(|token| lead_is_marker || is_continuation_marker(token))
        {
            tokens.remove(0);
        }
        if i + 1 < lines.len() && tokens.last().is_some_and(|token| is_continuation_marker(token)) {
            tokens.pop();
        }
        columns.extend(tokens);
    }
    columns
}

fn split_commas(line: &str) -> Vec<String> {
    line.split(',').map(|token| token.trim().to_string()).collect()
}

fn split_blanks(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
