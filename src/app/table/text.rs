//! Fixed-width text tables
//!
//! `BatchDisplay` responses lay tables out as
//!
//! ```text
//! +-----------------+------------------------------+
//! | Mission         | Description                  |
//! +-----------------+------------------------------+
//! | integral_rev3   | INTEGRAL Rev3 pointings      |
//! +-----------------+------------------------------+
//! ```
//!
//! The separator line following the header fixes the column positions.

use super::{Column, Table, Value};
use crate::errors::{TableError, TableResult};

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains(['-', '='])
        && trimmed
            .chars()
            .all(|c| matches!(c, '+' | '-' | '=' | '|' | ' '))
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('<')
}

/// Column character ranges: maximal runs of `-` or `=` in the position line
fn column_spans(position_line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in position_line.chars().enumerate() {
        let in_column = matches!(c, '-' | '=');
        match (in_column, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, position_line.chars().count()));
    }
    spans
}

fn slice(line: &[char], (start, end): (usize, usize)) -> String {
    let end = end.min(line.len());
    if start >= end {
        return String::new();
    }
    line[start..end]
        .iter()
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace() || c == '|')
        .to_string()
}

/// Reads a fixed-width table whose header is followed by a position line
///
/// All cells are returned as text.
///
/// # Errors
///
/// Returns `TableError::InvalidText` if no header/position line pair is found
pub fn read_fixed_width(text: &str) -> TableResult<Table> {
    let lines: Vec<&str> = text.lines().filter(|l| !is_skipped(l)).collect();

    let position_index = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(i, line)| is_separator(line) && !is_separator(lines[i - 1]))
        .map(|(i, _)| i)
        .ok_or_else(|| TableError::InvalidText {
            reason: "no header line followed by a column position line".to_string(),
        })?;

    let spans = column_spans(lines[position_index]);
    let header: Vec<char> = lines[position_index - 1].chars().collect();

    let columns: Vec<Column> = spans
        .iter()
        .enumerate()
        .map(|(i, span)| {
            let name = slice(&header, *span);
            let name = if name.is_empty() {
                format!("col{}", i + 1)
            } else {
                name
            };
            Column::new(name, "A")
        })
        .collect();

    let mut table = Table::new(columns);
    for line in &lines[position_index + 1..] {
        if is_separator(line) {
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        let row = spans
            .iter()
            .map(|span| Value::Text(slice(&chars, *span)))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}
