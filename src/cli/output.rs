//! Plain-text rendering of query results

use std::fmt::Write as _;

use crate::app::models::{ColumnList, MissionList};
use crate::app::table::Table;

/// Width at which cell text is truncated
const MAX_CELL_WIDTH: usize = 40;

fn clip(text: String) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text
    } else {
        let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Renders a table with space-aligned columns and a dashed header rule
pub fn render_table(table: &Table) -> String {
    if table.num_columns() == 0 {
        return "No matching rows\n".to_string();
    }

    let header: Vec<String> = table.column_names();
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| clip(v.to_string())).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &cells {
        write_row(&mut out, row, &widths);
    }
    let _ = writeln!(out, "{} rows", table.len());
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

pub fn render_missions(missions: &MissionList) -> String {
    let width = missions
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for mission in missions {
        let line = format!("{:<width$}  {}", mission.name, mission.description, width = width);
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

pub fn render_columns(columns: &ColumnList) -> String {
    let mut out = String::new();
    for name in columns {
        let _ = writeln!(out, "{}", name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Mission;
    use crate::app::table::{Column, Value};

    #[test]
    fn test_render_table_alignment() {
        let mut table = Table::new(vec![Column::new("SCW_ID", "12A"), Column::new("RA_X", "D")]);
        table
            .push_row(vec![Value::Text("004900020010".into()), Value::Float(187.5)])
            .unwrap();
        table.push_row(vec![Value::Text("1".into()), Value::Null]).unwrap();

        let rendered = render_table(&table);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "SCW_ID        RA_X");
        assert_eq!(lines[1], "------------  -----");
        assert_eq!(lines[2], "004900020010  187.5");
        assert_eq!(lines[3], "1             --");
        assert_eq!(lines[4], "2 rows");
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&Table::empty()), "No matching rows\n");
    }

    #[test]
    fn test_long_cells_are_clipped() {
        let clipped = clip("x".repeat(100));
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_render_missions() {
        let missions = MissionList::new(vec![
            Mission::new("integral_rev3", "Pointings"),
            Mission::new("jemx", "JEM-X"),
        ]);
        assert_eq!(
            render_missions(&missions),
            "integral_rev3  Pointings\njemx           JEM-X\n"
        );
    }
}
