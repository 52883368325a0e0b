//! Terminal table output.
//!
//! Renders rows as a github-style markdown table. Numbers are right-aligned,
//! text is left-aligned.

use super::RangeRow;
use colored::Colorize;
use itertools::Itertools;

const HEADERS: [&str; 7] = [
    "Lowest IP",
    "Upper IP",
    "Num of Addr",
    "Prefix",
    "Available",
    "ID",
    "Name",
];
/// Columns holding numbers.
const NUMERIC: [bool; 7] = [false, false, true, true, false, false, false];
const AVAILABLE_COLUMN: usize = 4;

/// Pad a value to `width`, right-aligned when `numeric`.
///
/// Values longer than `width` are returned unchanged.
pub fn format_field<T: ToString>(value: T, width: usize, numeric: bool) -> String {
    let value_str = value.to_string();
    if numeric {
        format!("{value_str:>width$}")
    } else {
        format!("{value_str:<width$}")
    }
}

fn cells(row: &RangeRow) -> [String; 7] {
    [
        row.start_address.clone(),
        row.end_address.clone(),
        row.num_of_addresses_text(),
        row.prefix.map(|p| p.to_string()).unwrap_or_default(),
        if row.available { "True" } else { "False" }.to_string(),
        row.id.clone().unwrap_or_default(),
        row.name.clone().unwrap_or_default(),
    ]
}

/// Render rows as a table; `color` paints the availability column.
pub fn ranges_table(rows: &[RangeRow], color: bool) -> String {
    let body: Vec<[String; 7]> = rows.iter().map(cells).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!(
        "| {} |",
        HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| format_field(h, w, false))
            .join(" | ")
    ));
    lines.push(format!(
        "|{}|",
        widths
            .iter()
            .zip(NUMERIC)
            .map(|(w, numeric)| {
                let dashes = "-".repeat(w + 1);
                if numeric {
                    format!("{dashes}:")
                } else {
                    format!("-{dashes}")
                }
            })
            .join("|")
    ));
    for row in &body {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let padded = format_field(cell, widths[i], NUMERIC[i]);
                match (color, i) {
                    (true, AVAILABLE_COLUMN) if cell == "True" => padded.green().to_string(),
                    (true, AVAILABLE_COLUMN) => padded.red().to_string(),
                    _ => padded,
                }
            })
            .join(" | ");
        lines.push(format!("| {line} |"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressRange, OccupiedBlock, Segment};
    use crate::output::segment_rows;

    #[test]
    fn test_format_field_text() {
        assert_eq!(format_field("test", 6, false), "test  ");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 6, true), "    42");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5, false), "long_value");
    }

    #[test]
    fn test_ranges_table() {
        let universe: AddressRange = "10.10.10.0/24".parse().unwrap();
        let block = OccupiedBlock::new("10.10.10.0/26".parse().unwrap())
            .with_id("subnet-1")
            .with_name("app");
        let segments = vec![
            Segment::occupied(&block),
            Segment::available(
                AddressRange::new(block.range.end + 1, universe.end, universe.family).unwrap(),
            ),
        ];
        let table = ranges_table(&segment_rows(&segments), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines,
            vec![
                "| Lowest IP   | Upper IP     | Num of Addr | Prefix | Available | ID       | Name |",
                "|-------------|--------------|------------:|-------:|-----------|----------|------|",
                "| 10.10.10.0  | 10.10.10.63  |          64 |     26 | False     | subnet-1 | app  |",
                "| 10.10.10.64 | 10.10.10.255 |         192 |        | True      |          |      |",
            ]
        );
    }

    #[test]
    fn test_ranges_table_empty() {
        let table = ranges_table(&[], true);
        assert_eq!(table.lines().count(), 2);
    }
}
