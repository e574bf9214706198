//! Plain-text rendering of [`DataTable`]s.

use std::fmt::Write as _;

use theft_dashboard_analytics_models::table::{Cell, DataTable};

/// Inserts `,` between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats an integer with thousands separators (`1695200` → `1,695,200`).
#[must_use]
pub fn format_integer(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_thousands(&digits);
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a real number: integral values like [`format_integer`],
/// everything else with two decimals and thousands separators.
#[must_use]
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        return format_integer(whole);
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}.{decimals}", group_thousands(whole))
}

/// Display text of one cell.
#[must_use]
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Integer(v) => format_integer(*v),
        Cell::Float(v) => format_float(*v),
        Cell::Text(v) => v.clone(),
        Cell::Missing => "N/A".to_owned(),
    }
}

const fn is_numeric(cell: &Cell) -> bool {
    matches!(cell, Cell::Integer(_) | Cell::Float(_))
}

/// Renders `table` as aligned columns under an underlined title. Numbers
/// are right-aligned.
#[must_use]
pub fn render_table(table: &DataTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", table.title);
    let _ = writeln!(out, "{}", "=".repeat(table.title.chars().count()));

    if table.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rendered {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{name:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for (cells, texts) in table.rows.iter().zip(&rendered) {
        let line: Vec<String> = cells
            .iter()
            .zip(texts)
            .zip(&widths)
            .map(|((cell, text), width)| {
                if is_numeric(cell) {
                    format!("{text:>width$}")
                } else {
                    format!("{text:<width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_get_thousands_separators() {
        assert_eq!(format_integer(0), "0");
        assert_eq!(format_integer(999), "999");
        assert_eq!(format_integer(1_000), "1,000");
        assert_eq!(format_integer(1_695_200), "1,695,200");
        assert_eq!(format_integer(-12_345), "-12,345");
    }

    #[test]
    fn floats_use_two_decimals_unless_integral() {
        assert_eq!(format_float(343.09), "343.09");
        assert_eq!(format_float(1_234.5), "1,234.50");
        assert_eq!(format_float(655_000.0), "655,000");
        assert_eq!(format_float(-0.256), "-0.26");
        assert_eq!(format_float(f64::NAN), "N/A");
    }

    #[test]
    fn missing_cells_render_as_na() {
        assert_eq!(format_cell(&Cell::Missing), "N/A");
        assert_eq!(format_cell(&Cell::Text("Auckland".to_owned())), "Auckland");
    }

    #[test]
    fn renders_aligned_columns() {
        let table = DataTable {
            title: "Thefts by Region".to_owned(),
            columns: vec!["region".to_owned(), "thefts".to_owned()],
            rows: vec![
                vec![Cell::from("Auckland"), Cell::Integer(1_638)],
                vec![Cell::from("Otago"), Cell::Integer(139)],
            ],
        };
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Thefts by Region");
        assert_eq!(lines[1], "================");
        assert_eq!(lines[2], "region    thefts");
        assert_eq!(lines[3], "--------  ------");
        assert_eq!(lines[4], "Auckland   1,638");
        assert_eq!(lines[5], "Otago        139");
    }

    #[test]
    fn empty_table_says_so() {
        let table = DataTable {
            title: "Colors".to_owned(),
            columns: vec!["color".to_owned(), "thefts".to_owned()],
            rows: Vec::new(),
        };
        assert!(render_table(&table).ends_with("(no data)\n"));
    }
}
