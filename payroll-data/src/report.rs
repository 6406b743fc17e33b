//! Plain-text rendering of employee records.

use payroll_core::EmployeeRecord;
use payroll_core::calculations::common::round_half_up;
use rust_decimal::Decimal;

const HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Taxpayer ID",
    "Gross",
    "SS discount",
    "Deps",
    "Taxable base",
    "Withheld",
];

fn money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

fn row(record: &EmployeeRecord) -> [String; 8] {
    [
        record.id().to_string(),
        record.name().to_string(),
        record.taxpayer_id().to_string(),
        money(record.gross_salary()),
        money(record.social_security_discount()),
        record.dependents().to_string(),
        money(record.taxable_base()),
        money(record.tax_withheld()),
    ]
}

/// Renders `records` as a fixed-width table followed by a totals line.
///
/// Text columns are left-aligned and numeric columns right-aligned. Amounts
/// are rounded half-up to cents.
pub fn render_table(records: &[EmployeeRecord]) -> String {
    let rows: Vec<[String; 8]> = records.iter().map(row).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let total: Decimal = records.iter().map(EmployeeRecord::tax_withheld).sum();

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format_line(&HEADERS.map(str::to_string), &widths));
    lines.push(rule.join("-+-"));
    lines.extend(rows.iter().map(|cells| format_line(cells, &widths)));
    lines.push(format!(
        "{} employee(s), total withheld {}",
        records.len(),
        money(total)
    ));
    lines.join("\n")
}

fn format_line(
    cells: &[String; 8],
    widths: &[usize; 8],
) -> String {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, width))| {
            // format! pads by char count, so accented names stay aligned.
            if matches!(column, 1 | 2) {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    line.join(" | ").trim_end().to_string()
}
