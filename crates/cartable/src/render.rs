//! Plain-text rendering of the car table for the command line.

use std::fmt::Write as _;

use crate::car::{Car, COLUMNS};

/// Column separator.
const GAP: &str = "  ";

/// Render cars as a fixed-width table with a header row.
#[must_use]
pub fn table(cars: &[&Car]) -> String {
    let rows: Vec<[String; 7]> = cars.iter().map(|car| car.columns()).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<T: AsRef<str>>(out: &mut String, cells: &[T], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    out.push_str(line.join(GAP).trim_end());
    out.push('\n');
}

/// Render cars one per line as `company model (VIN) - price`.
#[must_use]
pub fn plain(cars: &[&Car]) -> String {
    let mut out = String::new();
    for car in cars {
        let _ = writeln!(
            out,
            "{} {} ({}) - {}",
            car.company, car.model, car.vin, car.price
        );
    }
    out
}

/// Render the page buttons, bracketing the current page: `1 [2] 3`.
#[must_use]
pub fn page_bar(current: usize, count: usize) -> String {
    (1..=count)
        .map(|n| {
            if n == current {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary line below the table.
#[must_use]
pub fn footer(current: usize, count: usize, matched: usize, total: usize) -> String {
    if count == 0 {
        return format!("No cars match ({total} total)");
    }
    format!(
        "Page {current} of {count}: {}  ({matched} of {total} cars)",
        page_bar(current, count)
    )
}
