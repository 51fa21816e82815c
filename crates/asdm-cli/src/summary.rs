use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{ConvertResult, TableStatus, ValidationReport};

pub fn print_validation(report: &ValidationReport) {
    println!("Dataset: {}", report.directory.display());
    println!("Entity: {}", report.entity_id);
    println!("Created: {}", report.time_of_creation);
    println!("{}", status_table(&report.tables, true));
}

pub fn print_conversion(result: &ConvertResult) {
    println!("Output: {}", result.destination.display());
    println!("{}", status_table(&result.tables, false));
}

/// JSON rendering of a validation report.
pub fn validation_json(report: &ValidationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn status_table(statuses: &[TableStatus], with_declared: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Table")];
    if with_declared {
        header.push(header_cell("Declared"));
    }
    header.extend([header_cell("Rows"), header_cell("Format"), header_cell("Status")]);
    table.set_header(header);
    apply_table_style(&mut table);

    let mut total_rows = 0usize;
    for status in statuses {
        let mut row = vec![Cell::new(status.table)];
        if with_declared {
            row.push(dim_cell(status.declared_rows));
        }
        row.push(match status.rows {
            Some(rows) => {
                total_rows += rows;
                row_count_cell(rows, status.declared_rows, with_declared)
            }
            None => dim_cell("-"),
        });
        row.push(format_cell(status));
        row.push(status_cell(status));
        table.add_row(row);
    }

    let mut footer = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
    if with_declared {
        footer.push(Cell::new(""));
    }
    footer.push(Cell::new(total_rows).add_attribute(Attribute::Bold));
    table.add_row(footer);

    let numeric = if with_declared { 1..3 } else { 1..2 };
    for index in numeric {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn row_count_cell(rows: usize, declared: usize, compare: bool) -> Cell {
    if compare && rows != declared {
        Cell::new(rows).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else if rows == 0 {
        dim_cell(rows)
    } else {
        Cell::new(rows)
    }
}

fn format_cell(status: &TableStatus) -> Cell {
    match (status.rows, status.binary) {
        (None, _) | (Some(0), _) => dim_cell("-"),
        (Some(_), true) => Cell::new("bin"),
        (Some(_), false) => Cell::new("xml"),
    }
}

fn status_cell(status: &TableStatus) -> Cell {
    match &status.error {
        None => Cell::new("ok").fg(Color::Green),
        Some(error) => Cell::new(error).fg(Color::Red),
    }
}
