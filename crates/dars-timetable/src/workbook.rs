//! Decode the downloaded spreadsheet into [`Row`]s.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use crate::{
    error::{Result, TimetableError},
    types::{Cell, Row},
};

/// Read the first worksheet of an xlsx workbook.
///
/// Column indices are absolute (column A is index 0) even when the sheet's
/// used range starts further right. A workbook without sheets yields no rows.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|e| TimetableError::Workbook(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        None => return Ok(Vec::new()),
        Some(range) => range.map_err(|e| TimetableError::Workbook(e.to_string()))?,
    };

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let pad = first_col as usize;

    let mut rows: Vec<Row> = (0..first_row).map(|_| Vec::new()).collect();
    rows.extend(range.rows().map(|cells| {
        let mut row = Vec::with_capacity(pad + cells.len());
        row.resize(pad, Cell::Empty);
        row.extend(cells.iter().map(to_cell));
        row
    }));

    Ok(rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        _ => Cell::Empty,
    }
}
