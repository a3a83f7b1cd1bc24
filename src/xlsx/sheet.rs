//! Worksheet parsing into a cell grid.

use crate::error::{Error, Result};
use crate::model::{CellValue, Grid, GridRow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use quick_xml::events::{BytesStart, Event};

use super::reference::{parse_cell_ref, MAX_COLUMNS, MAX_ROWS};
use super::shared_strings::{decode_ooxml_escapes, SharedStrings};

/// A cell with a value at a zero-based sheet position.
#[derive(Debug, Clone, PartialEq)]
struct PlacedCell {
    row: usize,
    col: usize,
    value: CellValue,
}

/// Cell being assembled while its children are read.
#[derive(Debug, Default)]
struct PendingCell {
    row: usize,
    col: usize,
    cell_type: Option<String>,
    raw: String,
    has_value: bool,
}

/// Parse a worksheet part into a grid covering its used range.
///
/// The grid starts at the first row and column holding a value. Rows keep
/// their own length (up to their last value); interior gaps are empty cells
/// and valueless rows inside the range are empty rows. Error cells (`#N/A`,
/// `#DIV/0!`) hold no value.
///
/// A row or cell reference outside `A1:XFD1048576` is an
/// [`Error::XmlParse`].
pub fn parse_sheet(xml: &str, shared_strings: &SharedStrings) -> Result<Grid> {
    let cells = read_cells(xml, shared_strings)?;
    Ok(build_grid(cells))
}

fn read_cells(xml: &str, shared_strings: &SharedStrings) -> Result<Vec<PlacedCell>> {
    let mut cells = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut buf = Vec::new();
    // Next row index when a <row> carries no `r`
    let mut next_row = 0usize;
    let mut current_row = 0usize;
    // Next column index when a <c> carries no `r`
    let mut next_col = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(e, next_row)?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let pending = start_cell(e, current_row, next_col)?;
                    next_col = pending.col + 1;
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => {
                    in_value = true;
                    if let Some(ref mut c) = cell {
                        c.has_value = true;
                    }
                }
                b"is" if cell.is_some() => {
                    in_inline = true;
                    if let Some(ref mut c) = cell {
                        c.has_value = true;
                    }
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_inline && !in_phonetic => in_value = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(e, next_row)?;
                    next_row = current_row + 1;
                }
                b"c" => {
                    // A self-closing cell holds style only
                    let pending = start_cell(e, current_row, next_col)?;
                    next_col = pending.col + 1;
                }
                b"v" => {
                    if let Some(ref mut c) = cell {
                        c.has_value = true;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_value => {
                let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                if let Some(ref mut c) = cell {
                    c.raw.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(c) = cell.take().filter(|c| c.has_value) {
                        let value =
                            resolve_cell_value(&c.raw, c.cell_type.as_deref(), shared_strings);
                        if !value.is_empty() {
                            cells.push(PlacedCell {
                                row: c.row,
                                col: c.col,
                                value,
                            });
                        }
                    }
                    in_value = false;
                    in_inline = false;
                }
                b"v" | b"t" => in_value = false,
                b"is" => in_inline = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

/// Zero-based index from a row's 1-based `r` attribute, or `next` when absent.
fn row_index(e: &BytesStart<'_>, next: usize) -> Result<usize> {
    let Some(attr) = e.attributes().flatten().find(|a| a.key.as_ref() == b"r") else {
        return bounded_row(next);
    };

    let value = String::from_utf8_lossy(&attr.value);
    match value.trim().parse::<usize>() {
        Ok(r) if (1..=MAX_ROWS).contains(&r) => Ok(r - 1),
        _ => Err(Error::XmlParse(format!("invalid row index {:?}", value))),
    }
}

fn bounded_row(row: usize) -> Result<usize> {
    if row < MAX_ROWS {
        Ok(row)
    } else {
        Err(Error::XmlParse(format!("row {} is beyond the last sheet row", row + 1)))
    }
}

fn start_cell(e: &BytesStart<'_>, row: usize, next_col: usize) -> Result<PendingCell> {
    let mut pending = PendingCell {
        row,
        col: next_col,
        ..Default::default()
    };

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let reference = String::from_utf8_lossy(&attr.value);
                let r = parse_cell_ref(&reference).ok_or_else(|| {
                    Error::XmlParse(format!("invalid cell reference {:?}", reference))
                })?;
                pending.row = r.row;
                pending.col = r.col;
            }
            b"t" => {
                pending.cell_type = Some(String::from_utf8_lossy(&attr.value).to_string());
            }
            _ => {}
        }
    }

    if pending.col >= MAX_COLUMNS {
        return Err(Error::XmlParse(format!(
            "column {} is beyond the last sheet column",
            pending.col + 1
        )));
    }
    Ok(pending)
}

/// Resolve a cell value based on its type.
fn resolve_cell_value(raw: &str, cell_type: Option<&str>, shared: &SharedStrings) -> CellValue {
    match cell_type {
        Some("s") => match raw.trim().parse::<usize>() {
            Ok(idx) => match shared.get(idx) {
                Some(s) => CellValue::Text(s.to_string()),
                None => {
                    tracing::warn!(index = idx, "shared string index out of range");
                    CellValue::Text(String::new())
                }
            },
            Err(_) => CellValue::Text(raw.to_string()),
        },
        Some("b") => CellValue::Bool(raw.trim() == "1"),
        // Error codes are not carried as values
        Some("e") => CellValue::Empty,
        Some("d") => match parse_iso_date(raw.trim()) {
            Some(serial) => CellValue::Number(serial),
            None => CellValue::Text(raw.to_string()),
        },
        Some("str") | Some("inlineStr") => {
            CellValue::Text(decode_ooxml_escapes(raw).into_owned())
        }
        _ => match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        },
    }
}

/// Excel serial number (1900 date system) for an ISO 8601 date or date-time.
fn parse_iso_date(value: &str) -> Option<f64> {
    let value = value.strip_suffix('Z').unwrap_or(value);
    let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok()?;

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = (datetime.date() - epoch).num_days() as f64;
    let time = datetime.time();
    let seconds =
        time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1_000_000_000.0;
    Some(days + seconds / 86_400.0)
}

fn build_grid(cells: Vec<PlacedCell>) -> Grid {
    let Some(first_row) = cells.iter().map(|c| c.row).min() else {
        return Grid::new();
    };
    let first_col = cells.iter().map(|c| c.col).min().unwrap_or(0);
    let last_row = cells.iter().map(|c| c.row).max().unwrap_or(first_row);

    let mut rows = vec![GridRow::new(); last_row - first_row + 1];
    for cell in cells {
        rows[cell.row - first_row].set(cell.col - first_col, cell.value);
    }

    Grid { rows }
}
