// src/file.rs
//
// Spreadsheet persistence for scraped records.
//
// Each record type owns one workbook (`SheetRow::FILE_NAME`) in the data
// directory: first worksheet, bold header row, one record per row, columns
// in `SheetRow::HEADERS` order. Reads are positional.
//
// Appending is read-modify-write: existing rows are loaded with calamine and
// the workbook is written back with rust_xlsxwriter followed by the new rows.
// Two runs appending to the same file at once will lose rows.

use std::{
    fs,
    path::{Path, PathBuf},
};

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::records::{Cell, SheetRow};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::InvalidArgument(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn sheet_path<T: SheetRow>(dir: &Path) -> PathBuf {
    dir.join(T::FILE_NAME)
}

fn to_cell(data: &Data) -> std::result::Result<Cell, String> {
    Ok(match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(if *b { s!("TRUE") } else { s!("FALSE") }),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => return Err(format!("cell error {e:?}")),
    })
}

/// Data rows (header skipped) of the first worksheet, each with its 1-based
/// sheet row number.
///
/// Column positions are absolute: a sheet whose used range starts at column
/// C still yields column A at index 0.
fn read_numbered_rows(path: &Path) -> Result<Vec<(usize, Vec<Cell>)>> {
    let read_err = |message: String| Error::XlsxRead { path: path.to_path_buf(), message };

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: calamine::XlsxError| read_err(e.to_string()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(r) => r.map_err(|e| read_err(e.to_string()))?,
        None => return Ok(Vec::new()),
    };
    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    let mut out = Vec::new();
    for (i, row) in range.rows().enumerate() {
        let sheet_row = first_row as usize + i + 1;
        // Header lives on sheet row 1.
        if sheet_row == 1 { continue; }

        let mut cells = vec![Cell::Empty; first_col as usize];
        for data in row {
            let cell = to_cell(data).map_err(|message| Error::Row { path: path.to_path_buf(), row: sheet_row, message })?;
            cells.push(cell);
        }
        if cells.iter().all(Cell::is_empty) { continue; }
        out.push((sheet_row, cells));
    }
    Ok(out)
}

/// Data rows (header and blank rows skipped) of the first worksheet.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    Ok(read_numbered_rows(path)?.into_iter().map(|(_, cells)| cells).collect())
}

/// All records stored in `dir`. Row errors carry the 1-based sheet row.
pub fn read_records<T: SheetRow>(dir: &Path) -> Result<Vec<T>> {
    let path = sheet_path::<T>(dir);
    if !path.is_file() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }
    let rows = read_numbered_rows(&path)?;
    debug!(path = %path.display(), rows = rows.len(), "read sheet");

    rows.iter()
        .map(|(row, cells)| {
            T::from_cells(cells).map_err(|e| Error::Row { path: path.clone(), row: *row, message: e.to_string() })
        })
        .collect()
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => { sheet.write_string(row, col, s)?; }
        Cell::Number(n) => { sheet.write_number(row, col, *n)?; }
    }
    Ok(())
}

/// Append `records` to the record type's workbook in `dir`, creating the
/// directory and the workbook (with its bold header) when missing.
pub fn append_records<'a, T, I>(dir: &Path, records: I) -> Result<PathBuf>
where
    T: SheetRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    ensure_directory(dir)?;
    let path = sheet_path::<T>(dir);

    let existing = if path.is_file() { read_rows(&path)? } else { Vec::new() };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    for (col, header) in T::HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    let kept = existing.len();
    let mut row = 0u32;
    for cells in existing.into_iter().chain(records.into_iter().map(|r| r.to_cells())) {
        row += 1;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(sheet, row, col as u16, cell)?;
        }
    }

    workbook.save(&path)?;
    info!(path = %path.display(), appended = row as usize - kept, "sheet saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AddonCategoryRecord, AddonRecord};

    #[test]
    fn append_creates_then_extends() {
        let dir = tempfile::tempdir().unwrap();
        let first = [AddonCategoryRecord::new("Toppings", false, Some(3))];
        let second = [AddonCategoryRecord::new("Bread", true, None)];

        append_records(dir.path(), &first).unwrap();
        let path = append_records(dir.path(), &second).unwrap();
        assert!(path.ends_with("addon_cat.xlsx"));

        let back: Vec<AddonCategoryRecord> = read_records(dir.path()).unwrap();
        assert_eq!(back, vec![first[0].clone(), second[0].clone()]);
    }

    #[test]
    fn prices_survive_as_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let addon = AddonRecord { category_name: "Extras".into(), addon_name: "Cheese".into(), price: 5.5, is_required: false };
        append_records(dir.path(), std::slice::from_ref(&addon)).unwrap();

        let rows = read_rows(&sheet_path::<AddonRecord>(dir.path())).unwrap();
        assert_eq!(rows[0][2], Cell::Number(5.5));
        assert_eq!(read_records::<AddonRecord>(dir.path()).unwrap(), vec![addon]);
    }

    #[test]
    fn missing_sheet_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records::<AddonRecord>(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        assert!(ensure_directory(&file).is_err());
        ensure_directory(&dir.path().join("a/b")).unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }
}
