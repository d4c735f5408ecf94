use crate::domain::model::Table;
use crate::utils::error::{Result, SantaError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("xlsx" | "xlsm" | "xls" | "ods") => Ok(TableFormat::Spreadsheet),
            _ => Err(SantaError::InvalidConfigValueError {
                field: "input".to_string(),
                value: path.to_string(),
                reason: "Expected a .csv, .xlsx, .xlsm, .xls or .ods file".to_string(),
            }),
        }
    }
}

/// Parses `bytes` according to the extension of `path`. `sheet` only
/// applies to spreadsheets; the first sheet is used when it is `None`.
pub fn read_table(path: &str, bytes: Vec<u8>, sheet: Option<&str>) -> Result<Table> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv(path, &bytes)?,
        TableFormat::Spreadsheet => read_spreadsheet(path, bytes, sheet)?,
    };
    tracing::debug!(
        "Read {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path
    );
    Ok(table)
}

pub fn read_csv(name: &str, bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(name, headers);
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        push_row(&mut table, row, line);
    }
    Ok(table)
}

pub fn read_spreadsheet(name: &str, bytes: Vec<u8>, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = match sheet {
        Some(sheet) => sheet.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SantaError::InvalidRecord {
                table: name.to_string(),
                row: 0,
                reason: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    // Sheet rows are 0-based; the used range may start below row 0.
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(name, headers);
    for (offset, row) in rows.enumerate() {
        let line = first_line + offset + 1;
        push_row(&mut table, row.iter().map(cell_to_string).collect(), line);
    }
    Ok(table)
}

fn push_row(table: &mut Table, mut row: Vec<String>, line: usize) {
    if row.iter().all(|cell| cell.trim().is_empty()) {
        return;
    }
    if row.len() < table.headers.len() {
        row.resize(table.headers.len(), String::new());
    }
    table.push_row(row, line);
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Serializes a table as CSV with a header row.
pub fn write_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SantaError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SantaError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Roster;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path("a.csv").unwrap(), TableFormat::Csv);
        assert_eq!(
            TableFormat::from_path("Employee-list.XLSX").unwrap(),
            TableFormat::Spreadsheet
        );
        assert!(TableFormat::from_path("a.txt").is_err());
    }

    #[test]
    fn test_read_csv_skips_blank_rows_and_pads_short_ones() {
        let data = "\u{feff}Employee_Name,Employee_EmailID,Team\n\
                    Alice,alice@acme.com,Ops\n\
                    ,,\n\
                    Bob,bob@acme.com\n";

        let table = read_csv("roster.csv", data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Employee_Name", "Employee_EmailID", "Team"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], vec!["Bob", "bob@acme.com", ""]);
        assert_eq!(table.source_lines, vec![2, 4]);
    }

    #[test]
    fn test_blank_email_after_skipped_row_names_file_line() {
        let data = "Employee_Name,Employee_EmailID\n\
                    Alice,alice@acme.com\n\
                    ,\n\
                    Nobody,\n";

        let table = read_csv("roster.csv", data.as_bytes()).unwrap();
        let err = Roster::from_table(&table).unwrap_err();

        assert!(matches!(err, SantaError::InvalidRecord { row: 4, .. }));
    }

    #[test]
    fn test_read_spreadsheet_first_sheet_and_named_sheet() {
        let mut workbook = Workbook::new();
        let roster = workbook.add_worksheet();
        roster.set_name("Roster").unwrap();
        roster.write_string(0, 0, "Employee_Name").unwrap();
        roster.write_string(0, 1, "Employee_EmailID").unwrap();
        roster.write_string(0, 2, "Desk").unwrap();
        roster.write_string(1, 0, "Alice").unwrap();
        roster.write_string(1, 1, "alice@acme.com").unwrap();
        roster.write_number(1, 2, 42.0).unwrap();

        let prior = workbook.add_worksheet();
        prior.set_name("2023").unwrap();
        prior.write_string(0, 0, "Employee_EmailID").unwrap();
        prior.write_string(0, 1, "Secret_Child_EmailID").unwrap();
        prior.write_string(1, 0, "alice@acme.com").unwrap();
        prior.write_string(1, 1, "bob@acme.com").unwrap();

        let bytes = workbook.save_to_buffer().unwrap();

        let first = read_table("people.xlsx", bytes.clone(), None).unwrap();
        assert_eq!(first.headers, vec!["Employee_Name", "Employee_EmailID", "Desk"]);
        assert_eq!(first.rows, vec![vec!["Alice", "alice@acme.com", "42"]]);
        assert_eq!(first.source_lines, vec![2]);

        let named = read_table("people.xlsx", bytes.clone(), Some("2023")).unwrap();
        assert_eq!(named.rows, vec![vec!["alice@acme.com", "bob@acme.com"]]);

        assert!(matches!(
            read_table("people.xlsx", bytes, Some("missing")),
            Err(SantaError::SpreadsheetError(_))
        ));
    }

    #[test]
    fn test_write_csv_quotes_when_needed() {
        let mut table = Table::new("out", vec!["Employee_Name".into(), "Note".into()]);
        table.rows.push(vec!["Doe, Jane".into(), "".into()]);

        let csv = write_csv(&table).unwrap();

        assert_eq!(csv, "Employee_Name,Note\n\"Doe, Jane\",\n");
    }
}
