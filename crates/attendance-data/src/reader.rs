//! Attendance table discovery and loading.
//!
//! Reads Excel workbooks and CSV, JSON-array and JSONL exports, maps their
//! heterogeneous column names onto [`RawAttendanceRecord`] and hands the rows
//! to the normalizer.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use attendance_core::data_processors::Normalizer;
use attendance_core::error::{AttendanceError, Result};
use attendance_core::models::{Metric, NormalizedAttendanceRecord, RawAttendanceRecord, RawField};
use calamine::{Data, Reader};
use tracing::{debug, info, warn};

// ── Formats and columns ───────────────────────────────────────────────────────

/// On-disk layouts understood by the reader, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Excel or OpenDocument workbook; only the first sheet is read.
    Workbook,
    Csv,
    /// A single JSON array of row objects.
    Json,
    /// One JSON row object per line.
    JsonLines,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Some(DataFormat::Workbook),
            "csv" => Some(DataFormat::Csv),
            "json" => Some(DataFormat::Json),
            "jsonl" | "ndjson" => Some(DataFormat::JsonLines),
            _ => None,
        }
    }
}

/// Destination of one source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    EmployeeId,
    EmployeeName,
    AccountCode,
    Billed,
    Metric(Metric),
}

/// Resolve a header to its column. Matching ignores case and every
/// non-alphanumeric character, so `"Avg. In Time"`, `avg_in_time` and
/// `avgInTime` all land on the same field.
fn column_for(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let column = match key.as_str() {
        "employeeid" | "empid" | "id" => Column::EmployeeId,
        "employeename" | "name" => Column::EmployeeName,
        "accountcode" | "account" => Column::AccountCode,
        "billed" | "isbilled" | "billingstatus" => Column::Billed,
        "avgintime" | "intime" => Column::Metric(Metric::AvgInTime),
        "avgouttime" | "outtime" => Column::Metric(Metric::AvgOutTime),
        "avgofficehrs" | "avgofficehours" | "officehours" => Column::Metric(Metric::AvgOfficeHours),
        "avgbreakhrs" | "avgbreakhours" | "breakhours" => Column::Metric(Metric::AvgBreakHours),
        "avgcafeteriahrs" | "avgcafeteriahours" | "cafeteriahours" => {
            Column::Metric(Metric::AvgCafeteriaHours)
        }
        "avgooohrs" | "avgooohours" | "ooohours" => Column::Metric(Metric::AvgOooHours),
        "fulldayleave" | "fulldayleaves" => Column::Metric(Metric::FullDayLeave),
        "halfdayleave" | "halfdayleaves" => Column::Metric(Metric::HalfDayLeave),
        _ => return None,
    };
    Some(column)
}

fn assign(record: &mut RawAttendanceRecord, column: Column, value: RawField) {
    match column {
        Column::EmployeeId => record.employee_id = value,
        Column::EmployeeName => record.employee_name = value.as_label(),
        Column::AccountCode => record.account_code = value.as_label(),
        Column::Billed => record.billed = value,
        Column::Metric(metric) => *record.field_mut(metric) = value,
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// A normalized attendance table plus the bookkeeping from loading it.
#[derive(Debug, Clone, Default)]
pub struct AttendanceDataset {
    /// File or directory the rows were read from.
    pub source: PathBuf,
    pub records: Vec<NormalizedAttendanceRecord>,
    /// Rows dropped for an unusable employee id.
    pub dropped_records: usize,
    /// Present but unreadable cells that were replaced by their default.
    pub defaulted_fields: usize,
}

impl AttendanceDataset {
    /// Build a dataset from rows that are already in memory.
    pub fn from_raw(source: PathBuf, raw_records: &[RawAttendanceRecord]) -> Self {
        let batch = Normalizer::normalize(raw_records);
        Self {
            source,
            records: batch.records,
            dropped_records: batch.dropped_records,
            defaulted_fields: batch.defaulted_fields,
        }
    }

    /// Distinct employee ids, ascending.
    pub fn employee_ids(&self) -> BTreeSet<u64> {
        self.records.iter().map(|r| r.employee_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all attendance tables recursively under `data_path`, sorted by path.
pub fn find_data_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && DataFormat::from_path(entry.path()).is_some()
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read raw rows from a single file or from every table under a directory.
///
/// A single file must have a supported extension. Inside a directory, files
/// that fail to read are logged and skipped.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawAttendanceRecord>> {
    if !path.exists() {
        return Err(AttendanceError::DataPathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return read_file(path);
    }

    let files = find_data_files(path);
    if files.is_empty() {
        return Err(AttendanceError::NoDataFiles(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for file in &files {
        match read_file(file) {
            Ok(rows) => records.extend(rows),
            Err(e) => warn!("Skipping {}: {}", file.display(), e),
        }
    }

    debug!("Read {} rows from {} files", records.len(), files.len());
    Ok(records)
}

/// Read and normalize the attendance table at `path`.
pub fn load_dataset(path: &Path) -> Result<AttendanceDataset> {
    let raw = load_raw_records(path)?;
    let dataset = AttendanceDataset::from_raw(path.to_path_buf(), &raw);

    info!(
        "Loaded {} attendance records for {} employees from {}",
        dataset.records.len(),
        dataset.employee_ids().len(),
        path.display()
    );
    if dataset.defaulted_fields > 0 {
        info!("{} unreadable fields were defaulted", dataset.defaulted_fields);
    }

    Ok(dataset)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_file(path: &Path) -> Result<Vec<RawAttendanceRecord>> {
    let format = DataFormat::from_path(path)
        .ok_or_else(|| AttendanceError::UnsupportedFormat(path.to_path_buf()))?;

    let records = match format {
        DataFormat::Workbook => read_workbook(path)?,
        DataFormat::Csv => read_csv(path, open_file(path)?)?,
        DataFormat::Json => read_json(open_file(path)?)?,
        DataFormat::JsonLines => read_json_lines(path, open_file(path)?),
    };
    debug!("{}: {} rows", path.display(), records.len());
    Ok(records)
}

fn open_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| AttendanceError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_workbook(path: &Path) -> Result<Vec<RawAttendanceRecord>> {
    let workbook_error = |message: String| AttendanceError::WorkbookParse {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_error("workbook has no worksheets".to_string()))?
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<Option<Column>> = header
        .iter()
        .map(|cell| column_for(&cell.to_string()))
        .collect();

    if !columns.contains(&Some(Column::EmployeeId)) {
        warn!("{} has no employee id column; every row will be dropped", path.display());
    }

    let mut records = Vec::new();
    for row in rows {
        // Formatting often extends the used range with blank rows.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let mut record = RawAttendanceRecord::default();
        for (column, cell) in columns.iter().zip(row) {
            if let Some(column) = column {
                assign(&mut record, *column, raw_field_from_cell(cell));
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Map a spreadsheet cell onto a raw field. Date and time cells become
/// fractional hours.
fn raw_field_from_cell(cell: &Data) -> RawField {
    match cell {
        Data::Int(i) => u64::try_from(*i).map_or(RawField::Number(*i as f64), RawField::Integer),
        Data::Float(f) => RawField::Number(*f),
        Data::String(s) => RawField::from_text(s),
        Data::Bool(b) => RawField::Flag(*b),
        Data::DateTime(dt) => RawField::Number(serial_to_hours(dt.as_f64(), dt.is_duration())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawField::from_text(s),
        Data::Error(e) => RawField::Text(format!("{e:?}")),
        Data::Empty => RawField::Missing,
    }
}

/// Excel stores times as fractions of a day. A duration keeps whole days;
/// a date-time contributes only its time of day.
fn serial_to_hours(serial: f64, is_duration: bool) -> f64 {
    if is_duration {
        serial * 24.0
    } else {
        serial.fract() * 24.0
    }
}

fn read_csv(path: &Path, file: std::fs::File) -> Result<Vec<RawAttendanceRecord>> {
    let csv_error = |e: csv::Error| AttendanceError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let columns: Vec<Option<Column>> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(column_for)
        .collect();

    if !columns.contains(&Some(Column::EmployeeId)) {
        warn!("{} has no employee id column; every row will be dropped", path.display());
    }

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping unreadable CSV row {} in {}: {}", line + 2, path.display(), e);
                continue;
            }
        };

        let mut record = RawAttendanceRecord::default();
        for (column, cell) in columns.iter().zip(row.iter()) {
            if let Some(column) = column {
                assign(&mut record, *column, RawField::from_text(cell));
            }
        }
        records.push(record);
    }

    Ok(records)
}

fn read_json(file: std::fs::File) -> Result<Vec<RawAttendanceRecord>> {
    let value: serde_json::Value = serde_json::from_reader(std::io::BufReader::new(file))?;

    let rows = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        other => {
            debug!("Ignoring JSON document of type {}", json_type(&other));
            Vec::new()
        }
    };

    Ok(rows.iter().filter_map(record_from_json).collect())
}

fn read_json_lines(path: &Path, file: std::fs::File) -> Vec<RawAttendanceRecord> {
    let reader = std::io::BufReader::new(file);
    let mut records = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(_) => continue,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                debug!("Failed to parse line {} in {}: {}", line_no + 1, path.display(), e);
                continue;
            }
        };

        if let Some(record) = record_from_json(&value) {
            records.push(record);
        }
    }

    records
}

fn record_from_json(value: &serde_json::Value) -> Option<RawAttendanceRecord> {
    let Some(object) = value.as_object() else {
        debug!("Skipping non-object row of type {}", json_type(value));
        return None;
    };

    let mut record = RawAttendanceRecord::default();
    for (key, cell) in object {
        if let Some(column) = column_for(key) {
            assign(&mut record, column, RawField::from_json(cell));
        }
    }
    Some(record)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    const SOURCE_CSV: &str = "\
Employee ID,Employee Name,Account code,Avg. In Time,Avg. Out Time,Avg. Office Hrs,Avg. Break Hrs,Avg. Cafeteria Hrs,Avg. OOO Hrs,Full Day Leave,Half Day Leave,Billed
101,Asha,ACC-1,09:36,18:00,8:24,0:45,0:30,0:00,0,1,Billed
102,Ravi,ACC-2,9:00 AM,05:30 PM,8.5,1.5,0.25,0,4,0,Unbilled
";

    // ── column_for ───────────────────────────────────────────────────────────

    #[test]
    fn test_column_for_accepts_source_snake_and_camel_case() {
        for header in ["Avg. In Time", "avg_in_time", "avgInTime", "AVG IN TIME"] {
            assert_eq!(column_for(header), Some(Column::Metric(Metric::AvgInTime)), "{header}");
        }
        assert_eq!(column_for("Employee ID"), Some(Column::EmployeeId));
        assert_eq!(column_for("employeeId"), Some(Column::EmployeeId));
        assert_eq!(column_for("Account code"), Some(Column::AccountCode));
        assert_eq!(column_for("Avg. OOO Hrs"), Some(Column::Metric(Metric::AvgOooHours)));
    }

    #[test]
    fn test_column_for_unknown_header() {
        assert_eq!(column_for("Department"), None);
    }

    // ── DataFormat ───────────────────────────────────────────────────────────

    #[test]
    fn test_data_format_from_extension() {
        assert_eq!(DataFormat::from_path(Path::new("a.CSV")), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_path(Path::new("a.json")), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_path(Path::new("a.jsonl")), Some(DataFormat::JsonLines));
        assert_eq!(DataFormat::from_path(Path::new("a.xlsx")), Some(DataFormat::Workbook));
        assert_eq!(DataFormat::from_path(Path::new("a.txt")), None);
    }

    // ── find_data_files ──────────────────────────────────────────────────────

    #[test]
    fn test_find_data_files_missing_path() {
        assert!(find_data_files(Path::new("/nonexistent/attendance")).is_empty());
    }

    #[test]
    fn test_find_data_files_recursive_and_sorted() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.csv", "");
        write_file(tmp.path(), "nested/a.jsonl", "");
        write_file(tmp.path(), "c.xlsx", "");
        write_file(tmp.path(), "notes.txt", "");

        let files = find_data_files(tmp.path());
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("b.csv"));
        assert!(files[1].ends_with("c.xlsx"));
        assert!(files[2].ends_with("nested/a.jsonl"));
    }

    // ── load_raw_records ─────────────────────────────────────────────────────

    #[test]
    fn test_load_raw_records_csv_source_headers() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "attendance.csv", SOURCE_CSV);

        let rows = load_raw_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee_id, RawField::Text("101".to_string()));
        assert_eq!(rows[0].employee_name.as_deref(), Some("Asha"));
        assert_eq!(rows[0].account_code.as_deref(), Some("ACC-1"));
        assert_eq!(rows[1].avg_in_time, RawField::Text("9:00 AM".to_string()));
        assert_eq!(rows[1].billed, RawField::Text("Unbilled".to_string()));
    }

    #[test]
    fn test_load_raw_records_csv_short_rows_and_blank_cells() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "short.csv",
            "employee_id,avg_office_hours,full_day_leave\n7, ,2\n8\n",
        );

        let rows = load_raw_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].avg_office_hours.is_missing());
        assert_eq!(rows[0].full_day_leave, RawField::Text("2".to_string()));
        assert!(rows[1].full_day_leave.is_missing());
    }

    #[test]
    fn test_load_raw_records_json_array() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "attendance.json",
            r#"[{"employeeId": 5, "avgOfficeHours": 7.5, "billed": false}, 42]"#,
        );

        let rows = load_raw_records(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, RawField::Integer(5));
        assert_eq!(rows[0].avg_office_hours, RawField::Number(7.5));
        assert_eq!(rows[0].billed, RawField::Flag(false));
    }

    #[test]
    fn test_load_raw_records_jsonl_skips_bad_lines() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "attendance.jsonl",
            "{\"Employee ID\": 1}\n\nnot json\n{\"Employee ID\": 2, \"Half Day Leave\": 1}\n",
        );

        let rows = load_raw_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].half_day_leave, RawField::Integer(1));
    }

    #[test]
    fn test_load_raw_records_directory_merges_files() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.csv", SOURCE_CSV);
        write_file(tmp.path(), "b.jsonl", "{\"employee_id\": 103}\n");

        let rows = load_raw_records(tmp.path()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_load_raw_records_directory_skips_broken_json() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.csv", SOURCE_CSV);
        write_file(tmp.path(), "broken.json", "[{");

        let rows = load_raw_records(tmp.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_load_raw_records_errors() {
        let missing = load_raw_records(Path::new("/nonexistent/attendance.csv")).unwrap_err();
        assert!(matches!(missing, AttendanceError::DataPathNotFound(_)));

        let tmp = TempDir::new().unwrap();
        let empty = load_raw_records(tmp.path()).unwrap_err();
        assert!(matches!(empty, AttendanceError::NoDataFiles(_)));

        let txt = write_file(tmp.path(), "notes.txt", "");
        let unsupported = load_raw_records(&txt).unwrap_err();
        assert!(matches!(unsupported, AttendanceError::UnsupportedFormat(_)));

        let not_a_workbook = write_file(tmp.path(), "book.xlsx", "plain text");
        assert!(matches!(
            load_raw_records(&not_a_workbook).unwrap_err(),
            AttendanceError::WorkbookParse { .. }
        ));

        let broken = write_file(tmp.path(), "broken.json", "[{");
        assert!(matches!(
            load_raw_records(&broken).unwrap_err(),
            AttendanceError::JsonParse(_)
        ));
    }

    // ── load_dataset ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_dataset_normalizes_rows() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "attendance.csv", SOURCE_CSV);

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.dropped_records, 0);
        assert_eq!(dataset.source, path);

        let asha = &dataset.records[0];
        assert_eq!(asha.employee_id, 101);
        assert!((asha.avg_in_time - 9.6).abs() < 1e-9);
        assert!((asha.avg_office_hours - 8.4).abs() < 1e-9);
        assert!(asha.billed);

        let ravi = &dataset.records[1];
        assert!((ravi.avg_in_time - 9.0).abs() < 1e-9);
        assert!((ravi.avg_out_time - 17.5).abs() < 1e-9);
        assert_eq!(ravi.full_day_leave, 4.0);
        assert!(!ravi.billed);
    }

    #[test]
    fn test_load_dataset_counts_drops_and_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "attendance.csv",
            "Employee ID,Avg. Office Hrs\n1,abc\nxyz,8\n2,7.5\n",
        );

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.dropped_records, 1);
        assert_eq!(dataset.defaulted_fields, 1);
        assert_eq!(dataset.records[0].avg_office_hours, 0.0);
        assert_eq!(dataset.employee_ids().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_load_dataset_keeps_ids_beyond_f64_precision_distinct() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "attendance.json",
            r#"[{"Employee ID": 9007199254740993}, {"Employee ID": 9007199254740992}]"#,
        );

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(
            dataset.employee_ids().into_iter().collect::<Vec<_>>(),
            vec![9_007_199_254_740_992, 9_007_199_254_740_993]
        );
    }

    // ── Workbooks ────────────────────────────────────────────────────────────

    fn write_workbook(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = [
            "Employee ID",
            "Employee Name",
            "Avg. In Time",
            "Avg. Office Hrs",
            "Full Day Leave",
            "Billed",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }

        sheet.write_number(1, 0, 101).unwrap();
        sheet.write_string(1, 1, "Asha").unwrap();
        sheet.write_string(1, 2, "09:36").unwrap();
        sheet.write_number(1, 3, 8.4).unwrap();
        sheet.write_number(1, 4, 0).unwrap();
        sheet.write_string(1, 5, "Billed").unwrap();

        sheet.write_number(2, 0, 102).unwrap();
        sheet.write_string(2, 1, "Ravi").unwrap();
        sheet.write_string(2, 2, "9:00 AM").unwrap();
        sheet.write_number(2, 3, 8.5).unwrap();
        sheet.write_number(2, 4, 4).unwrap();
        sheet.write_boolean(2, 5, false).unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_dataset_reads_first_sheet_of_workbook() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("attendance_sample.xlsx");
        write_workbook(&path);

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.dropped_records, 0);

        let asha = &dataset.records[0];
        assert_eq!(asha.employee_id, 101);
        assert_eq!(asha.employee_name.as_deref(), Some("Asha"));
        assert!((asha.avg_in_time - 9.6).abs() < 1e-9);
        assert!((asha.avg_office_hours - 8.4).abs() < 1e-9);
        assert!(asha.billed);

        let ravi = &dataset.records[1];
        assert_eq!(ravi.employee_id, 102);
        assert!((ravi.avg_in_time - 9.0).abs() < 1e-9);
        assert_eq!(ravi.full_day_leave, 4.0);
        assert!(!ravi.billed);
    }

    #[test]
    fn test_load_raw_records_directory_includes_workbooks() {
        let tmp = TempDir::new().unwrap();
        write_workbook(&tmp.path().join("a.xlsx"));
        write_file(tmp.path(), "b.jsonl", "{\"employee_id\": 103}\n");

        let rows = load_raw_records(tmp.path()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_raw_field_from_cell() {
        assert_eq!(raw_field_from_cell(&Data::Int(7)), RawField::Integer(7));
        assert_eq!(raw_field_from_cell(&Data::Int(-2)), RawField::Number(-2.0));
        assert_eq!(raw_field_from_cell(&Data::Float(8.5)), RawField::Number(8.5));
        assert_eq!(raw_field_from_cell(&Data::Bool(true)), RawField::Flag(true));
        assert_eq!(
            raw_field_from_cell(&Data::String("9:00 AM".to_string())),
            RawField::Text("9:00 AM".to_string())
        );
        assert!(raw_field_from_cell(&Data::Empty).is_missing());
    }

    #[test]
    fn test_serial_to_hours() {
        // 2024-01-01 09:36 as a date-time serial keeps only the time of day.
        assert!((serial_to_hours(45292.4, false) - 9.6).abs() < 1e-6);
        // A 30-hour duration keeps its whole days.
        assert!((serial_to_hours(1.25, true) - 30.0).abs() < 1e-9);
    }
}
