//! Reads the annual and monthly sheets of the climate workbook.
//!
//! ```text
//!  climate-data.xlsx
//!        │
//!        ├── "data"    → header row search → AnnualTable
//!        └── "Monthly" → header row search → aggregate rows dropped → MonthlyTable
//! ```

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::config::{AnnualLayout, Config, MonthlyLayout, HEADER_SEARCH_ROWS};
use crate::label::Label;
use crate::{AnnualRecord, AnnualTable, DataError, MonthlyRecord, MonthlyTable, Tables};

/// Load both tables from the workbook at `path`.
pub fn load_workbook(path: &Path, config: &Config) -> Result<Tables, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = read_sheet(&mut workbook, &config.annual.sheet)?;
    let annual = parse_annual(&range, &config.annual)?;
    log::debug!("read {} years from sheet `{}`", annual.len(), config.annual.sheet);

    let range = read_sheet(&mut workbook, &config.monthly.sheet)?;
    let monthly = parse_monthly(&range, &config.monthly)?;
    log::debug!(
        "read {} months from sheet `{}`",
        monthly.len(),
        config.monthly.sheet
    );

    Ok(Tables { annual, monthly })
}

fn read_sheet<R: Read + Seek>(workbook: &mut Xlsx<R>, sheet: &str) -> Result<Range<Data>, DataError> {
    ensure_sheet(&workbook.sheet_names(), sheet)?;
    Ok(workbook.worksheet_range(sheet)?)
}

fn ensure_sheet(names: &[String], sheet: &str) -> Result<(), DataError> {
    if names.iter().any(|name| name == sheet) {
        Ok(())
    } else {
        Err(DataError::SheetNotFound {
            sheet: sheet.to_string(),
        })
    }
}

/// Parse the annual/seasonal sheet. Rows without a year are skipped.
pub fn parse_annual(range: &Range<Data>, layout: &AnnualLayout) -> Result<AnnualTable, DataError> {
    let sheet = Sheet::new(range, &layout.sheet, &layout.year)?;
    let year = sheet.column(&layout.year)?;
    let winter = sheet.column(&layout.winter)?;
    let spring = sheet.column(&layout.spring)?;
    let annual = sheet.column(&layout.annual)?;

    let mut records = Vec::new();
    for (row, cells) in sheet.data_rows() {
        if is_empty(cell(cells, year)) {
            log::debug!("skipping row {row} of `{}`: no year", layout.sheet);
            continue;
        }

        let value = sheet.number(cells, row, year, &layout.year)?;
        if value.fract() != 0.0 {
            return Err(sheet.invalid(row, &layout.year, cell(cells, year)));
        }

        records.push(AnnualRecord {
            year: value as i32,
            winter_temp: sheet.number(cells, row, winter, &layout.winter)?,
            spring_temp: sheet.number(cells, row, spring, &layout.spring)?,
            annual_temp: sheet.number(cells, row, annual, &layout.annual)?,
        });
    }

    AnnualTable::new(records)
}

/// Parse the monthly sheet, dropping the seasonal roll-up rows.
pub fn parse_monthly(range: &Range<Data>, layout: &MonthlyLayout) -> Result<MonthlyTable, DataError> {
    let sheet = Sheet::new(range, &layout.sheet, &layout.label)?;
    let label = sheet.column(&layout.label)?;
    let year_a = sheet.column(&layout.year_a)?;
    let year_b = sheet.column(&layout.year_b)?;
    let diff = sheet.column(&layout.diff)?;

    let mut records = Vec::new();
    for (row, cells) in sheet.data_rows() {
        let name = text(cell(cells, label));
        if name.is_empty() {
            continue;
        }

        let kind = Label::classify(&name);
        if kind.is_aggregate() {
            log::debug!("skipping aggregate row {row} of `{}`: {name}", layout.sheet);
            continue;
        }

        records.push(MonthlyRecord {
            month: kind.month(),
            month_label: name,
            temp_year_a: sheet.number(cells, row, year_a, &layout.year_a)?,
            temp_year_b: sheet.number(cells, row, year_b, &layout.year_b)?,
            diff: sheet.number(cells, row, diff, &layout.diff)?,
        });
    }

    Ok(MonthlyTable::new(records))
}

/// A worksheet with its header row located.
struct Sheet<'a> {
    range: &'a Range<Data>,
    name: &'a str,
    header_row: usize,
    headers: Vec<String>,
}

impl<'a> Sheet<'a> {
    /// The header row is the first of the leading rows holding `key`.
    fn new(range: &'a Range<Data>, name: &'a str, key: &str) -> Result<Self, DataError> {
        let (header_row, headers) = range
            .rows()
            .take(HEADER_SEARCH_ROWS)
            .map(|cells| cells.iter().map(text).collect::<Vec<_>>())
            .enumerate()
            .find(|(_, headers)| headers.iter().any(|header| header == key))
            .ok_or_else(|| column_not_found(name, key))?;

        Ok(Self {
            range,
            name,
            header_row,
            headers,
        })
    }

    fn column(&self, header: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| column_not_found(self.name, header))
    }

    /// Rows below the header, with their 1-based spreadsheet row number.
    fn data_rows(&self) -> impl Iterator<Item = (usize, &'a [Data])> + '_ {
        let first = self.range.start().map_or(0, |(row, _)| row as usize);
        self.range
            .rows()
            .enumerate()
            .skip(self.header_row + 1)
            .map(move |(idx, cells)| (first + idx + 1, cells))
    }

    fn number(&self, cells: &[Data], row: usize, idx: usize, column: &str) -> Result<f64, DataError> {
        let cell = cell(cells, idx);
        number(cell).ok_or_else(|| self.invalid(row, column, cell))
    }

    fn invalid(&self, row: usize, column: &str, cell: &Data) -> DataError {
        DataError::InvalidCell {
            sheet: self.name.to_string(),
            row,
            column: column.to_string(),
            value: match cell {
                Data::Empty => String::from("<empty>"),
                cell => cell.to_string(),
            },
        }
    }
}

fn column_not_found(sheet: &str, column: &str) -> DataError {
    DataError::ColumnNotFound {
        sheet: sheet.to_string(),
        column: column.to_string(),
    }
}

static EMPTY: Data = Data::Empty;

fn cell(cells: &[Data], idx: usize) -> &Data {
    cells.get(idx).unwrap_or(&EMPTY)
}

fn text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        cell => cell.to_string(),
    }
}

fn is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn f(value: f64) -> Data {
        Data::Float(value)
    }

    fn sheet(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    fn annual_header() -> Vec<Data> {
        vec![
            s("Year"),
            s("Winter (Jan - Mar)"),
            s("Spring (Apr - Jun)"),
            s("Annual (Jan - Dec)"),
        ]
    }

    fn monthly_header() -> Vec<Data> {
        vec![
            s("Avg. monthly Temp, Mendocino County(°F)"),
            s("2007 C"),
            s("2020 C"),
            s("diff C"),
        ]
    }

    #[test]
    fn annual_header_below_title_row() {
        let range = sheet(vec![
            vec![s("Mendocino County temperatures"), Data::Empty, Data::Empty, Data::Empty],
            annual_header(),
            vec![f(2008.0), f(8.9), f(14.2), f(12.4)],
            vec![Data::Int(2007), f(9.1), f(13.8), f(12.1)],
            vec![Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![s("2009"), s(" 8.7 "), f(14.0), f(12.3)],
        ]);

        let table = parse_annual(&range, &Config::default().annual).unwrap();
        assert_eq!(table.years().collect::<Vec<_>>(), vec![2007, 2008, 2009]);
        let record = table.record(2009).unwrap();
        assert_eq!(record.winter_temp, 8.7);
        assert_eq!(record.annual_temp, 12.3);
    }

    #[test]
    fn missing_column() {
        let range = sheet(vec![
            vec![s("Year"), s("Winter (Jan - Mar)"), s("Annual (Jan - Dec)")],
            vec![f(2007.0), f(9.1), f(12.1)],
        ]);

        let err = parse_annual(&range, &Config::default().annual).unwrap_err();
        match err {
            DataError::ColumnNotFound { sheet, column } => {
                assert_eq!(sheet, "data");
                assert_eq!(column, "Spring (Apr - Jun)");
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[test]
    fn missing_key_column() {
        let range = sheet(vec![vec![s("Month"), s("2007 C")], vec![s("January"), f(9.0)]]);
        let err = parse_monthly(&range, &Config::default().monthly).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound { column, .. }
            if column == "Avg. monthly Temp, Mendocino County(°F)"));
    }

    #[test]
    fn bad_temperature_cell() {
        let range = sheet(vec![
            annual_header(),
            vec![f(2007.0), f(9.1), s("n/a"), f(12.1)],
        ]);

        let err = parse_annual(&range, &Config::default().annual).unwrap_err();
        match err {
            DataError::InvalidCell { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Spring (Apr - Jun)");
                assert_eq!(value, "n/a");
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[test]
    fn fractional_year() {
        let range = sheet(vec![annual_header(), vec![f(2007.5), f(9.1), f(13.0), f(12.1)]]);
        let err = parse_annual(&range, &Config::default().annual).unwrap_err();
        assert!(matches!(err, DataError::InvalidCell { .. }));
    }

    #[test]
    fn duplicated_year() {
        let range = sheet(vec![
            annual_header(),
            vec![f(2007.0), f(9.1), f(13.0), f(12.1)],
            vec![f(2007.0), f(9.2), f(13.1), f(12.2)],
        ]);
        let err = parse_annual(&range, &Config::default().annual).unwrap_err();
        assert!(matches!(err, DataError::DuplicateYear(2007)));
    }

    #[test]
    fn aggregate_rows_are_dropped() {
        let months = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        let mut rows = vec![monthly_header()];
        for (i, month) in months.iter().enumerate() {
            rows.push(vec![s(month), f(8.0 + i as f64), f(9.0 + i as f64), f(1.0)]);
            if *month == "March" {
                rows.push(vec![s("Winter (Jan - Mar)"), f(8.9), f(9.9), f(1.0)]);
            }
            if *month == "June" {
                rows.push(vec![s("Spring (Apr - Jun)"), f(12.0), f(13.0), f(1.0)]);
            }
        }
        assert_eq!(rows.len() - 1, 14);

        let table = parse_monthly(&sheet(rows), &Config::default().monthly).unwrap();
        assert_eq!(table.len(), 12);
        let labels: Vec<_> = table.records().iter().map(|r| r.short_label()).collect();
        assert_eq!(labels[0], "Jan");
        assert_eq!(labels[11], "Dec");
        assert!(table.records().iter().all(|r| r.month.is_some()));
    }

    #[test]
    fn stored_diff_is_kept() {
        let range = sheet(vec![
            monthly_header(),
            vec![s("July"), f(17.04), f(18.26), f(1.2)],
        ]);
        let table = parse_monthly(&range, &Config::default().monthly).unwrap();
        assert_eq!(table.records()[0].diff, 1.2);
    }

    #[test]
    fn missing_sheet() {
        let names = vec![String::from("data"), String::from("Sheet2")];
        assert!(ensure_sheet(&names, "data").is_ok());

        let err = ensure_sheet(&names, "Monthly").unwrap_err();
        assert!(matches!(err, DataError::SheetNotFound { sheet } if sheet == "Monthly"));
        // Sheet names are matched exactly
        assert!(ensure_sheet(&names, "Data").is_err());
    }

    #[test]
    fn springtime_row_is_an_aggregate() {
        let range = sheet(vec![
            monthly_header(),
            vec![s("Springtime"), f(12.0), f(13.0), f(1.0)],
            vec![s("April"), f(11.0), f(12.5), f(1.5)],
        ]);
        let table = parse_monthly(&range, &Config::default().monthly).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].month_label, "April");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate-data.xlsx");
        let err = load_workbook(&path, &Config::default()).unwrap_err();
        assert!(matches!(err, DataError::FileNotFound(p) if p == path));
    }
}
