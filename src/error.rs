use std::path::PathBuf;

use miette::Diagnostic;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Error, Diagnostic)]
pub enum DataError {
    #[error("Workbook not found: {}", .0.display())]
    #[diagnostic(
        code(climate::file_not_found),
        help("run from the directory that contains `Misc./climate-data.xlsx`")
    )]
    FileNotFound(PathBuf),
    #[error("Sheet `{sheet}` not found in workbook")]
    #[diagnostic(code(climate::sheet_not_found))]
    SheetNotFound { sheet: String },
    #[error("Column `{column}` not found in sheet `{sheet}`")]
    #[diagnostic(
        code(climate::column_not_found),
        help("the header row must hold every expected column name verbatim")
    )]
    ColumnNotFound { sheet: String, column: String },
    #[error("Bad cell in sheet `{sheet}`, row {row}, column `{column}`: {value}")]
    #[diagnostic(code(climate::invalid_cell))]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("Year {0} appears more than once")]
    #[diagnostic(code(climate::duplicate_year))]
    DuplicateYear(i32),
    #[error("Could not read workbook: {0}")]
    #[diagnostic(code(climate::workbook))]
    Workbook(#[from] calamine::XlsxError),
}

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("No record for reference year {0}")]
    #[diagnostic(
        code(climate::reference_year_not_found),
        help("the annual sheet needs a row for both reference years")
    )]
    ReferenceYearNotFound(i32),
    #[error("Nothing to plot: the {0} table is empty")]
    #[diagnostic(code(climate::empty_table))]
    EmptyTable(&'static str),
    #[error("Drawing failed: {0}")]
    #[diagnostic(code(climate::drawing))]
    Drawing(String),
    #[error("Pixel buffer does not match a {0}x{1} image")]
    #[diagnostic(code(climate::buffer))]
    Buffer(u32, u32),
    #[error("Could not save {}: {source}", path.display())]
    #[diagnostic(code(climate::save))]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}
