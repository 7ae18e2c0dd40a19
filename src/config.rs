//! Input layout, reference years and output locations.

use std::path::{Path, PathBuf};

/// Workbook location, relative to the working directory.
pub const WORKBOOK_PATH: &str = "Misc./climate-data.xlsx";

pub const ANNUAL_SHEET: &str = "data";
pub const YEAR_COLUMN: &str = "Year";
pub const WINTER_COLUMN: &str = "Winter (Jan - Mar)";
pub const SPRING_COLUMN: &str = "Spring (Apr - Jun)";
pub const ANNUAL_COLUMN: &str = "Annual (Jan - Dec)";

pub const MONTHLY_SHEET: &str = "Monthly";
pub const MONTH_COLUMN: &str = "Avg. monthly Temp, Mendocino County(°F)";
pub const DIFF_COLUMN: &str = "diff C";

pub const REFERENCE_YEAR: i32 = 2007;
pub const COMPARISON_YEAR: i32 = 2020;

/// Number of leading rows searched for the header row of a sheet.
pub const HEADER_SEARCH_ROWS: usize = 10;

pub const DPI: u32 = 300;

pub const YEARLY_TRENDS_FILE: &str = "climate_yearly_trends.png";
pub const MONTHLY_COMPARISON_FILE: &str = "climate_monthly_comparison.png";
pub const SUMMARY_STATISTICS_FILE: &str = "climate_summary_statistics.png";

/// Column headers of the annual/seasonal sheet.
#[derive(Debug, Clone)]
pub struct AnnualLayout {
    pub sheet: String,
    pub year: String,
    pub winter: String,
    pub spring: String,
    pub annual: String,
}

/// Column headers of the monthly sheet.
#[derive(Debug, Clone)]
pub struct MonthlyLayout {
    pub sheet: String,
    pub label: String,
    pub year_a: String,
    pub year_b: String,
    pub diff: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workbook: PathBuf,
    pub annual: AnnualLayout,
    pub monthly: MonthlyLayout,
    pub reference_year: i32,
    pub comparison_year: i32,
    pub output_dir: PathBuf,
    pub dpi: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(WORKBOOK_PATH),
            annual: AnnualLayout {
                sheet: ANNUAL_SHEET.to_string(),
                year: YEAR_COLUMN.to_string(),
                winter: WINTER_COLUMN.to_string(),
                spring: SPRING_COLUMN.to_string(),
                annual: ANNUAL_COLUMN.to_string(),
            },
            monthly: MonthlyLayout {
                sheet: MONTHLY_SHEET.to_string(),
                label: MONTH_COLUMN.to_string(),
                year_a: year_column(REFERENCE_YEAR),
                year_b: year_column(COMPARISON_YEAR),
                diff: DIFF_COLUMN.to_string(),
            },
            reference_year: REFERENCE_YEAR,
            comparison_year: COMPARISON_YEAR,
            output_dir: PathBuf::from("."),
            dpi: DPI,
        }
    }
}

impl Config {
    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    pub fn workbook(&self) -> &Path {
        &self.workbook
    }
}

/// Monthly columns are named after the year they hold, e.g. `2007 C`.
pub fn year_column(year: i32) -> String {
    format!("{year} C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_year_columns() {
        let config = Config::default();
        assert_eq!(config.monthly.year_a, "2007 C");
        assert_eq!(config.monthly.year_b, "2020 C");
    }

    #[test]
    fn test_output_path() {
        let config = Config {
            output_dir: PathBuf::from("/tmp/out"),
            ..Config::default()
        };
        assert_eq!(
            config.output_path(YEARLY_TRENDS_FILE),
            PathBuf::from("/tmp/out/climate_yearly_trends.png")
        );
    }
}
