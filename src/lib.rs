use std::{ops::Range, path::PathBuf};

use time::Month;

pub mod config;
pub mod error;
pub mod label;
pub mod loader;
pub mod render;
pub mod stats;
pub mod theme;

pub use config::Config;
pub use error::{DataError, Error, RenderError};
pub use loader::load_workbook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Annual,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Winter, Season::Spring, Season::Annual];

    pub fn value(&self, record: &AnnualRecord) -> f64 {
        match self {
            Season::Winter => record.winter_temp,
            Season::Spring => record.spring_temp,
            Season::Annual => record.annual_temp,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Annual => "Annual",
        }
    }

    /// Legend label with the months the season covers.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter (Jan-Mar)",
            Season::Spring => "Spring (Apr-Jun)",
            Season::Annual => "Annual (Jan-Dec)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualRecord {
    pub year: i32,
    pub winter_temp: f64,
    pub spring_temp: f64,
    pub annual_temp: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AnnualTable {
    // Records are sorted by year and years are unique
    records: Vec<AnnualRecord>,
}

impl AnnualTable {
    /// Sorts the records by year, refusing duplicated years.
    pub fn new(mut records: Vec<AnnualRecord>) -> Result<Self, DataError> {
        records.sort_by_key(|record| record.year);
        if let Some(pair) = records.windows(2).find(|pair| pair[0].year == pair[1].year) {
            return Err(DataError::DuplicateYear(pair[0].year));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, year: i32) -> Option<&AnnualRecord> {
        self.records
            .binary_search_by_key(&year, |record| record.year)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().map(|record| record.year)
    }

    pub fn series(&self, season: Season) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.records
            .iter()
            .map(move |record| (record.year, season.value(record)))
    }

    /// First and last year, both included.
    pub fn year_range(&self) -> Option<Range<i32>> {
        Some(self.records.first()?.year..self.records.last()?.year)
    }

    /// Lowest to highest temperature across the three seasonal series.
    pub fn temperature_range(&self) -> Option<Range<f64>> {
        let values = || {
            self.records
                .iter()
                .flat_map(|record| Season::ALL.map(|season| season.value(record)))
        };
        let low = values().min_by(|left, right| left.total_cmp(right))?;
        let high = values().max_by(|left, right| left.total_cmp(right))?;
        Some(low..high)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub month_label: String,
    pub month: Option<Month>,
    pub temp_year_a: f64,
    pub temp_year_b: f64,
    /// Stored difference, year b minus year a, as rounded in the workbook.
    pub diff: f64,
}

impl MonthlyRecord {
    pub fn short_label(&self) -> String {
        match self.month {
            Some(month) => label::abbreviation(month).to_string(),
            None => self.month_label.chars().take(3).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonthlyTable {
    records: Vec<MonthlyRecord>,
}

impl MonthlyTable {
    pub fn new(records: Vec<MonthlyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both sheets of the workbook, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct Tables {
    pub annual: AnnualTable,
    pub monthly: MonthlyTable,
}

/// Load the workbook then render the three figures, in that order.
/// Returns the paths of the written images.
pub fn run(config: &Config) -> Result<Vec<PathBuf>, Error> {
    log::info!("Loading climate data...");
    let tables = load_workbook(config.workbook(), config)?;

    log::info!("Creating yearly temperature plot...");
    let yearly = config.output_path(config::YEARLY_TRENDS_FILE);
    render::yearly::render(&yearly, &tables.annual, config)?;

    log::info!("Creating monthly comparison plot...");
    let monthly = config.output_path(config::MONTHLY_COMPARISON_FILE);
    render::monthly::render(&monthly, &tables.monthly, config)?;

    log::info!("Creating summary statistics plot...");
    let summary = config.output_path(config::SUMMARY_STATISTICS_FILE);
    render::summary::render(&summary, &tables, config)?;

    Ok(vec![yearly, monthly, summary])
}
