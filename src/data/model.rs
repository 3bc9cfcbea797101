use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AggregateError;

// ---------------------------------------------------------------------------
// Category – the closed set of air-quality severity labels
// ---------------------------------------------------------------------------

/// Air-quality severity label, ranked from best to worst.
///
/// The discriminant doubles as the column index in every category-keyed
/// table, so variant order must stay in sync with [`CATEGORY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Baik,
    Sedang,
    #[serde(rename = "Tidak Sehat")]
    TidakSehat,
    #[serde(rename = "Sangat Tidak Sehat")]
    SangatTidakSehat,
    Berbahaya,
}

/// Display and grouping order of the five categories.
pub const CATEGORY_ORDER: [Category; 5] = [
    Category::Baik,
    Category::Sedang,
    Category::TidakSehat,
    Category::SangatTidakSehat,
    Category::Berbahaya,
];

impl Category {
    /// The label as it appears in the source data.
    pub fn label(self) -> &'static str {
        match self {
            Category::Baik => "Baik",
            Category::Sedang => "Sedang",
            Category::TidakSehat => "Tidak Sehat",
            Category::SangatTidakSehat => "Sangat Tidak Sehat",
            Category::Berbahaya => "Berbahaya",
        }
    }

    /// Position within [`CATEGORY_ORDER`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Category {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        CATEGORY_ORDER
            .into_iter()
            .find(|c| c.label() == trimmed)
            .ok_or_else(|| AggregateError::UnknownCategory(trimmed.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Variable – the three measured quantities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variable {
    Pm25,
    Wspm,
    Rain,
}

impl Variable {
    /// Correlation-matrix order.
    pub const ALL: [Variable; 3] = [Variable::Pm25, Variable::Wspm, Variable::Rain];

    /// Order in which the yearly-mean charts are drawn.
    pub const MEANS_ORDER: [Variable; 3] = [Variable::Wspm, Variable::Rain, Variable::Pm25];

    /// Column name in the source data.
    pub fn column(self) -> &'static str {
        match self {
            Variable::Pm25 => "PM2.5",
            Variable::Wspm => "WSPM",
            Variable::Rain => "RAIN",
        }
    }

    /// Read this variable from an observation.
    pub fn value_of(self, obs: &Observation) -> f64 {
        match self {
            Variable::Pm25 => obs.pm25,
            Variable::Wspm => obs.wspm,
            Variable::Rain => obs.rain,
        }
    }

    /// Position within [`Variable::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// RawRecord / Observation – one row of the source table
// ---------------------------------------------------------------------------

/// A row as read from disk, before validation. Extra columns in the file
/// are ignored by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub year: i32,
    #[serde(rename = "PM2.5")]
    pub pm25: Option<f64>,
    #[serde(rename = "WSPM")]
    pub wspm: Option<f64>,
    #[serde(rename = "RAIN")]
    pub rain: Option<f64>,
    #[serde(rename = "Kategori Kualitas Udara", alias = "AirQualityCategory")]
    pub category: String,
}

/// A validated measurement record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub year: i32,
    pub pm25: f64,
    pub wspm: f64,
    pub rain: f64,
    pub category: Category,
}

impl Observation {
    /// Validate a raw record. `row` is the 1-based data row, only used for
    /// error reporting.
    pub fn from_raw(row: usize, raw: RawRecord) -> Result<Self, AggregateError> {
        let require = |value: Option<f64>, variable: Variable| match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(AggregateError::MissingValue { row, variable }),
        };

        Ok(Observation {
            year: raw.year,
            pm25: require(raw.pm25, Variable::Pm25)?,
            wspm: require(raw.wspm, Variable::Wspm)?,
            rain: require(raw.rain, Variable::Rain)?,
            category: raw.category.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// YearRange – inclusive year filter
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` year interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, AggregateError> {
        if start > end {
            return Err(AggregateError::InvalidRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Clamp a single year into this range.
    pub fn clamp_year(&self, year: i32) -> i32 {
        year.clamp(self.start, self.end)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// AirQualityDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All observations for one station. Never mutated after construction;
/// the app shares it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AirQualityDataset {
    observations: Vec<Observation>,
    year_bounds: Option<YearRange>,
}

impl AirQualityDataset {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let min = observations.iter().map(|o| o.year).min();
        let max = observations.iter().map(|o| o.year).max();
        let year_bounds = match (min, max) {
            (Some(start), Some(end)) => Some(YearRange { start, end }),
            _ => None,
        };
        AirQualityDataset {
            observations,
            year_bounds,
        }
    }

    /// Validate raw rows. The first bad row aborts the whole load.
    pub fn from_records<I>(records: I) -> Result<Self, AggregateError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let observations = records
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Observation::from_raw(i + 1, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_observations(observations))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// `(min year, max year)` of the data, `None` when empty.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds
    }

    /// Sorted distinct years.
    pub fn distinct_years(&self) -> Vec<i32> {
        self.observations
            .iter()
            .map(|o| o.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: i32, pm25: Option<f64>, category: &str) -> RawRecord {
        RawRecord {
            year,
            pm25,
            wspm: Some(1.5),
            rain: Some(0.0),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_category_parse_all_labels() {
        for c in CATEGORY_ORDER {
            assert_eq!(c.label().parse::<Category>().unwrap(), c);
        }
        assert_eq!(" Tidak Sehat ".parse::<Category>().unwrap(), Category::TidakSehat);
    }

    #[test]
    fn test_category_parse_unknown() {
        let err = "Sangat Baik".parse::<Category>().unwrap_err();
        assert_eq!(err, AggregateError::UnknownCategory("Sangat Baik".to_string()));
    }

    #[test]
    fn test_category_serializes_as_label() {
        for c in CATEGORY_ORDER {
            assert_eq!(serde_json::to_value(c).unwrap(), c.label());
        }
    }

    #[test]
    fn test_category_index_matches_order() {
        for (i, c) in CATEGORY_ORDER.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_year_range_rejects_inverted() {
        assert_eq!(
            YearRange::new(2016, 2014).unwrap_err(),
            AggregateError::InvalidRange {
                start: 2016,
                end: 2014,
            }
        );
        let r = YearRange::new(2014, 2014).unwrap();
        assert!(r.contains(2014));
        assert!(!r.contains(2015));
    }

    #[test]
    fn test_year_range_clamp() {
        let bounds = YearRange::new(2013, 2017).unwrap();
        assert_eq!(bounds.clamp_year(2015), 2015);
        assert_eq!(bounds.clamp_year(1999), 2013);
        assert_eq!(bounds.clamp_year(2042), 2017);
    }

    #[test]
    fn test_from_records_bounds_and_years() {
        let ds = AirQualityDataset::from_records(vec![
            raw(2015, Some(10.0), "Baik"),
            raw(2013, Some(20.0), "Sedang"),
            raw(2015, Some(30.0), "Berbahaya"),
        ])
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_bounds(), Some(YearRange::new(2013, 2015).unwrap()));
        assert_eq!(ds.distinct_years(), vec![2013, 2015]);
    }

    #[test]
    fn test_from_records_missing_value() {
        let err = AirQualityDataset::from_records(vec![
            raw(2013, Some(10.0), "Baik"),
            raw(2013, None, "Baik"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            AggregateError::MissingValue {
                row: 2,
                variable: Variable::Pm25,
            }
        );
    }

    #[test]
    fn test_from_records_nan_is_missing() {
        let err = AirQualityDataset::from_records(vec![raw(2013, Some(f64::NAN), "Baik")])
            .unwrap_err();
        assert!(matches!(err, AggregateError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_from_records_unknown_category() {
        let err = AirQualityDataset::from_records(vec![raw(2013, Some(1.0), "Hazardous")])
            .unwrap_err();
        assert_eq!(err, AggregateError::UnknownCategory("Hazardous".to_string()));
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = AirQualityDataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds(), None);
        assert!(ds.distinct_years().is_empty());
    }
}
