//! Chart-ready tables computed from an [`AirQualityDataset`].
//!
//! Every function here is pure: it borrows the dataset, never mutates it,
//! and returns a fresh table. An empty dataset is always an error.

use std::collections::BTreeMap;

use serde::Serialize;

use super::error::AggregateError;
use super::filter::filter_by_years;
use super::model::{
    AirQualityDataset, Category, Observation, Variable, YearRange, CATEGORY_ORDER,
};

// ---------------------------------------------------------------------------
// Category pivot: year × category counts
// ---------------------------------------------------------------------------

/// Wide table of observation counts. Rows are the distinct years in
/// ascending order; columns follow [`CATEGORY_ORDER`]. Absent combinations
/// are stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPivot {
    years: Vec<i32>,
    counts: Vec<[u64; 5]>,
}

impl CategoryPivot {
    fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut grouped: BTreeMap<i32, [u64; 5]> = BTreeMap::new();
        for obs in observations {
            grouped.entry(obs.year).or_insert([0; 5])[obs.category.index()] += 1;
        }
        let (years, counts) = grouped.into_iter().unzip();
        CategoryPivot { years, counts }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// `(year, counts in category order)` per row.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[u64; 5])> + '_ {
        self.years.iter().copied().zip(self.counts.iter())
    }

    /// One category's counts, aligned with [`CategoryPivot::years`].
    pub fn column(&self, category: Category) -> Vec<u64> {
        self.counts.iter().map(|row| row[category.index()]).collect()
    }

    pub fn column_total(&self, category: Category) -> u64 {
        self.counts.iter().map(|row| row[category.index()]).sum()
    }

    /// Reshape to long form: one `(year, category, count)` per cell, sorted
    /// by year and then by category order.
    pub fn to_long(&self) -> Vec<TrendPoint> {
        self.rows()
            .flat_map(|(year, counts)| {
                CATEGORY_ORDER.iter().map(move |&category| TrendPoint {
                    year,
                    category,
                    count: counts[category.index()],
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Trend table: long-form counts over a year range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub category: Category,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendTable {
    pub range: YearRange,
    pub points: Vec<TrendPoint>,
}

impl TrendTable {
    /// Points of a single category, in year order.
    pub fn series(&self, category: Category) -> impl Iterator<Item = &TrendPoint> + '_ {
        self.points.iter().filter(move |p| p.category == category)
    }
}

// ---------------------------------------------------------------------------
// Yearly means
// ---------------------------------------------------------------------------

/// The year whose mean is largest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPeak {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMeans {
    pub variable: Variable,
    /// `(year, mean)` in ascending year order.
    pub means: Vec<(i32, f64)>,
    pub peak: YearPeak,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMeans {
    /// One entry per variable, in [`Variable::MEANS_ORDER`].
    pub series: Vec<VariableMeans>,
}

impl YearlyMeans {
    pub fn get(&self, variable: Variable) -> Option<&VariableMeans> {
        self.series.iter().find(|s| s.variable == variable)
    }
}

/// Max-reduction over `(year, value)` pairs. Ties keep the earliest year.
pub fn peak_year(means: &[(i32, f64)]) -> Option<YearPeak> {
    means.iter().fold(None, |best: Option<YearPeak>, &(year, value)| match best {
        Some(b) if b.value >= value => Some(b),
        _ => Some(YearPeak { year, value }),
    })
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pearson correlation between the variables in [`Variable::ALL`] order.
/// A variable without variance yields NaN across its row and column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: [Variable; 3],
    pub values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    pub fn get(&self, a: Variable, b: Variable) -> f64 {
        self.values[a.index()][b.index()]
    }
}

// ---------------------------------------------------------------------------
// Pipeline operations
// ---------------------------------------------------------------------------

fn ensure_not_empty(dataset: &AirQualityDataset) -> Result<(), AggregateError> {
    if dataset.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }
    Ok(())
}

/// Count observations per year and category over the whole dataset.
pub fn distribution_by_year(dataset: &AirQualityDataset) -> Result<CategoryPivot, AggregateError> {
    ensure_not_empty(dataset)?;
    Ok(CategoryPivot::from_observations(dataset.observations()))
}

/// Category counts restricted to `start_year..=end_year`, in long form.
pub fn trend_by_range(
    dataset: &AirQualityDataset,
    start_year: i32,
    end_year: i32,
) -> Result<TrendTable, AggregateError> {
    ensure_not_empty(dataset)?;
    let range = YearRange::new(start_year, end_year)?;
    let pivot = CategoryPivot::from_observations(filter_by_years(dataset, range));
    Ok(TrendTable {
        range,
        points: pivot.to_long(),
    })
}

/// Arithmetic mean of each variable per year, plus the peak year.
pub fn yearly_means(dataset: &AirQualityDataset) -> Result<YearlyMeans, AggregateError> {
    ensure_not_empty(dataset)?;

    let mut sums: BTreeMap<i32, ([f64; 3], usize)> = BTreeMap::new();
    for obs in dataset.observations() {
        let (acc, n) = sums.entry(obs.year).or_insert(([0.0; 3], 0));
        for v in Variable::ALL {
            acc[v.index()] += v.value_of(obs);
        }
        *n += 1;
    }

    let series = Variable::MEANS_ORDER
        .into_iter()
        .map(|variable| -> Result<VariableMeans, AggregateError> {
            let means: Vec<(i32, f64)> = sums
                .iter()
                .map(|(&year, (acc, n))| (year, acc[variable.index()] / *n as f64))
                .collect();
            let peak = peak_year(&means).ok_or(AggregateError::EmptyDataset)?;
            Ok(VariableMeans {
                variable,
                means,
                peak,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(YearlyMeans { series })
}

/// Pearson correlation of PM2.5, WSPM and RAIN over every observation.
pub fn correlation_matrix(
    dataset: &AirQualityDataset,
) -> Result<CorrelationMatrix, AggregateError> {
    ensure_not_empty(dataset)?;

    let obs = dataset.observations();
    let n = obs.len() as f64;

    let mut mean = [0.0; 3];
    for o in obs {
        for v in Variable::ALL {
            mean[v.index()] += v.value_of(o);
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    // Co-moment sums around the mean; [i][i] is the variance numerator.
    let mut comoment = [[0.0f64; 3]; 3];
    for o in obs {
        let dev = Variable::ALL.map(|v| v.value_of(o) - mean[v.index()]);
        for i in 0..3 {
            for j in i..3 {
                comoment[i][j] += dev[i] * dev[j];
            }
        }
    }

    let mut values = [[f64::NAN; 3]; 3];
    for i in 0..3 {
        for j in i..3 {
            let denom = (comoment[i][i] * comoment[j][j]).sqrt();
            let r = if comoment[i][i] > 0.0 && comoment[j][j] > 0.0 && denom > 0.0 {
                if i == j {
                    1.0
                } else {
                    (comoment[i][j] / denom).clamp(-1.0, 1.0)
                }
            } else {
                f64::NAN
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        variables: Variable::ALL,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, pm25: f64, wspm: f64, rain: f64, category: Category) -> Observation {
        Observation {
            year,
            pm25,
            wspm,
            rain,
            category,
        }
    }

    fn sample() -> AirQualityDataset {
        AirQualityDataset::from_observations(vec![
            obs(2013, 10.0, 1.0, 0.0, Category::Baik),
            obs(2013, 50.0, 2.0, 0.5, Category::Sedang),
            obs(2014, 90.0, 0.5, 0.0, Category::Berbahaya),
        ])
    }

    fn mixed() -> AirQualityDataset {
        let cats = CATEGORY_ORDER;
        let rows = (0..40)
            .map(|i| {
                let year = 2013 + (i % 4);
                let pm25 = 5.0 + (i * 7 % 23) as f64 * 10.0;
                let wspm = 0.5 + (i * 3 % 11) as f64 * 0.3;
                let rain = (i * 5 % 7) as f64 * 0.2;
                obs(year, pm25, wspm, rain, cats[(i * 3 % 5) as usize])
            })
            .collect();
        AirQualityDataset::from_observations(rows)
    }

    #[test]
    fn test_distribution_worked_example() {
        let pivot = distribution_by_year(&sample()).unwrap();
        assert_eq!(pivot.years(), &[2013, 2014]);
        let rows: Vec<_> = pivot.rows().map(|(y, c)| (y, *c)).collect();
        assert_eq!(rows, vec![(2013, [1, 1, 0, 0, 0]), (2014, [0, 0, 0, 0, 1])]);
        assert_eq!(pivot.column(Category::Berbahaya), vec![0, 1]);
        assert_eq!(pivot.column(Category::Baik), vec![1, 0]);
    }

    #[test]
    fn test_distribution_column_totals_match() {
        let ds = mixed();
        let pivot = distribution_by_year(&ds).unwrap();
        assert_eq!(pivot.years(), ds.distinct_years().as_slice());
        for c in CATEGORY_ORDER {
            let expected = ds.observations().iter().filter(|o| o.category == c).count() as u64;
            assert_eq!(pivot.column_total(c), expected);
            assert_eq!(pivot.column(c).len(), pivot.years().len());
        }
        let total: u64 = pivot.rows().map(|(_, c)| c.iter().sum::<u64>()).sum();
        assert_eq!(total, ds.len() as u64);
    }

    #[test]
    fn test_empty_dataset_fails_everywhere() {
        let ds = AirQualityDataset::default();
        assert_eq!(distribution_by_year(&ds).unwrap_err(), AggregateError::EmptyDataset);
        assert_eq!(trend_by_range(&ds, 2013, 2014).unwrap_err(), AggregateError::EmptyDataset);
        assert_eq!(trend_by_range(&ds, 2014, 2013).unwrap_err(), AggregateError::EmptyDataset);
        assert_eq!(yearly_means(&ds).unwrap_err(), AggregateError::EmptyDataset);
        assert_eq!(correlation_matrix(&ds).unwrap_err(), AggregateError::EmptyDataset);
    }

    #[test]
    fn test_trend_inverted_range() {
        let err = trend_by_range(&sample(), 2014, 2013).unwrap_err();
        assert_eq!(
            err,
            AggregateError::InvalidRange {
                start: 2014,
                end: 2013,
            }
        );
    }

    #[test]
    fn test_trend_full_range_equals_long_distribution() {
        let ds = mixed();
        let bounds = ds.year_bounds().unwrap();
        let trend = trend_by_range(&ds, bounds.start(), bounds.end()).unwrap();
        let pivot = distribution_by_year(&ds).unwrap();
        assert_eq!(trend.points, pivot.to_long());
        assert_eq!(trend.range, bounds);
    }

    #[test]
    fn test_trend_long_form_order() {
        let trend = trend_by_range(&sample(), 2013, 2014).unwrap();
        assert_eq!(trend.points.len(), 10);
        let keys: Vec<(i32, Category)> =
            trend.points.iter().map(|p| (p.year, p.category)).collect();
        let mut sorted = keys.clone();
        sorted.sort_by_key(|&(y, c)| (y, c.index()));
        assert_eq!(keys, sorted);
        assert_eq!(&keys[..5], &CATEGORY_ORDER.map(|c| (2013, c))[..]);
    }

    #[test]
    fn test_trend_restricts_years() {
        let ds = mixed();
        let trend = trend_by_range(&ds, 2014, 2015).unwrap();
        assert!(trend.points.iter().all(|p| (2014..=2015).contains(&p.year)));
        assert_eq!(trend.points.len(), 2 * CATEGORY_ORDER.len());
        let baik: Vec<u64> = trend.series(Category::Baik).map(|p| p.count).collect();
        assert_eq!(baik.len(), 2);
    }

    #[test]
    fn test_trend_range_without_data_is_empty() {
        let trend = trend_by_range(&sample(), 2010, 2012).unwrap();
        assert!(trend.points.is_empty());
    }

    #[test]
    fn test_yearly_means_single_row_per_year() {
        let ds = AirQualityDataset::from_observations(vec![
            obs(2013, 10.0, 1.5, 0.2, Category::Baik),
            obs(2014, 80.0, 3.0, 0.0, Category::TidakSehat),
        ]);
        let means = yearly_means(&ds).unwrap();
        let order: Vec<Variable> = means.series.iter().map(|s| s.variable).collect();
        assert_eq!(order, Variable::MEANS_ORDER.to_vec());

        for o in ds.observations() {
            for v in Variable::ALL {
                let series = means.get(v).unwrap();
                let (_, m) = series.means.iter().find(|(y, _)| *y == o.year).unwrap();
                assert_eq!(*m, v.value_of(o));
            }
        }
        let pm_peak = means.get(Variable::Pm25).unwrap().peak;
        assert_eq!((pm_peak.year, pm_peak.value), (2014, 80.0));
        let rain_peak = means.get(Variable::Rain).unwrap().peak;
        assert_eq!((rain_peak.year, rain_peak.value), (2013, 0.2));
    }

    #[test]
    fn test_yearly_means_averages() {
        let means = yearly_means(&sample()).unwrap();
        let pm = means.get(Variable::Pm25).unwrap();
        assert_eq!(pm.means, vec![(2013, 30.0), (2014, 90.0)]);
        let wspm = means.get(Variable::Wspm).unwrap();
        assert_eq!(wspm.means, vec![(2013, 1.5), (2014, 0.5)]);
        assert_eq!(wspm.peak.year, 2013);
    }

    #[test]
    fn test_peak_year_ties_keep_earliest() {
        let peak = peak_year(&[(2013, 2.0), (2014, 5.0), (2015, 5.0)]).unwrap();
        assert_eq!((peak.year, peak.value), (2014, 5.0));
        assert!(peak_year(&[]).is_none());
    }

    #[test]
    fn test_correlation_symmetric_unit_diagonal() {
        let m = correlation_matrix(&mixed()).unwrap();
        for i in 0..3 {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
                assert!((-1.0..=1.0).contains(&m.values[i][j]));
            }
        }
    }

    #[test]
    fn test_correlation_perfect_linear() {
        let ds = AirQualityDataset::from_observations(
            (0..5)
                .map(|i| {
                    let x = i as f64;
                    obs(2013, x, 2.0 * x + 1.0, 10.0 - x, Category::Baik)
                })
                .collect(),
        );
        let m = correlation_matrix(&ds).unwrap();
        assert!((m.get(Variable::Pm25, Variable::Wspm) - 1.0).abs() < 1e-12);
        assert!((m.get(Variable::Pm25, Variable::Rain) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_zero_variance_is_nan() {
        let ds = AirQualityDataset::from_observations(vec![
            obs(2013, 10.0, 1.0, 0.0, Category::Baik),
            obs(2013, 20.0, 3.0, 0.0, Category::Sedang),
            obs(2014, 30.0, 2.0, 0.0, Category::Sedang),
        ]);
        let m = correlation_matrix(&ds).unwrap();
        assert_eq!(m.get(Variable::Pm25, Variable::Pm25), 1.0);
        assert!(m.get(Variable::Rain, Variable::Rain).is_nan());
        assert!(m.get(Variable::Rain, Variable::Pm25).is_nan());
        assert!(m.get(Variable::Wspm, Variable::Rain).is_nan());
        assert!(!m.get(Variable::Pm25, Variable::Wspm).is_nan());
    }

    #[test]
    fn test_pipeline_leaves_dataset_untouched() {
        let ds = mixed();
        let before = ds.observations().to_vec();
        let _ = distribution_by_year(&ds).unwrap();
        let _ = trend_by_range(&ds, 2013, 2014).unwrap();
        let _ = yearly_means(&ds).unwrap();
        let _ = correlation_matrix(&ds).unwrap();
        assert_eq!(ds.observations(), before.as_slice());
        assert_eq!(distribution_by_year(&ds).unwrap(), distribution_by_year(&ds).unwrap());
    }
}
