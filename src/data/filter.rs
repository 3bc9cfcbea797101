use super::model::{AirQualityDataset, Observation, YearRange};

// ---------------------------------------------------------------------------
// Year-range filtering
// ---------------------------------------------------------------------------

/// Borrow every observation whose year falls inside `range` (inclusive).
pub fn filter_by_years(dataset: &AirQualityDataset, range: YearRange) -> Vec<&Observation> {
    dataset
        .observations()
        .iter()
        .filter(|obs| range.contains(obs.year))
        .collect()
}

/// Bounds offered by the year sliders: the data's own min/max year.
/// `None` when there is nothing to pick from.
pub fn slider_bounds(dataset: &AirQualityDataset) -> Option<YearRange> {
    dataset.year_bounds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Category;

    fn obs(year: i32) -> Observation {
        Observation {
            year,
            pm25: 12.0,
            wspm: 2.0,
            rain: 0.0,
            category: Category::Baik,
        }
    }

    #[test]
    fn test_filter_is_inclusive() {
        let ds = AirQualityDataset::from_observations(
            (2013..=2017).map(obs).collect(),
        );
        let range = YearRange::new(2014, 2016).unwrap();
        let years: Vec<i32> = filter_by_years(&ds, range).iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2014, 2015, 2016]);
    }

    #[test]
    fn test_filter_gap_yields_nothing() {
        let ds = AirQualityDataset::from_observations(vec![obs(2013), obs(2017)]);
        let range = YearRange::new(2014, 2016).unwrap();
        assert!(filter_by_years(&ds, range).is_empty());
    }

    #[test]
    fn test_slider_bounds() {
        let ds = AirQualityDataset::from_observations(vec![obs(2016), obs(2013)]);
        let bounds = slider_bounds(&ds).unwrap();
        assert_eq!((bounds.start(), bounds.end()), (2013, 2016));
        assert!(slider_bounds(&AirQualityDataset::default()).is_none());
    }
}
