use crate::models::{Measure, MeasurePeriod};

/// Period index used for the leak ("new code") value when none is given.
pub const DEFAULT_PERIOD_INDEX: i32 = 1;

/// Value of `measure` on the period at `period_index` (default
/// [`DEFAULT_PERIOD_INDEX`]), or `None` if the measure has no such period.
pub fn get_leak_value(measure: Option<&Measure>, period_index: Option<i32>) -> Option<String> {
    let measure = measure?;
    period_value(
        measure.periods.as_deref(),
        period_index.unwrap_or(DEFAULT_PERIOD_INDEX),
    )
}

pub fn period_value(periods: Option<&[MeasurePeriod]>, index: i32) -> Option<String> {
    periods?
        .iter()
        .find(|p| p.index == index)
        .map(|p| p.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure_with(periods: Option<Vec<MeasurePeriod>>) -> Measure {
        Measure {
            metric: "coverage".to_string(),
            value: Some("81.2".to_string()),
            periods,
        }
    }

    fn period(index: i32, value: &str) -> MeasurePeriod {
        MeasurePeriod {
            index,
            value: value.to_string(),
        }
    }

    #[test]
    fn returns_first_period_by_default() {
        let m = measure_with(Some(vec![period(2, "0.4"), period(1, "1.5")]));
        assert_eq!(get_leak_value(Some(&m), None).as_deref(), Some("1.5"));
    }

    #[test]
    fn returns_requested_period() {
        let m = measure_with(Some(vec![period(1, "1.5"), period(3, "-2.0")]));
        assert_eq!(get_leak_value(Some(&m), Some(3)).as_deref(), Some("-2.0"));
    }

    #[test]
    fn none_without_measure() {
        assert_eq!(get_leak_value(None, None), None);
    }

    #[test]
    fn none_without_periods() {
        let m = measure_with(None);
        assert_eq!(get_leak_value(Some(&m), None), None);
    }

    #[test]
    fn none_when_no_period_matches() {
        let m = measure_with(Some(vec![period(2, "0.4")]));
        assert_eq!(get_leak_value(Some(&m), None), None);
        assert_eq!(get_leak_value(Some(&m), Some(5)), None);
    }

    #[test]
    fn empty_period_list_has_no_leak() {
        let m = measure_with(Some(Vec::new()));
        assert_eq!(get_leak_value(Some(&m), Some(1)), None);
    }
}
