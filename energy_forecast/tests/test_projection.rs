use approx::assert_relative_eq;
use energy_forecast::data::{aggregate_monthly, MonthlyObservation, MonthlyReading};
use energy_forecast::{project, ForecastError, TrendDirection, YearMonth};
use rstest::rstest;

// Build an aggregated single-building series starting at `year`-`month`
fn series(year: i32, month: u32, values: &[(f64, f64)]) -> Vec<MonthlyObservation> {
    let mut period = YearMonth::new(year, month).unwrap();
    let readings: Vec<MonthlyReading> = values
        .iter()
        .map(|&(kwh, cost)| {
            let reading = MonthlyReading {
                building_id: 1,
                year: period.year,
                month: period.month,
                kwh,
                cost,
            };
            period = period.next();
            reading
        })
        .collect();
    aggregate_monthly(&[1], &readings)
}

fn linear(n: usize, start: f64, step: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let kwh = start + step * i as f64;
            (kwh, kwh * 0.15)
        })
        .collect()
}

#[test]
fn test_time_index_ignores_calendar_gaps() {
    let reading = |year: i32, month: u32, kwh: f64| MonthlyReading {
        building_id: 7,
        year,
        month,
        kwh,
        cost: kwh / 10.0,
    };
    let readings = vec![reading(2024, 2, 30.0), reading(2023, 1, 10.0), reading(2023, 5, 20.0)];
    let series = aggregate_monthly(&[7], &readings);

    let indices: Vec<usize> = series.iter().map(|o| o.time_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!((series[2].year, series[2].month), (2024, 2));
}

// Two years of steep decline with a large five-month wobble
fn noisy_decline() -> Vec<MonthlyObservation> {
    let values: Vec<(f64, f64)> = (0..24)
        .map(|i| {
            let wobble = [0.0, 300.0, -300.0, 150.0, -150.0][i % 5];
            let kwh = 3000.0 - 100.0 * i as f64 + wobble;
            (kwh, kwh * 0.12 + wobble * 0.05)
        })
        .collect();
    series(2022, 1, &values)
}

#[rstest]
#[case(None)]
#[case(Some(42))]
#[case(Some(7))]
fn test_forecast_never_negative(#[case] seed: Option<u64>) {
    // The trend crosses zero around month 31 and keeps falling
    let result = project(&noisy_decline(), 36, false, seed).unwrap();

    assert_eq!(result.summary.trend, TrendDirection::Decreasing);
    assert!(result.kwh_model.residual_std_dev > 100.0);
    for point in &result.forecast {
        assert!(point.projected_kwh >= 0.0);
        assert!(point.projected_cost >= 0.0);
        assert!(point.cost_low >= 0.0);
        assert!(point.cost_high >= point.cost_low);
    }
    assert!(result.forecast.iter().any(|p| p.projected_kwh == 0.0));
    assert!(result.forecast.iter().any(|p| p.projected_cost == 0.0));
    assert!(result.summary.price_range.min >= 0.0);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn test_short_history_rejected(#[case] months: usize) {
    let history = series(2024, 1, &linear(months, 100.0, 1.0));
    match project(&history, 3, false, None) {
        Err(ForecastError::InsufficientData { available, required }) => {
            assert_eq!(available, months);
            assert_eq!(required, 3);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_three_months_is_enough() {
    let history = series(2024, 1, &linear(3, 100.0, 10.0));
    let result = project(&history, 3, false, None).unwrap();
    assert_eq!(result.window_size, 3);
    assert_eq!(result.forecast.len(), 3);
}

#[rstest]
#[case(40, true, 24)]
#[case(10, true, 10)]
#[case(40, false, 40)]
fn test_training_window_size(
    #[case] history_len: usize,
    #[case] recent: bool,
    #[case] expected: usize,
) {
    let history = series(2020, 1, &linear(history_len, 500.0, 5.0));
    let result = project(&history, 2, recent, None).unwrap();
    assert_eq!(result.window_size, expected);
}

#[test]
fn test_unseen_months_are_seasonally_neutral() {
    let values = [
        (100.0, 10.0),
        (140.0, 12.0),
        (90.0, 9.0),
        (120.0, 11.0),
        (80.0, 8.0),
        (130.0, 13.0),
    ];
    let history = series(2024, 1, &values);
    let result = project(&history, 6, false, None).unwrap();

    for month in 7..=12 {
        assert_eq!(result.kwh_model.seasonal.factor(month), 1.0);
        assert_eq!(result.cost_model.seasonal.factor(month), 1.0);
    }
}

#[test]
fn test_forecast_rolls_over_the_year() {
    let history = series(2023, 12, &linear(12, 800.0, 4.0));
    assert_eq!(history.last().map(|o| (o.year, o.month)), Some((2024, 11)));

    let result = project(&history, 3, false, None).unwrap();
    let months: Vec<(i32, u32)> = result.forecast.iter().map(|p| (p.year, p.month)).collect();
    assert_eq!(months, vec![(2024, 12), (2025, 1), (2025, 2)]);
}

#[rstest]
#[case(None)]
#[case(Some(42))]
fn test_same_inputs_same_result(#[case] seed: Option<u64>) {
    let values: Vec<(f64, f64)> = (0..20)
        .map(|i| (900.0 + 35.0 * (i % 4) as f64, 120.0 + 6.0 * (i % 3) as f64))
        .collect();
    let history = series(2022, 4, &values);

    let first = project(&history, 9, true, seed).unwrap();
    let second = project(&history, 9, true, seed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_flat_year_is_stable() {
    let history = series(2023, 1, &vec![(1000.0, 500.0); 12]);
    let result = project(&history, 6, false, None).unwrap();

    assert_relative_eq!(result.summary.monthly_slope, 0.0, epsilon = 1e-9);
    assert_eq!(result.summary.trend, TrendDirection::Stable);
    for factor in result.kwh_model.seasonal.factors() {
        assert_relative_eq!(*factor, 1.0, epsilon = 1e-6);
    }
    assert_eq!(result.forecast.len(), 6);
    for point in &result.forecast {
        assert_relative_eq!(point.projected_kwh, 1000.0, epsilon = 1e-3);
        assert_relative_eq!(point.projected_cost, 500.0, epsilon = 1e-3);
    }
}

#[test]
fn test_steady_growth_is_never_decreasing() {
    let history = series(2021, 1, &linear(36, 1000.0, 20.0));
    let result = project(&history, 6, false, None).unwrap();

    let slope = result.summary.monthly_slope;
    assert!(slope > 0.0);
    assert!((slope - 20.0).abs() <= 20.0 * 0.05);
    assert_ne!(result.summary.trend, TrendDirection::Decreasing);
    assert_relative_eq!(result.r_squared(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_narrative_input_has_no_monthly_values() {
    let history = series(2023, 1, &linear(18, 1000.0, 60.0));
    let result = project(&history, 4, false, None).unwrap();
    let json = result.narrative_input().to_json().unwrap();

    assert!(json.contains("\"trend\": \"increasing\""));
    assert!(!json.contains("projected_kwh"));
}
