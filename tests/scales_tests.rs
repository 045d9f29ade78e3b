use gpui_hydrograph::data_types::{HydrographConfig, Observation};
use gpui_hydrograph::scales::{time_domain, value_domain, ChartScale, HydrographScales};

const HOUR: f64 = 3_600_000.0;
const T0: f64 = 1_496_293_200_000.0; // 2017-06-01T05:00:00Z

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn config() -> HydrographConfig {
    // plot area 330 x 240
    HydrographConfig::new("unused").with_size(400.0, 300.0)
}

#[test]
fn test_log_scale_endpoints() {
    let scale = ChartScale::new_log((20.0, 2000.0), (240.0, 0.0));
    assert!(scale.is_log());
    assert!(approx(scale.map(20.0).unwrap(), 240.0));
    assert!(approx(scale.map(2000.0).unwrap(), 0.0));
    // one decade up from the floor is halfway
    assert!(approx(scale.map(200.0).unwrap(), 120.0));
}

#[test]
fn test_log_scale_rejects_non_positive() {
    let scale = ChartScale::new_log((20.0, 2000.0), (240.0, 0.0));
    assert_eq!(scale.map(0.0), None);
    assert_eq!(scale.map(-5.0), None);
    assert_eq!(scale.map(f64::NAN), None);
}

#[test]
fn test_readings_under_the_floor_sit_on_the_bottom_edge() {
    let data = vec![Observation::new("A", T0, 5.0), Observation::new("A", T0 + HOUR, 1000.0)];
    let scales = HydrographScales::from_observations(&data, &config());
    assert_eq!(scales.y.domain(), (20.0, 1000.0));

    let low = scales.project(&data[0]).unwrap();
    assert!(approx(low.y, 240.0), "expected the bottom edge, got {}", low.y);
    let high = scales.project(&data[1]).unwrap();
    assert!(approx(high.y, 0.0));
}

#[test]
fn test_collapsed_domains_are_widened() {
    let linear = ChartScale::new_linear((T0, T0), (0.0, 330.0));
    let (lo, hi) = linear.domain();
    assert!(lo < T0 && hi > T0);
    assert!(approx(linear.map(T0).unwrap(), 165.0));

    let log = ChartScale::new_log((50.0, 50.0), (240.0, 0.0));
    assert_eq!(log.domain(), (25.0, 100.0));
    assert!(approx(log.map(50.0).unwrap(), 120.0));
}

#[test]
fn test_time_scale_is_linear() {
    let scale = ChartScale::new_linear((T0, T0 + 10.0 * HOUR), (0.0, 330.0));
    assert!(!scale.is_log());
    assert!(approx(scale.map(T0).unwrap(), 0.0));
    assert!(approx(scale.map(T0 + 5.0 * HOUR).unwrap(), 165.0));
    assert!(approx(scale.map(T0 + 10.0 * HOUR).unwrap(), 330.0));
}

#[test]
fn test_value_domain_uses_floor_and_plottable_max() {
    let data = vec![
        Observation::new("A", T0, 150.0),
        Observation::new("A", T0 + HOUR, f64::NAN),
        Observation::new("B", T0, 900.0),
        Observation::new("B", T0 + HOUR, -1.0),
    ];
    assert_eq!(value_domain(&data, 20.0), Some((20.0, 900.0)));
    assert_eq!(time_domain(&data), Some((T0, T0 + HOUR)));
}

#[test]
fn test_value_domain_never_drops_below_floor() {
    let data = vec![Observation::new("A", T0, 5.0), Observation::new("A", T0 + HOUR, 10.0)];
    assert_eq!(value_domain(&data, 20.0), Some((20.0, 20.0)));

    // with nothing above the floor the axis keeps the floor at the bottom
    let scales = HydrographScales::from_observations(&data, &config());
    assert_eq!(scales.y.domain(), (20.0, 200.0));
    for obs in &data {
        let p = scales.project(obs).unwrap();
        assert!(approx(p.y, 240.0), "{} projected to {}", obs.value, p.y);
    }
}

#[test]
fn test_projected_values_stay_inside_the_plot() {
    let values = [0.5, 5.0, 19.9, 20.0, 150.0, 4000.0, 12.0, 900.0];
    let data: Vec<Observation> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation::new("A", T0 + i as f64 * HOUR, *v))
        .collect();
    let scales = HydrographScales::from_observations(&data, &config());
    for obs in &data {
        let p = scales.project(obs).unwrap();
        assert!((-1e-9..=240.0 + 1e-9).contains(&p.y), "{} projected to {}", obs.value, p.y);
        assert!((-1e-9..=330.0 + 1e-9).contains(&p.x));
    }
}

#[test]
fn test_empty_dataset_falls_back() {
    let scales = HydrographScales::from_observations(&[], &config());
    assert_eq!(scales.time_domain, None);
    assert_eq!(scales.value_domain, None);
    assert_eq!(scales.x.domain(), (0.0, 1.0));
    assert_eq!(scales.y.domain(), (20.0, 200.0));
}

#[test]
fn test_project_skips_unplottable() {
    let data = vec![
        Observation::new("A", T0, 100.0),
        Observation::new("A", T0 + HOUR, 0.0),
        Observation::new("A", T0 + 2.0 * HOUR, 1000.0),
    ];
    let scales = HydrographScales::from_observations(&data, &config());
    let first = scales.project(&data[0]).unwrap();
    assert!(approx(first.x, 0.0));
    assert!(scales.project(&data[1]).is_none());
    let last = scales.project(&data[2]).unwrap();
    assert!(approx(last.x, 330.0));
    assert!(approx(last.y, 0.0));
}

#[test]
fn test_value_ticks_stay_in_domain() {
    let scale = ChartScale::new_log((20.0, 2000.0), (240.0, 0.0));
    for tick in scale.ticks(10) {
        assert!((20.0..=2000.0).contains(&tick), "tick {} outside domain", tick);
        assert!(!scale.format_tick(tick).contains('.'));
    }
}

#[test]
fn test_time_ticks_are_labelled_by_day() {
    let scale = ChartScale::new_linear((T0, T0 + 5.0 * 24.0 * HOUR), (0.0, 330.0));
    let ticks = scale.ticks(10);
    assert!(!ticks.is_empty());
    // 12-hour steps from UTC midnight, the first lands at noon on June 1
    assert_eq!(scale.format_tick(ticks[0]), "June  1");
}
