use std::cell::RefCell;
use std::rc::Rc;

use gpui::Point;
use gpui_hydrograph::data_types::{HydrographConfig, Observation};
use gpui_hydrograph::{Chart, FocusState, SiteHandle, SiteLegend, SiteRegistry};

const HOUR: f64 = 3_600_000.0;
const T0: f64 = 1_496_275_200_000.0;

fn config() -> HydrographConfig {
    HydrographConfig::new("unused").with_size(400.0, 300.0)
}

fn hourly(key: &str, values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Observation::new(key, T0 + i as f64 * HOUR, *v).with_display(
                "2017-06-01",
                format!("{:02}:00", i),
                "CDT",
            )
        })
        .collect()
}

fn two_sites() -> Vec<Observation> {
    let mut data = hourly("05420680", &[100.0, 200.0, 300.0, 400.0]);
    data.extend(hourly("05463500", &[1000.0, 900.0, 800.0, 700.0]));
    data
}

fn cell_of<R: SiteRegistry>(chart: &Chart<R>, key: &str) -> usize {
    chart
        .tessellation()
        .cells()
        .iter()
        .position(|c| chart.working_data()[c.observation].key == key)
        .unwrap()
}

#[test]
fn test_click_removes_the_owning_site() {
    // A=[(t0,5)], B=[(t0,5),(t1,10)]
    let data = vec![
        Observation::new("A", T0, 5.0),
        Observation::new("B", T0, 5.0),
        Observation::new("B", T0 + HOUR, 10.0),
    ];
    let mut chart = Chart::with_data(config(), SiteLegend::new(), data);
    assert_eq!(chart.series().len(), 2);
    assert_eq!(chart.tessellation().len(), 3);

    let a_cell = chart.tessellation().cell_for_observation(0).unwrap();
    assert!(chart.click(a_cell));

    assert_eq!(chart.working_data().len(), 2);
    assert!(chart.working_data().iter().all(|o| o.key == "B"));
    assert_eq!(chart.series().len(), 1);
    assert_eq!(chart.tessellation().len(), 2);
    assert_eq!(chart.surface().unwrap().paths.len(), 1);
    // the original dataset is untouched
    assert_eq!(chart.original_keys().to_vec(), vec!["A", "B"]);
}

/// Every path vertex lies in the plot area and every hit region's owner
/// sits inside the interactive extent.
fn assert_on_canvas<R: SiteRegistry>(chart: &Chart<R>) {
    let surface = chart.surface().unwrap();
    let (w, h) = (surface.plot_width(), surface.plot_height());
    for path in &surface.paths {
        for p in path.segments.iter().flatten() {
            assert!(
                (-1e-9..=w + 1e-9).contains(&p.x) && (-1e-9..=h + 1e-9).contains(&p.y),
                "vertex {:?} of {} is off the plot",
                p,
                path.key
            );
        }
    }
    let extent = chart.tessellation().extent();
    for region in &surface.hit_regions {
        let site = chart.tessellation().cell(region.cell).unwrap().site;
        assert!(extent.contains(site), "site {:?} outside {:?}", site, extent);
    }
}

#[test]
fn test_scenario_points_land_on_canvas() {
    let data = vec![
        Observation::new("A", T0, 5.0),
        Observation::new("B", T0, 5.0),
        Observation::new("B", T0 + HOUR, 10.0),
    ];
    let mut chart = Chart::with_data(config(), SiteLegend::new(), data);
    assert_on_canvas(&chart);

    let (lo, hi) = chart.scales().y.domain();
    assert!(lo < hi);
    for cell in chart.tessellation().cells() {
        assert!(cell.site.y <= 240.0 + 1e-9 && cell.site.y >= -1e-9);
    }

    // the marker for a sub-floor reading stays on the plot
    chart.hover_enter(chart.tessellation().cell_for_observation(0).unwrap());
    let marker = chart.surface().unwrap().focus.position;
    assert!((marker.y - 240.0).abs() < 1e-6, "marker at {:?}", marker);
    assert_eq!(chart.surface().unwrap().focus.label, "A: 5 cfs  ");

    assert!(chart.remove_site("A"));
    assert_on_canvas(&chart);
}

#[test]
fn test_mixed_range_stays_on_canvas() {
    let mut data = hourly("low", &[5.0, 8.0, 12.0, 30.0]);
    data.extend(hourly("high", &[1000.0, 2500.0, 400.0, 90.0]));
    let chart = Chart::with_data(config(), SiteLegend::new(), data);
    assert_on_canvas(&chart);
    assert_eq!(chart.surface().unwrap().hit_regions.len(), 8);
}

#[test]
fn test_removing_an_absent_key_is_a_no_op() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    assert!(chart.remove_site("05420680"));
    let generation = chart.generation();
    let remaining = chart.working_data().to_vec();

    assert!(!chart.remove_site("05420680"));
    assert!(!chart.remove_site("never-there"));
    assert_eq!(chart.working_data(), remaining.as_slice());
    assert_eq!(chart.generation(), generation);
}

#[test]
fn test_hover_shows_marker_and_highlights_site() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    let cell = cell_of(&chart, "05463500");
    chart.hover_enter(cell);

    let site = chart.tessellation().cell(cell).unwrap().site;
    let focus = &chart.surface().unwrap().focus;
    assert_eq!(focus.position, site);
    assert_eq!(focus.label, "05463500: 1000 cfs 00:00 CDT");
    assert_eq!(chart.focus().cell(), Some(cell));
    assert_eq!(chart.focused_observation().unwrap().key, "05463500");

    let hovered: Vec<&str> = chart.registry().hovered().map(|e| e.name.as_str()).collect();
    assert_eq!(hovered, vec!["#05463500"]);

    chart.hover_exit(cell);
    assert!(chart.focus().is_idle());
    assert!(chart.surface().unwrap().focus.is_parked());
    assert_eq!(chart.registry().hovered().count(), 0);
}

#[test]
fn test_at_most_one_site_highlighted() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    let a = cell_of(&chart, "05420680");
    let b = cell_of(&chart, "05463500");

    chart.hover_enter(a);
    chart.hover_enter(b);
    let hovered: Vec<&str> = chart.registry().hovered().map(|e| e.name.as_str()).collect();
    assert_eq!(hovered, vec!["#05463500"]);

    // a late exit for the region that is no longer focused changes nothing
    chart.hover_exit(a);
    assert_eq!(chart.focus().cell(), Some(b));
    assert_eq!(chart.registry().hovered().count(), 1);
}

#[test]
fn test_pointer_moves_drive_focus() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    let cell = cell_of(&chart, "05420680");
    let site = chart.tessellation().cell(cell).unwrap().site;

    chart.pointer_move(site);
    assert_eq!(chart.focus().cell(), Some(cell));

    // nudging inside the same region keeps the marker in place
    chart.pointer_move(Point::new(site.x + 0.1, site.y));
    assert_eq!(chart.focus().cell(), Some(cell));
    assert_eq!(chart.surface().unwrap().focus.position, site);

    chart.pointer_move(Point::new(-1000.0, -1000.0));
    assert!(chart.focus().is_idle());

    chart.pointer_move(site);
    chart.pointer_leave();
    assert!(chart.focus().is_idle());
    assert_eq!(chart.registry().hovered().count(), 0);
}

#[test]
fn test_removing_the_focused_site_clears_its_highlight() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    let cell = cell_of(&chart, "05420680");
    let site = chart.tessellation().cell(cell).unwrap().site;
    chart.pointer_move(site);
    assert_eq!(chart.registry().hovered().count(), 1);

    assert!(chart.pointer_click(site));
    assert_eq!(chart.focus(), FocusState::Idle);
    assert_eq!(chart.registry().hovered().count(), 0);
    assert!(chart.surface().unwrap().focus.is_parked());
    assert!(chart.surface().unwrap().path_for("05420680").is_none());
    // the legend keeps the entry of the removed site
    assert_eq!(chart.registry().entries().len(), 2);
}

#[test]
fn test_removing_the_last_series() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), hourly("A", &[50.0, 60.0]));
    let site = chart.tessellation().cells()[0].site;
    assert!(chart.pointer_click(site));

    assert!(chart.working_data().is_empty());
    let surface = chart.surface().unwrap();
    assert!(surface.paths.is_empty());
    assert!(surface.hit_regions.is_empty());
    assert_eq!(chart.tessellation().len(), 0);
    assert_eq!(chart.scales().time_domain, None);

    assert!(!chart.pointer_click(site));
    assert!(!chart.click(0));
    chart.pointer_move(site);
    assert!(chart.focus().is_idle());
}

#[test]
fn test_clear_focus_from_any_state() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    chart.clear_focus();
    assert!(chart.focus().is_idle());
    chart.hover_enter(0);
    chart.clear_focus();
    assert!(chart.focus().is_idle());
    assert_eq!(chart.registry().hovered().count(), 0);
}

#[test]
fn test_data_after_teardown_is_ignored() {
    let mut chart = Chart::new(config(), SiteLegend::new());
    assert!(chart.is_mounted());
    assert!(chart.surface().is_none());

    chart.teardown();
    chart.on_data_ready(Ok(two_sites())).unwrap();
    assert!(!chart.is_loaded());
    assert!(chart.surface().is_none());
    assert!(chart.working_data().is_empty());
}

#[test]
fn test_remove_after_teardown_is_ignored() {
    let mut chart = Chart::with_data(config(), SiteLegend::new(), two_sites());
    chart.teardown();
    assert!(!chart.remove_site("05420680"));
    assert_eq!(chart.working_data().len(), 8);
    assert!(chart.surface().is_none());
}

#[test]
fn test_second_delivery_is_ignored() {
    let mut chart = Chart::new(config(), SiteLegend::new());
    chart.on_data_ready(Ok(two_sites())).unwrap();
    assert!(chart.is_loaded());
    chart.on_data_ready(Ok(hourly("C", &[1.0]))).unwrap();
    assert_eq!(chart.series().len(), 2);
    assert_eq!(chart.generation(), 1);
}

#[test]
fn test_failed_delivery_leaves_no_surface() {
    let mut chart = Chart::new(config(), SiteLegend::new());
    let result = chart.on_data_ready(Err(eyre::eyre!("connection refused")));
    assert!(result.is_err());
    assert!(!chart.is_loaded());
    assert!(chart.surface().is_none());
}

/// Registry that records every hover toggle.
#[derive(Default)]
struct Recorder {
    names: Vec<String>,
    toggles: Vec<(String, bool)>,
}

impl SiteRegistry for Recorder {
    fn resolve(&mut self, name: &str) -> Option<SiteHandle> {
        // only sites with a drawn element can be highlighted
        if name.ends_with("680") {
            return None;
        }
        let index = match self.names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        };
        Some(SiteHandle::new(index))
    }

    fn set_hover(&mut self, site: SiteHandle, hovered: bool) {
        self.toggles.push((self.names[site.index()].clone(), hovered));
    }
}

#[test]
fn test_custom_registry_receives_hover_toggles() {
    let mut chart = Chart::with_data(config(), Recorder::default(), two_sites());
    let a = cell_of(&chart, "05420680");
    let b = cell_of(&chart, "05463500");

    // no element for the first site, focus still works
    chart.hover_enter(a);
    assert_eq!(chart.focus().cell(), Some(a));
    assert!(chart.registry().toggles.is_empty());

    chart.hover_enter(b);
    chart.clear_focus();
    assert_eq!(
        chart.registry().toggles,
        vec![("#05463500".to_string(), true), ("#05463500".to_string(), false)]
    );
}

#[test]
fn test_shared_legend_stays_with_its_owner() {
    let legend = Rc::new(RefCell::new(SiteLegend::new()));
    let mut chart = Chart::with_data(config(), legend.clone(), two_sites());
    assert_eq!(legend.borrow().entries().len(), 2);

    let cell = cell_of(&chart, "05420680");
    chart.hover_enter(cell);
    let hovered: Vec<String> = legend.borrow().hovered().map(|e| e.name.clone()).collect();
    assert_eq!(hovered, vec!["#05420680".to_string()]);

    drop(chart);
    // the chart is gone, the site list is not
    assert_eq!(legend.borrow().entries().len(), 2);
}
