//! Builds a complete `Surface` from one frame of chart state.
//!
//! Rendering is a pure function: the chart discards its previous surface and
//! replaces it with the result, there is no incremental update.

use crate::data_types::{HydrographConfig, Observation};
use crate::grouping::SiteSeries;
use crate::interaction::SiteRegistry;
use crate::scales::HydrographScales;
use crate::surface::{AxisEdge, AxisLayer, FocusMarker, HitRegion, SeriesPath, Surface, Tick};
use crate::tessellation::Tessellation;
use gpui::Point;

/// Everything a render reads.
pub struct Frame<'a> {
    pub config: &'a HydrographConfig,
    pub data: &'a [Observation],
    pub scales: &'a HydrographScales,
    pub series: &'a [SiteSeries],
    pub tessellation: &'a Tessellation,
    pub generation: u64,
}

pub fn render(frame: &Frame<'_>) -> Surface {
    let config = frame.config;
    Surface {
        generation: frame.generation,
        width: config.width,
        height: config.height,
        margins: config.margins,
        x_axis: time_axis(frame),
        y_axis: value_axis(frame),
        paths: series_paths(frame),
        hit_regions: hit_regions(frame.tessellation),
        focus: FocusMarker::parked(),
        hover_class: config.hover_class.clone(),
    }
}

/// Looks up each series' site element by the name on its first reading.
pub fn resolve_sites<R: SiteRegistry + ?Sized>(series: &mut [SiteSeries], registry: &mut R) {
    for s in series.iter_mut() {
        s.site = registry.resolve(&s.name);
    }
}

/// Projected points of all drawable readings, series by series, in the order
/// the tessellation consumes them. Also returns how many readings were left
/// out for lacking a position on the value axis.
pub fn project_sites(
    data: &[Observation],
    series: &[SiteSeries],
    scales: &HydrographScales,
) -> (Vec<(usize, Point<f64>)>, usize) {
    let mut sites = Vec::with_capacity(data.len());
    let mut excluded = 0;
    for s in series {
        for &idx in &s.indices {
            match data.get(idx).and_then(|o| scales.project(o)) {
                Some(p) => sites.push((idx, p)),
                None => excluded += 1,
            }
        }
    }
    (sites, excluded)
}

fn series_paths(frame: &Frame<'_>) -> Vec<SeriesPath> {
    frame
        .series
        .iter()
        .map(|s| {
            let mut segments: Vec<Vec<Point<f64>>> = Vec::new();
            let mut current: Vec<Point<f64>> = Vec::new();
            for obs in s.observations(frame.data) {
                match frame.scales.project(obs) {
                    Some(p) => current.push(p),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
            SeriesPath {
                key: s.key.clone(),
                site: s.site,
                segments,
            }
        })
        .collect()
}

fn time_axis(frame: &Frame<'_>) -> AxisLayer {
    let x = &frame.scales.x;
    let ticks = x
        .ticks(frame.config.time_ticks)
        .into_iter()
        .filter_map(|value| {
            x.map(value).map(|offset| Tick {
                value,
                offset,
                label: x.format_tick(value),
            })
        })
        .collect();
    AxisLayer {
        edge: AxisEdge::Bottom,
        length: frame.config.plot_width(),
        ticks,
    }
}

fn value_axis(frame: &Frame<'_>) -> AxisLayer {
    let y = &frame.scales.y;
    let ticks = y
        .ticks(frame.config.value_ticks)
        .into_iter()
        .filter_map(|value| {
            y.map(value).map(|offset| Tick {
                value,
                offset,
                label: y.format_tick(value),
            })
        })
        .collect();
    AxisLayer {
        edge: AxisEdge::Left,
        length: frame.config.plot_height(),
        ticks,
    }
}

fn hit_regions(tessellation: &Tessellation) -> Vec<HitRegion> {
    tessellation
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.polygon.is_empty())
        .map(|(id, cell)| HitRegion {
            cell: id,
            observation: cell.observation,
            polygon: cell.polygon.clone(),
        })
        .collect()
}
