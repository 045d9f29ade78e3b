//! Time and value scales for the hydrograph.
//!
//! The x axis maps `time_mili` linearly onto the plot width; the y axis maps
//! measurements logarithmically onto the plot height, inverted so that the
//! domain maximum sits at pixel 0.

use crate::data_types::{HydrographConfig, Observation};
use crate::utils::date_formatter;
use d3rs::scale::{LinearScale, LogScale, Scale as D3Scale};
use gpui::Point;

/// Lower bound of the value axis. Gage discharge below this is not interesting
/// on a flood chart, so the axis never starts at the data minimum.
pub const DEFAULT_VALUE_FLOOR: f64 = 20.0;

#[derive(Clone)]
enum ScaleKind {
    Linear(LinearScale),
    Log(LogScale),
}

/// A d3 scale together with the domain it was built for.
#[derive(Clone)]
pub struct ChartScale {
    kind: ScaleKind,
    domain: (f64, f64),
}

impl ChartScale {
    pub fn new_linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        let mut d_min = domain.0;
        let mut d_max = domain.1;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        let scale = LinearScale::new().domain(d_min, d_max).range(range.0, range.1);
        Self {
            kind: ScaleKind::Linear(scale),
            domain: (d_min, d_max),
        }
    }

    /// Both domain ends must be positive; a collapsed domain is widened by a
    /// factor of two on each side.
    pub fn new_log(domain: (f64, f64), range: (f64, f64)) -> Self {
        let mut d_min = domain.0;
        let mut d_max = domain.1;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min /= 2.0;
            d_max *= 2.0;
        }
        let scale = LogScale::new().domain(d_min, d_max).range(range.0, range.1);
        Self {
            kind: ScaleKind::Log(scale),
            domain: (d_min, d_max),
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self.kind, ScaleKind::Log(_))
    }

    /// Maps a domain value to a pixel offset. Undefined inputs (e.g. a
    /// non-positive value on a log scale) yield `None` instead of NaN.
    pub fn map(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || (self.is_log() && value <= 0.0) {
            return None;
        }
        let res = match &self.kind {
            ScaleKind::Linear(s) => s.scale(value),
            ScaleKind::Log(s) => s.scale(value),
        };
        res.is_finite().then_some(res)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.domain;
        match &self.kind {
            ScaleKind::Linear(_) => date_formatter::time_ticks(lo, hi, count),
            ScaleKind::Log(s) => s
                .ticks(count)
                .into_iter()
                .filter(|t| *t >= lo && *t <= hi)
                .collect(),
        }
    }

    pub fn format_tick(&self, value: f64) -> String {
        match self.kind {
            ScaleKind::Linear(_) => date_formatter::format_month_day(value),
            ScaleKind::Log(_) => date_formatter::format_fixed(value),
        }
    }
}

/// `[min(time_mili), max(time_mili)]` over readings with a finite timestamp.
pub fn time_domain(data: &[Observation]) -> Option<(f64, f64)> {
    data.iter()
        .map(|o| o.time_mili)
        .filter(|t| t.is_finite())
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}

/// `[floor, max(value)]` over plottable readings. Readings that cannot sit on
/// a log axis do not contribute to the maximum, and the upper end never drops
/// below the floor.
pub fn value_domain(data: &[Observation], floor: f64) -> Option<(f64, f64)> {
    data.iter()
        .filter(|o| o.is_plottable())
        .map(|o| o.value)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .map(|max| (floor, max.max(floor)))
}

/// Both axes of one render, rebuilt from the working dataset every time.
#[derive(Clone)]
pub struct HydrographScales {
    pub x: ChartScale,
    pub y: ChartScale,
    /// Data-derived domains; `None` when the dataset has nothing to measure.
    pub time_domain: Option<(f64, f64)>,
    pub value_domain: Option<(f64, f64)>,
}

impl HydrographScales {
    pub fn from_observations(data: &[Observation], config: &HydrographConfig) -> Self {
        let time = time_domain(data);
        let value = value_domain(data, config.value_floor);

        let floor = config.value_floor;
        let x = ChartScale::new_linear(time.unwrap_or((0.0, 1.0)), (0.0, config.plot_width()));
        // Nothing above the floor: keep the floor on the bottom edge.
        let y_domain = match value {
            Some((lo, hi)) if hi > lo => (lo, hi),
            _ => (floor, floor * 10.0),
        };
        let y = ChartScale::new_log(y_domain, (config.plot_height(), 0.0));

        Self {
            x,
            y,
            time_domain: time,
            value_domain: value,
        }
    }

    /// Plot-area pixel position of a reading, `None` if it cannot be drawn.
    /// Readings under the floor sit on the bottom edge.
    pub fn project(&self, obs: &Observation) -> Option<Point<f64>> {
        if !obs.is_plottable() {
            return None;
        }
        let (lo, hi) = self.y.domain();
        let value = obs.value.clamp(lo, hi);
        Some(Point::new(self.x.map(obs.time_mili)?, self.y.map(value)?))
    }
}
