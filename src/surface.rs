//! The drawing surface produced by one render: plain geometry in plot
//! coordinates (origin at the top-left of the plot area, margins outside).

use crate::data_types::Margins;
use crate::interaction::SiteHandle;
use crate::tessellation::CellId;
use gpui::Point;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisEdge {
    Left,
    Bottom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel offset along the axis (x for the bottom axis, y for the left one).
    pub offset: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisLayer {
    pub edge: AxisEdge,
    /// Axis line length in pixels.
    pub length: f64,
    pub ticks: Vec<Tick>,
}

/// One site's line. Unplottable readings split it into segments.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPath {
    pub key: String,
    pub site: Option<SiteHandle>,
    pub segments: Vec<Vec<Point<f64>>>,
}

impl SeriesPath {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// SVG path data, `M x,y L x,y ...` per segment.
    pub fn svg_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            for (i, p) in segment.iter().enumerate() {
                let _ = write!(d, "{}{},{}", if i == 0 { 'M' } else { 'L' }, fmt_coord(p.x), fmt_coord(p.y));
            }
        }
        d
    }
}

/// Invisible shape covering one tessellation cell. Pointer events over it are
/// dispatched to the chart as hover-enter / hover-exit / click for `cell`.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
    pub cell: CellId,
    pub observation: usize,
    pub polygon: Vec<Point<f64>>,
}

impl HitRegion {
    pub fn svg_data(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.polygon.iter().enumerate() {
            let _ = write!(d, "{}{},{}", if i == 0 { 'M' } else { 'L' }, fmt_coord(p.x), fmt_coord(p.y));
        }
        d.push('Z');
        d
    }
}

/// The single hover indicator, moved in place rather than recreated.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusMarker {
    pub position: Point<f64>,
    pub label: String,
    pub radius: f64,
    /// Vertical offset of the label relative to the marker.
    pub label_offset: f64,
}

impl FocusMarker {
    pub const PARKED: Point<f64> = Point { x: -100.0, y: -100.0 };

    pub fn parked() -> Self {
        Self {
            position: Self::PARKED,
            label: String::new(),
            radius: 3.5,
            label_offset: -10.0,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.position == Self::PARKED
    }

    pub fn show(&mut self, position: Point<f64>, label: String) {
        self.position = position;
        self.label = label;
    }

    /// Moves the marker off-canvas. The label text is left as is, only the
    /// position matters for visibility.
    pub fn park(&mut self) {
        self.position = Self::PARKED;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    /// Increases by one with every render of the owning chart.
    pub generation: u64,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub x_axis: AxisLayer,
    pub y_axis: AxisLayer,
    pub paths: Vec<SeriesPath>,
    pub hit_regions: Vec<HitRegion>,
    pub focus: FocusMarker,
    pub hover_class: String,
}

impl Surface {
    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    pub fn path_for(&self, key: &str) -> Option<&SeriesPath> {
        self.paths.iter().find(|p| p.key == key)
    }

    /// Standalone SVG snapshot of the surface.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}'>",
            self.width, self.height
        );
        let _ = writeln!(
            svg,
            "  <style>.gages path{{fill:none;stroke-width:1.5}} .voronoi path{{fill:none;pointer-events:all}} .{}{{stroke-width:3}}</style>",
            escape_text(&self.hover_class)
        );
        let _ = writeln!(
            svg,
            "  <g transform='translate({},{})'>",
            fmt_coord(self.margins.left),
            fmt_coord(self.margins.top)
        );

        for path in &self.paths {
            let _ = writeln!(
                svg,
                "    <g class='gages'><path id='hydro{}' d='{}' stroke='steelblue'/></g>",
                escape_text(&path.key),
                path.svg_data()
            );
        }

        let _ = writeln!(
            svg,
            "    <g class='axis' transform='translate(0,{})'>",
            fmt_coord(self.plot_height())
        );
        let _ = writeln!(
            svg,
            "      <path d='M0,0H{}' stroke='currentColor'/>",
            fmt_coord(self.x_axis.length)
        );
        for tick in &self.x_axis.ticks {
            let _ = writeln!(
                svg,
                "      <g class='tick' transform='translate({},0)'><line y2='6' stroke='currentColor'/><text y='9' dy='0.71em' text-anchor='middle'>{}</text></g>",
                fmt_coord(tick.offset),
                escape_text(&tick.label)
            );
        }
        let _ = writeln!(svg, "    </g>");

        let _ = writeln!(svg, "    <g class='axis'>");
        let _ = writeln!(
            svg,
            "      <path d='M0,0V{}' stroke='currentColor'/>",
            fmt_coord(self.y_axis.length)
        );
        for tick in &self.y_axis.ticks {
            let _ = writeln!(
                svg,
                "      <g class='tick' transform='translate(0,{})'><line x2='-6' stroke='currentColor'/><text x='-9' dy='0.32em' text-anchor='end'>{}</text></g>",
                fmt_coord(tick.offset),
                escape_text(&tick.label)
            );
        }
        let _ = writeln!(svg, "    </g>");

        let _ = writeln!(
            svg,
            "    <g class='focus' transform='translate({},{})'><circle r='{}'/><text y='{}'>{}</text></g>",
            fmt_coord(self.focus.position.x),
            fmt_coord(self.focus.position.y),
            fmt_coord(self.focus.radius),
            fmt_coord(self.focus.label_offset),
            escape_text(&self.focus.label)
        );

        let _ = writeln!(svg, "    <g class='voronoi'>");
        for region in &self.hit_regions {
            let _ = writeln!(svg, "      <path d='{}'/>", region.svg_data());
        }
        let _ = writeln!(svg, "    </g>");
        let _ = writeln!(svg, "  </g>");
        let _ = writeln!(svg, "</svg>");
        svg
    }
}

fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
