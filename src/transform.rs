//! Conversion between plot coordinates and window pixels.

use crate::data_types::Margins;
use crate::utils::PixelsExt;
use gpui::*;

/// The plot area's top-left corner sits at the surface origin plus the
/// left/top margins.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceTransform {
    pub origin: Point<Pixels>,
    pub margins: Margins,
}

impl SurfaceTransform {
    pub fn new(origin: Point<Pixels>, margins: Margins) -> Self {
        Self { origin, margins }
    }

    pub fn to_screen(&self, point: Point<f64>) -> Point<Pixels> {
        Point::new(
            self.origin.x + px((point.x + self.margins.left) as f32),
            self.origin.y + px((point.y + self.margins.top) as f32),
        )
    }

    pub fn to_plot(&self, point: Point<Pixels>) -> Point<f64> {
        Point::new(
            (point.x - self.origin.x).as_f32() as f64 - self.margins.left,
            (point.y - self.origin.y).as_f32() as f64 - self.margins.top,
        )
    }
}
