use eyre::{bail, Result, WrapErr};
use gpui::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scales::DEFAULT_VALUE_FLOOR;
use crate::tessellation::Extent;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Everything a hydrograph needs before its first render. Layout is fixed for
/// the lifetime of the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrographConfig {
    /// File path or http(s) URL of the observation array.
    pub data_path: String,
    /// Outer width of the drawing surface, margins included.
    pub width: f64,
    /// Outer height of the drawing surface, margins included.
    pub height: f64,
    pub margins: Margins,
    /// Fixed lower bound of the value axis.
    pub value_floor: f64,
    pub value_ticks: usize,
    pub time_ticks: usize,
    pub units: String,
    /// Style name toggled on the hovered site's element.
    pub hover_class: String,
}

impl Default for HydrographConfig {
    fn default() -> Self {
        Self {
            data_path: String::new(),
            width: 960.0,
            height: 500.0,
            margins: Margins::default(),
            value_floor: DEFAULT_VALUE_FLOOR,
            value_ticks: 10,
            time_ticks: 10,
            units: "cfs".to_string(),
            hover_class: "gage--hover".to_string(),
        }
    }
}

impl HydrographConfig {
    pub fn new(data_path: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).wrap_err("invalid hydrograph config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).wrap_err_with(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.plot_width() > 0.0) || !(self.plot_height() > 0.0) {
            bail!(
                "plot area is empty: {}x{} with margins {:?}",
                self.width,
                self.height,
                self.margins
            );
        }
        if !(self.value_floor > 0.0) {
            bail!("value_floor must be positive, got {}", self.value_floor);
        }
        Ok(())
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Interactive region in plot coordinates: the plot area grown by the margins.
    pub fn extent(&self) -> Extent {
        Extent::new(
            Point::new(-self.margins.left, -self.margins.top),
            Point::new(
                self.plot_width() + self.margins.right,
                self.plot_height() + self.margins.bottom,
            ),
        )
    }
}
