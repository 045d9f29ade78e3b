//! gpui_hydrograph crate: an interactive multi-site hydrograph for GPUI

pub mod chart;
pub mod data_types;
pub mod feed;
pub mod grouping;
pub mod hydrograph_view;
pub mod interaction;
pub mod renderer;
pub mod scales;
pub mod surface;
pub mod tessellation;
pub mod theme;
pub mod transform;
pub mod utils;

pub use chart::Chart;
pub use data_types::{HydrographConfig, Margins, Observation};
pub use hydrograph_view::{ClearFocus, HydrographView};
pub use interaction::{FocusState, SiteHandle, SiteLegend, SiteRegistry};
pub use surface::Surface;
pub use tessellation::{Extent, Tessellation};
