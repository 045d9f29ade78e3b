//! Chart Model
//!
//! `Chart` is the single owner of a hydrograph's state: the original and
//! working datasets, the scales, grouped series and tessellation of the
//! current render, the drawing surface, and the hover focus. Every event
//! handler runs to completion on the UI thread, so a removal always finishes
//! its destroy-then-rebuild before the next event is looked at.

use crate::data_types::{HydrographConfig, Observation};
use crate::grouping::{group_by_site, SiteSeries};
use crate::interaction::{FocusState, SiteHandle, SiteLegend, SiteRegistry};
use crate::renderer::{project_sites, render, resolve_sites, Frame};
use crate::scales::HydrographScales;
use crate::surface::Surface;
use crate::tessellation::{CellId, Tessellation};
use eyre::Result;
use gpui::Point;
use tracing::{debug, info, warn};

pub struct Chart<R: SiteRegistry = SiteLegend> {
    config: HydrographConfig,
    registry: R,

    original_keys: Vec<String>,
    working: Vec<Observation>,
    loaded: bool,
    mounted: bool,

    scales: HydrographScales,
    series: Vec<SiteSeries>,
    tessellation: Tessellation,
    surface: Option<Surface>,
    generation: u64,

    focus: FocusState,
}

impl<R: SiteRegistry> Chart<R> {
    /// A mounted chart waiting for its data.
    pub fn new(config: HydrographConfig, registry: R) -> Self {
        info!(source = %config.data_path, "hydrograph created");
        let scales = HydrographScales::from_observations(&[], &config);
        let tessellation = Tessellation::empty(config.extent());
        Self {
            config,
            registry,
            original_keys: Vec::new(),
            working: Vec::new(),
            loaded: false,
            mounted: true,
            scales,
            series: Vec::new(),
            tessellation,
            surface: None,
            generation: 0,
            focus: FocusState::Idle,
        }
    }

    /// A chart rendered straight from an already loaded dataset.
    pub fn with_data(config: HydrographConfig, registry: R, data: Vec<Observation>) -> Self {
        let mut chart = Self::new(config, registry);
        chart.install(data);
        chart
    }

    /// Completion of the one data fetch. A fetch error is handed back to the
    /// caller and leaves the chart without a surface. Results arriving after
    /// teardown, or after data was already installed, are dropped.
    pub fn on_data_ready(&mut self, result: Result<Vec<Observation>>) -> Result<()> {
        if !self.mounted {
            warn!("observation data arrived after the chart was torn down, ignoring");
            return Ok(());
        }
        if self.loaded {
            warn!("observation data already installed, ignoring second delivery");
            return Ok(());
        }
        let data = result?;
        self.install(data);
        Ok(())
    }

    fn install(&mut self, data: Vec<Observation>) {
        self.original_keys = group_by_site(&data).into_iter().map(|s| s.key).collect();
        info!(
            observations = data.len(),
            sites = self.original_keys.len(),
            "observation data installed"
        );
        self.working = data;
        self.loaded = true;
        self.rebuild();
    }

    /// Destroys the surface and stops accepting data and events.
    pub fn teardown(&mut self) {
        self.exit_focus();
        self.surface = None;
        self.mounted = false;
        debug!("hydrograph torn down");
    }

    /// Discards the current surface and recomputes scales, series,
    /// tessellation and surface from the working dataset. Focus returns to idle.
    pub fn rebuild(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(old) = self.surface.take() {
            debug!(generation = old.generation, "discarding surface");
        }
        self.exit_focus();

        self.scales = HydrographScales::from_observations(&self.working, &self.config);
        self.series = group_by_site(&self.working);
        resolve_sites(&mut self.series, &mut self.registry);

        let (sites, excluded) = project_sites(&self.working, &self.series, &self.scales);
        if excluded > 0 {
            warn!(excluded, "readings without a position on the log axis were left out");
        }
        self.tessellation = Tessellation::build(sites, self.config.extent());

        self.generation += 1;
        let surface = render(&Frame {
            config: &self.config,
            data: &self.working,
            scales: &self.scales,
            series: &self.series,
            tessellation: &self.tessellation,
            generation: self.generation,
        });
        debug!(
            generation = self.generation,
            observations = self.working.len(),
            series = self.series.len(),
            cells = self.tessellation.len(),
            "surface rebuilt"
        );
        self.surface = Some(surface);
    }

    /// Pointer entered the hit region of `cell`. Any other focused region is
    /// exited first so that at most one site is highlighted.
    pub fn hover_enter(&mut self, cell: CellId) {
        if !self.mounted || self.surface.is_none() {
            return;
        }
        let Some(c) = self.tessellation.cell(cell) else {
            return;
        };
        let observation = c.observation;
        let position = c.site;
        match self.focus {
            FocusState::Focused { cell: current, .. } if current == cell => return,
            FocusState::Focused { .. } => self.exit_focus(),
            FocusState::Idle => {}
        }
        let Some(obs) = self.working.get(observation) else {
            return;
        };
        let label = obs.hover_label(&self.config.units);
        if let Some(site) = self.site_for_key(&obs.key) {
            self.registry.set_hover(site, true);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.focus.show(position, label);
        }
        self.focus = FocusState::Focused { cell, observation };
        debug!(cell, observation, "focus entered");
    }

    /// Pointer left the hit region of `cell`. Exits for regions that are not
    /// the focused one are stale and ignored.
    pub fn hover_exit(&mut self, cell: CellId) {
        if self.focus.cell() == Some(cell) {
            self.exit_focus();
        }
    }

    /// Returns to idle from any state.
    pub fn clear_focus(&mut self) {
        self.exit_focus();
    }

    fn exit_focus(&mut self) {
        let FocusState::Focused { cell, observation } = self.focus else {
            return;
        };
        if let Some(key) = self.working.get(observation).map(|o| o.key.clone()) {
            if let Some(site) = self.site_for_key(&key) {
                self.registry.set_hover(site, false);
            }
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.focus.park();
        }
        self.focus = FocusState::Idle;
        debug!(cell, "focus exited");
    }

    /// Click on the hit region of `cell`: removes the owning site.
    pub fn click(&mut self, cell: CellId) -> bool {
        let Some(key) = self
            .tessellation
            .cell(cell)
            .and_then(|c| self.working.get(c.observation))
            .map(|o| o.key.clone())
        else {
            return false;
        };
        self.remove_site(&key)
    }

    /// Drops every reading of `key` from the working dataset and rebuilds.
    /// Removing a key that is no longer present changes nothing.
    pub fn remove_site(&mut self, key: &str) -> bool {
        if !self.mounted {
            warn!(key, "remove ignored, chart was torn down");
            return false;
        }
        if !self.working.iter().any(|o| o.key == key) {
            warn!(key, "remove ignored, site not present");
            return false;
        }
        self.exit_focus();
        self.working.retain(|o| o.key != key);
        info!(
            key,
            remaining_sites = group_by_site(&self.working).len(),
            "site removed"
        );
        self.rebuild();
        true
    }

    /// Raw pointer position in plot coordinates. Resolves the region under the
    /// pointer and issues the exit/enter pair when it changes.
    pub fn pointer_move(&mut self, point: Point<f64>) {
        let target = self.tessellation.locate(point);
        let current = self.focus.cell();
        if target == current {
            return;
        }
        if let Some(cell) = current {
            self.hover_exit(cell);
        }
        if let Some(cell) = target {
            self.hover_enter(cell);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.exit_focus();
    }

    pub fn pointer_click(&mut self, point: Point<f64>) -> bool {
        match self.tessellation.locate(point) {
            Some(cell) => self.click(cell),
            None => false,
        }
    }

    fn site_for_key(&self, key: &str) -> Option<SiteHandle> {
        self.series.iter().find(|s| s.key == key).and_then(|s| s.site)
    }

    pub fn config(&self) -> &HydrographConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn original_keys(&self) -> &[String] {
        &self.original_keys
    }

    pub fn working_data(&self) -> &[Observation] {
        &self.working
    }

    pub fn scales(&self) -> &HydrographScales {
        &self.scales
    }

    pub fn series(&self) -> &[SiteSeries] {
        &self.series
    }

    pub fn tessellation(&self) -> &Tessellation {
        &self.tessellation
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn focused_observation(&self) -> Option<&Observation> {
        self.focus.observation().and_then(|i| self.working.get(i))
    }
}
