//! Hover focus state and the hooks used to signal it to site elements that
//! live outside the chart.

use crate::tessellation::CellId;
use std::cell::RefCell;
use std::rc::Rc;

/// Opaque reference to an externally owned site element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SiteHandle(pub(crate) usize);

impl SiteHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registry-defined slot of the element.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Where site elements live. The chart only looks elements up and toggles
/// their hover style; it never creates or owns them.
pub trait SiteRegistry {
    fn resolve(&mut self, name: &str) -> Option<SiteHandle>;
    fn set_hover(&mut self, site: SiteHandle, hovered: bool);
}

/// A registry shared with its owner: the chart keeps only this handle, the
/// elements stay with whoever created the `Rc`.
impl<T: SiteRegistry> SiteRegistry for Rc<RefCell<T>> {
    fn resolve(&mut self, name: &str) -> Option<SiteHandle> {
        self.borrow_mut().resolve(name)
    }

    fn set_hover(&mut self, site: SiteHandle, hovered: bool) {
        self.borrow_mut().set_hover(site, hovered);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Idle,
    Focused { cell: CellId, observation: usize },
}

impl FocusState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn cell(&self) -> Option<CellId> {
        match self {
            Self::Idle => None,
            Self::Focused { cell, .. } => Some(*cell),
        }
    }

    pub fn observation(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Focused { observation, .. } => Some(*observation),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub hovered: bool,
}

/// Site list shown next to the chart. Entries are registered on first lookup
/// and stay for the lifetime of the legend, even after their series is removed
/// from the chart.
#[derive(Clone, Debug, Default)]
pub struct SiteLegend {
    entries: Vec<LegendEntry>,
}

impl SiteLegend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn entry(&self, site: SiteHandle) -> Option<&LegendEntry> {
        self.entries.get(site.0)
    }

    pub fn is_hovered(&self, site: SiteHandle) -> bool {
        self.entry(site).is_some_and(|e| e.hovered)
    }

    pub fn hovered(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter().filter(|e| e.hovered)
    }
}

impl SiteRegistry for SiteLegend {
    fn resolve(&mut self, name: &str) -> Option<SiteHandle> {
        if name.is_empty() {
            return None;
        }
        let index = match self.entries.iter().position(|e| e.name == name) {
            Some(index) => index,
            None => {
                self.entries.push(LegendEntry {
                    name: name.to_string(),
                    hovered: false,
                });
                self.entries.len() - 1
            }
        };
        Some(SiteHandle(index))
    }

    fn set_hover(&mut self, site: SiteHandle, hovered: bool) {
        if let Some(entry) = self.entries.get_mut(site.0) {
            entry.hovered = hovered;
        }
    }
}
