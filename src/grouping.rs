//! Partition of a flat observation list into one series per gage site.

use crate::data_types::Observation;
use crate::interaction::SiteHandle;
use std::collections::HashMap;

/// All readings of one site, as indices into the dataset they were grouped
/// from, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteSeries {
    pub key: String,
    /// Element name carried by the site's first reading.
    pub name: String,
    /// Resolved at draw time; lookup only, the element is owned elsewhere.
    pub site: Option<SiteHandle>,
    pub indices: Vec<usize>,
}

impl SiteSeries {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn observations<'a>(
        &'a self,
        data: &'a [Observation],
    ) -> impl Iterator<Item = &'a Observation> + 'a {
        self.indices.iter().filter_map(move |&i| data.get(i))
    }
}

/// Groups by `key`, keeping first-seen key order and per-site input order.
pub fn group_by_site(data: &[Observation]) -> Vec<SiteSeries> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<SiteSeries> = Vec::new();

    for (idx, obs) in data.iter().enumerate() {
        let slot = *slots.entry(obs.key.as_str()).or_insert_with(|| {
            series.push(SiteSeries {
                key: obs.key.clone(),
                name: obs.name.clone(),
                site: None,
                indices: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].indices.push(idx);
    }

    series
}
