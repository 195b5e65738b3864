//! Client-side copy of the marketer list.
//!
//! After each successful store call the owner patches this copy instead of
//! re-fetching. Nothing here talks to the store.

use crate::marketer::{Marketer, MarketerId, MarketerPatch};
use crate::metrics::{self, AggregateMetrics};

#[derive(Clone, Debug, Default)]
pub struct MarketerCache {
    marketers: Vec<Marketer>,
}

impl MarketerCache {
    pub fn new() -> MarketerCache {
        MarketerCache::default()
    }

    /// Swaps in a freshly fetched list.
    pub fn replace(&mut self, marketers: Vec<Marketer>) {
        self.marketers = marketers;
    }

    pub fn append(&mut self, marketer: Marketer) {
        self.marketers.push(marketer);
    }

    /// Returns `false` if no cached marketer has the id.
    pub fn patch(&mut self, marketer_id: &MarketerId, patch: &MarketerPatch) -> bool {
        match self.marketers.iter_mut().find(|m| &m.id == marketer_id) {
            Some(marketer) => {
                marketer.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, marketer_id: &MarketerId) -> bool {
        let before = self.marketers.len();
        self.marketers.retain(|m| &m.id != marketer_id);
        self.marketers.len() != before
    }

    pub fn get(&self, marketer_id: &MarketerId) -> Option<&Marketer> {
        self.marketers.iter().find(|m| &m.id == marketer_id)
    }

    pub fn list(&self) -> &[Marketer] {
        &self.marketers
    }

    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Marketer> + 'a {
        self.marketers.iter().filter(move |m| m.matches(term))
    }

    pub fn metrics(&self) -> AggregateMetrics {
        metrics::aggregate_all(&self.marketers)
    }
}
