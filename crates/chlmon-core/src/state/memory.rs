//! In-memory adapters for the map, chart and session ports.
//!
//! Used by the terminal front end, which has no real map or chart widget,
//! and by tests. `MemorySessionStore` recovers a poisoned lock and keeps the
//! last written session.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::models::{ChartSpec, LayerId, Session, TileLayer};
use crate::ports::{ChartSurface, MapSurface, SessionStore};

/// Map surface that records attached overlays
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    attached: BTreeMap<LayerId, TileLayer>,
    detaches: HashMap<LayerId, usize>,
    redundant_detaches: usize,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Tile URL of an attached overlay
    pub fn attached_url(&self, id: LayerId) -> Option<&str> {
        self.attached.get(&id).map(|l| l.url_template.as_str())
    }

    /// How often an overlay has been detached
    pub fn detach_count(&self, id: LayerId) -> usize {
        self.detaches.get(&id).copied().unwrap_or(0)
    }

    /// Detach calls for overlays that were not attached
    pub fn redundant_detaches(&self) -> usize {
        self.redundant_detaches
    }
}

impl MapSurface for MemoryMap {
    fn attach(&mut self, id: LayerId, layer: &TileLayer) {
        self.attached.insert(id, layer.clone());
    }

    fn detach(&mut self, id: LayerId) {
        if self.attached.remove(&id).is_some() {
            *self.detaches.entry(id).or_insert(0) += 1;
        } else {
            self.redundant_detaches += 1;
        }
    }

    fn is_attached(&self, id: LayerId) -> bool {
        self.attached.contains_key(&id)
    }
}

/// Chart surface that keeps the live instance in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryChart {
    live: Option<ChartSpec>,
    draws: usize,
    destroys: usize,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> Option<&ChartSpec> {
        self.live.as_ref()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn destroys(&self) -> usize {
        self.destroys
    }

    /// Number of chart instances currently drawn
    pub fn live_instances(&self) -> usize {
        self.draws - self.destroys
    }
}

impl ChartSurface for MemoryChart {
    fn draw(&mut self, spec: &ChartSpec) {
        self.live = Some(spec.clone());
        self.draws += 1;
    }

    fn destroy(&mut self) {
        if self.live.take().is_some() {
            self.destroys += 1;
        }
    }
}

/// Session store that lives for the process only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self { session: RwLock::new(Some(session)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
