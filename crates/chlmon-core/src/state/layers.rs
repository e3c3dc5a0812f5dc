//! Ordered registry of active map overlays.
//!
//! Entries are addressed by a stable `LayerId`; insertion order is display
//! order. Every mutation re-renders the full list view.

use crate::error::{ChlmonError, Result};
use crate::models::{LayerId, LayerListItem, OverlayLayer, TileLayer};
use crate::ports::MapSurface;

#[derive(Debug)]
pub struct LayerRegistry<M> {
    map: M,
    entries: Vec<OverlayLayer>,
    next_id: u64,
    list_view: Vec<LayerListItem>,
}

impl<M: MapSurface> LayerRegistry<M> {
    pub fn new(map: M) -> Self {
        Self {
            map,
            entries: Vec::new(),
            next_id: 1,
            list_view: Vec::new(),
        }
    }

    /// Rebuild a registry from persisted entries, attaching the visible ones
    pub fn restore(map: M, entries: Vec<OverlayLayer>, next_id: u64) -> Self {
        let highest = entries.iter().map(|e| e.id.0).max().unwrap_or(0);
        let mut registry = Self {
            map,
            entries,
            next_id: next_id.max(highest + 1),
            list_view: Vec::new(),
        };

        for entry in registry.entries.iter().filter(|e| e.visible) {
            registry.map.attach(entry.id, &entry.renderable);
        }
        registry.render_list();
        registry
    }

    /// Attach an overlay and append it to the registry.
    ///
    /// Names are not de-duplicated.
    pub fn add_layer(&mut self, name: impl Into<String>, renderable: TileLayer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        self.map.attach(id, &renderable);
        self.entries.push(OverlayLayer {
            id,
            display_name: name.into(),
            renderable,
            visible: true,
        });
        self.render_list();

        tracing::debug!(layer_id = %id, "Added overlay layer");
        id
    }

    /// Flip attachment of an overlay. Returns the new visibility.
    pub fn toggle_layer(&mut self, id: LayerId) -> Result<bool> {
        let index = self.position(id)?;
        let entry = &mut self.entries[index];

        if self.map.is_attached(id) {
            self.map.detach(id);
            entry.visible = false;
        } else {
            self.map.attach(id, &entry.renderable);
            entry.visible = true;
        }
        let visible = entry.visible;
        self.render_list();
        Ok(visible)
    }

    /// Detach and drop an overlay
    pub fn remove_layer(&mut self, id: LayerId) -> Result<OverlayLayer> {
        let index = self.position(id)?;
        if self.map.is_attached(id) {
            self.map.detach(id);
        }
        let removed = self.entries.remove(index);
        self.render_list();

        tracing::debug!(layer_id = %id, "Removed overlay layer");
        Ok(removed)
    }

    /// Detach every overlay and empty the registry. Returns how many entries
    /// were dropped.
    pub fn clear_layers(&mut self) -> usize {
        for entry in &self.entries {
            if self.map.is_attached(entry.id) {
                self.map.detach(entry.id);
            }
        }
        let cleared = self.entries.len();
        self.entries.clear();
        self.render_list();
        cleared
    }

    pub fn get(&self, id: LayerId) -> Option<&OverlayLayer> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[OverlayLayer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next added layer will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Current rendering of the layer list
    pub fn list_view(&self) -> &[LayerListItem] {
        &self.list_view
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    fn position(&self, id: LayerId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(ChlmonError::UnknownLayer { id })
    }

    fn render_list(&mut self) {
        self.list_view = self
            .entries
            .iter()
            .map(|e| LayerListItem {
                id: e.id,
                name: e.display_name.clone(),
                visible: e.visible,
            })
            .collect();
    }
}
