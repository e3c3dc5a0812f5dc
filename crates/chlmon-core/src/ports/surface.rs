use crate::models::{ChartSpec, LayerId, TileLayer};

/// Port for the map that renders overlays
pub trait MapSurface: Send {
    /// Attach an overlay to the map
    fn attach(&mut self, id: LayerId, layer: &TileLayer);

    /// Detach an overlay from the map
    fn detach(&mut self, id: LayerId);

    /// Check whether an overlay is currently attached
    fn is_attached(&self, id: LayerId) -> bool;
}

/// Port for the single reusable chart target
pub trait ChartSurface: Send {
    /// Draw a new chart instance
    fn draw(&mut self, spec: &ChartSpec);

    /// Tear down the live chart instance
    fn destroy(&mut self);
}
