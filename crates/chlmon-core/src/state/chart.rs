use crate::models::ChartSpec;
use crate::ports::ChartSurface;

/// Owns the single reusable chart instance
#[derive(Debug)]
pub struct ChartRenderer<C> {
    surface: C,
    current: Option<ChartSpec>,
}

impl<C: ChartSurface> ChartRenderer<C> {
    pub fn new(surface: C) -> Self {
        Self { surface, current: None }
    }

    /// Redraw a persisted chart onto a fresh surface
    pub fn restore(surface: C, current: Option<ChartSpec>) -> Self {
        let mut renderer = Self::new(surface);
        if let Some(spec) = current {
            renderer.draw(spec);
        }
        renderer
    }

    /// Tear down any live instance, then draw the new one
    pub fn draw(&mut self, spec: ChartSpec) {
        if self.current.take().is_some() {
            self.surface.destroy();
        }
        self.surface.draw(&spec);
        self.current = Some(spec);
    }

    pub fn current(&self) -> Option<&ChartSpec> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartKind;
    use crate::state::memory::MemoryChart;

    #[test]
    fn test_redraw_tears_down_previous_instance() {
        let mut renderer = ChartRenderer::new(MemoryChart::new());
        renderer.draw(ChartSpec::line("a", "NDVI", vec![("2023-01".into(), Some(0.3))]));
        renderer.draw(ChartSpec::bar("b", "Pixels", vec![("Class 20".into(), 5.0)]));

        assert_eq!(renderer.surface().draws(), 2);
        assert_eq!(renderer.surface().destroys(), 1);
        assert_eq!(renderer.surface().live_instances(), 1);
        assert_eq!(renderer.current().unwrap().kind, ChartKind::Bar);
    }

    #[test]
    fn test_first_draw_has_nothing_to_destroy() {
        let mut renderer = ChartRenderer::new(MemoryChart::new());
        renderer.draw(ChartSpec::bar("b", "Pixels", vec![]));
        assert_eq!(renderer.surface().destroys(), 0);
    }
}
