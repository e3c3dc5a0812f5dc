use crate::models::AreaOfInterest;

pub const AOI_CAPTURED: &str = "AOI captured. Ready for analysis.";

/// Holds the latest drawn geometry as the canonical AOI
#[derive(Debug, Clone, Default)]
pub struct AoiCapture {
    current: Option<AreaOfInterest>,
}

impl AoiCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously captured AOI
    pub fn with_current(current: Option<AreaOfInterest>) -> Self {
        Self { current }
    }

    /// Handle a "geometry created" event from the drawing surface.
    ///
    /// The geometry replaces any previous AOI; shapes are never merged.
    /// Returns the status message to show.
    pub fn on_geometry_created(&mut self, geometry: AreaOfInterest) -> &'static str {
        if self.current.is_some() {
            tracing::debug!("Replacing previously captured AOI");
        }
        self.current = Some(geometry);
        AOI_CAPTURED
    }

    pub fn current(&self) -> Option<&AreaOfInterest> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;

    #[test]
    fn test_absent_at_startup() {
        assert!(AoiCapture::new().current().is_none());
    }

    #[test]
    fn test_second_drawing_replaces_first() {
        let mut capture = AoiCapture::new();
        let first = Geometry::rectangle(0.0, 0.0, 1.0, 1.0);
        let second = Geometry::rectangle(5.0, 5.0, 6.0, 6.0);

        assert_eq!(capture.on_geometry_created(first), AOI_CAPTURED);
        capture.on_geometry_created(second.clone());

        assert_eq!(capture.current(), Some(&second));
    }
}
