use super::{Rect, Vec2};

/// Maps window-space pointer coordinates into a viewport panel's local space.
///
/// The UI layer rebuilds this every frame from the panel's on-screen rect;
/// the panel moves and resizes freely while docked panels are dragged around.
///
/// Pointer activity outside the panel must never reach a scene, so
/// `to_local` doubles as the containment filter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelMapping {
    rect: Rect,
}

impl PanelMapping {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            rect: Rect::from_origin_size(origin, size),
        }
    }

    /// The panel's on-screen rect in window-space logical pixels.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Translates a window-space point into panel-local coordinates.
    ///
    /// Returns `None` when the point falls outside `[0,w) × [0,h)`.
    pub fn to_local(&self, global: Vec2) -> Option<Vec2> {
        if !self.rect.contains(global) {
            return None;
        }
        Some(global - self.rect.origin)
    }

    /// Like [`to_local`](Self::to_local) but additionally scales the local
    /// point, e.g. from logical UI points into render-target pixels.
    pub fn to_local_scaled(&self, global: Vec2, scale: f32) -> Option<Vec2> {
        self.to_local(global).map(|p| p * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> PanelMapping {
        PanelMapping::new(Vec2::zero(), Vec2::new(100.0, 100.0))
    }

    #[test]
    fn point_outside_panel_is_rejected() {
        // Panel-local (-5, 10) for a 100x100 panel at the origin.
        assert_eq!(panel().to_local(Vec2::new(-5.0, 10.0)), None);
    }

    #[test]
    fn point_inside_panel_passes_unchanged() {
        assert_eq!(
            panel().to_local(Vec2::new(50.0, 50.0)),
            Some(Vec2::new(50.0, 50.0))
        );
    }

    #[test]
    fn local_coordinates_subtract_panel_origin() {
        let m = PanelMapping::new(Vec2::new(200.0, 40.0), Vec2::new(100.0, 100.0));
        assert_eq!(
            m.to_local(Vec2::new(250.0, 90.0)),
            Some(Vec2::new(50.0, 50.0))
        );
    }

    #[test]
    fn far_edge_is_exclusive() {
        assert_eq!(panel().to_local(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn scaled_mapping_multiplies_local_point() {
        let m = PanelMapping::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert_eq!(
            m.to_local_scaled(Vec2::new(60.0, 60.0), 2.0),
            Some(Vec2::new(100.0, 100.0))
        );
    }
}
