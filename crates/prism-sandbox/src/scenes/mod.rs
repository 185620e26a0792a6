//! Scenes and the scene lifecycle.
//!
//! The sandbox shows one active scene at a time. While no scene is active
//! the menu (the registry's list of scene names) is shown instead; picking
//! an entry constructs that scene, and the back button destroys it and
//! returns to the menu. Exactly one scene instance exists at any moment.

mod clear_color;
mod model_view;
mod shader_toy;
mod texture_quad;
mod triangle;

pub use clear_color::ClearColorScene;
pub use model_view::ModelViewScene;
pub use shader_toy::ShaderToyScene;
pub use texture_quad::TextureQuadScene;
pub use triangle::TriangleScene;

use std::f32::consts::TAU;
use std::path::Path;

use anyhow::Result;
use prism_engine::input::PointerSnapshot;
use prism_engine::render::RenderCtx;

/// Construction context handed to scene factories.
pub struct SceneCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Color format of the off-screen target the scene will draw into.
    pub color_format: wgpu::TextureFormat,
    /// Target size in pixels at construction time.
    pub target_size: (u32, u32),
    /// Root directory for models, textures, and workbench shaders.
    pub assets_dir: &'a Path,
}

/// A test scene. All hooks are optional; a scene overrides what it uses.
pub trait Scene {
    /// The render target changed size (width, height in pixels).
    fn on_window_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Advance scene state by `dt` seconds.
    fn on_update(&mut self, dt: f32) {
        let _ = dt;
    }

    /// Record draw commands into the off-screen target.
    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        let _ = ctx;
    }

    /// Build the scene's control widgets in the side panel.
    fn on_ui(&mut self, ui: &mut egui::Ui) {
        let _ = ui;
    }

    /// The pointer moved inside the viewport panel; coordinates are in
    /// render-target pixels.
    fn on_mouse_move(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// A button changed state while the pointer was inside the panel.
    fn on_mouse_event(&mut self, event: &PointerSnapshot) {
        let _ = event;
    }
}

/// Rotation accumulator for self-animating scenes.
///
/// The angle stays in `[0, 2π)` no matter how long a session runs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Spin {
    pub angle: f32,
    pub speed: f32,
    pub enabled: bool,
}

impl Spin {
    pub fn new(speed: f32) -> Self {
        Self {
            angle: 0.0,
            speed,
            enabled: true,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.enabled {
            self.angle = (self.angle + self.speed * dt).rem_euclid(TAU);
        }
    }
}

type SceneFactory = Box<dyn Fn(&SceneCtx<'_>) -> Result<Box<dyn Scene>>>;

/// Ordered list of scene factories, shown as the menu.
///
/// Registration order is display order; duplicate names are allowed and
/// simply appear twice.
#[derive(Default)]
pub struct SceneRegistry {
    entries: Vec<(String, SceneFactory)>,
}

impl SceneRegistry {
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&SceneCtx<'_>) -> Result<Box<dyn Scene>> + 'static,
    ) {
        self.entries.push((name.into(), Box::new(factory)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(name, _)| name.as_str())
    }

    /// Invokes the factory at `index`. Construction failure propagates; the
    /// caller decides whether to abort or stay on the menu.
    pub fn construct(&self, index: usize, ctx: &SceneCtx<'_>) -> Result<Box<dyn Scene>> {
        let (name, factory) = self
            .entries
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no scene registered at index {index}"))?;
        log::info!("constructing scene {name:?}");
        factory(ctx)
    }
}

/// Single-owner slot for the active scene.
///
/// Holds either the active scene instance or nothing (menu active).
/// Entering drops any previous instance before storing the new one, so
/// scene GPU resources are released before their replacement is built up.
#[derive(Default)]
pub struct SceneStage {
    active: Option<(usize, Box<dyn Scene>)>,
}

impl SceneStage {
    /// `true` while no scene is active and the menu should be shown.
    pub fn menu_active(&self) -> bool {
        self.active.is_none()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|(i, _)| *i)
    }

    pub fn scene_mut(&mut self) -> Option<&mut dyn Scene> {
        self.active.as_mut().map(|(_, s)| &mut **s as &mut dyn Scene)
    }

    pub fn enter(&mut self, index: usize, scene: Box<dyn Scene>) {
        self.active = None;
        self.active = Some((index, scene));
    }

    /// Destroys the active scene and reinstates the menu.
    pub fn back(&mut self) {
        self.active = None;
    }
}

// ── tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Scene that flips a shared flag when dropped.
    struct Tracked {
        dropped: Rc<Cell<bool>>,
    }

    impl Scene for Tracked {}

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn stage_starts_on_the_menu() {
        let stage = SceneStage::default();
        assert!(stage.menu_active());
        assert_eq!(stage.active_index(), None);
    }

    #[test]
    fn back_destroys_the_active_scene_and_restores_the_menu() {
        let dropped = Rc::new(Cell::new(false));
        let mut stage = SceneStage::default();

        stage.enter(0, Box::new(Tracked { dropped: dropped.clone() }));
        assert!(!stage.menu_active());
        assert!(!dropped.get());

        stage.back();
        assert!(stage.menu_active());
        assert!(dropped.get());
    }

    #[test]
    fn entering_a_scene_drops_the_previous_one() {
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));
        let mut stage = SceneStage::default();

        stage.enter(0, Box::new(Tracked { dropped: first.clone() }));
        stage.enter(1, Box::new(Tracked { dropped: second.clone() }));

        assert!(first.get());
        assert!(!second.get());
        assert_eq!(stage.active_index(), Some(1));
    }

    #[test]
    fn registry_preserves_registration_order() {
        let mut registry = SceneRegistry::default();
        registry.register("b", |_| Ok(Box::new(Noop)));
        registry.register("a", |_| Ok(Box::new(Noop)));
        registry.register("a", |_| Ok(Box::new(Noop)));

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["b", "a", "a"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.name(1), Some("a"));
    }

    struct Noop;
    impl Scene for Noop {}

    /// Scene recording which hooks fired, to pin the dispatch surface.
    #[derive(Default)]
    struct Recorder {
        resized_to: Option<(u32, u32)>,
        moves: Vec<(f32, f32)>,
        events: Vec<PointerSnapshot>,
        updates: u32,
    }

    impl Scene for Recorder {
        fn on_window_resize(&mut self, width: u32, height: u32) {
            self.resized_to = Some((width, height));
        }

        fn on_update(&mut self, dt: f32) {
            let _ = dt;
            self.updates += 1;
        }

        fn on_mouse_move(&mut self, x: f32, y: f32) {
            self.moves.push((x, y));
        }

        fn on_mouse_event(&mut self, event: &PointerSnapshot) {
            self.events.push(*event);
        }
    }

    #[test]
    fn every_hook_reaches_its_override() {
        let mut recorder = Recorder::default();
        let scene: &mut dyn Scene = &mut recorder;

        scene.on_window_resize(640, 480);
        scene.on_update(0.016);
        scene.on_mouse_move(10.0, 20.0);
        scene.on_mouse_event(&PointerSnapshot {
            x: 10.0,
            y: 20.0,
            left_down: true,
            right_down: false,
        });

        assert_eq!(recorder.resized_to, Some((640, 480)));
        assert_eq!(recorder.updates, 1);
        assert_eq!(recorder.moves, [(10.0, 20.0)]);
        assert_eq!(recorder.events.len(), 1);
        assert!(recorder.events[0].left_down);
    }

    #[test]
    fn spin_advances_and_wraps_the_angle() {
        let mut spin = Spin::new(1.0);
        spin.angle = TAU - 0.1;
        spin.tick(0.2);
        assert!(spin.angle >= 0.0 && spin.angle < TAU);
        assert!((spin.angle - 0.1).abs() < 1e-5);
    }

    #[test]
    fn disabled_spin_holds_its_angle() {
        let mut spin = Spin::new(2.0);
        spin.angle = 1.0;
        spin.enabled = false;
        spin.tick(0.5);
        assert_eq!(spin.angle, 1.0);
    }
}
