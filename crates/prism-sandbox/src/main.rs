//! Interactive rendering sandbox.
//!
//! A menu of self-contained test scenes rendered into an off-screen target
//! and shown inside a dockable UI panel, including a live shader editing
//! workbench and an OBJ model viewer.

mod app;
mod scenes;
mod ui;
mod workbench;

use anyhow::Result;

use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::window::{Runtime, RuntimeConfig};

use app::SandboxApp;
use scenes::{
    ClearColorScene, ModelViewScene, SceneRegistry, ShaderToyScene, TextureQuadScene,
    TriangleScene,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut registry = SceneRegistry::default();
    registry.register("Clear Color", |_| Ok(Box::new(ClearColorScene::new())));
    registry.register("Triangle", |ctx| Ok(Box::new(TriangleScene::new(ctx)?)));
    registry.register("Texture 2D", |ctx| Ok(Box::new(TextureQuadScene::new(ctx)?)));
    registry.register("Shader Toy", |ctx| Ok(Box::new(ShaderToyScene::new(ctx)?)));
    registry.register("Model Loading", |ctx| Ok(Box::new(ModelViewScene::new(ctx)?)));

    let gpu_init = GpuInit {
        // Enables the model viewer's wireframe toggle where the adapter
        // supports it; everything else runs fine without.
        optional_features: wgpu::Features::POLYGON_MODE_LINE,
        ..GpuInit::default()
    };

    let config = RuntimeConfig {
        title: "Prism Sandbox".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, gpu_init, SandboxApp::new(registry))
}
