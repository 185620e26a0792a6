//! GPU device + surface management.
//!
//! Responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - routing uncaptured GPU errors through the configured policy

mod gpu;

pub use gpu::{Gpu, GpuErrorPolicy, GpuFrame, GpuInit, SurfaceErrorAction};
