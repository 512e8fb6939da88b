//! Error types for Nebula.
//!
//! Startup failures (no window, no GPU surface) stop the application before
//! any particle state is built. Transition errors never leave the scheduler:
//! they are logged and the transition jumps to its target.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found, ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("rendering surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Invalid runtime configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("particle count must be at least 1")]
    NoParticles,
    #[error("transition speed must be a finite positive step, got {0}")]
    InvalidTransitionSpeed(f32),
    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidBloom { name: &'static str, value: f32 },
}

/// Integrity failures of an in-flight transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Snapshot buffers do not match the live buffers. Lengths are in floats.
    #[error("transition data length mismatch during interpolation (live {live}, from {from}, to {to})")]
    LengthMismatch { live: usize, from: usize, to: usize },
}

/// Errors that can occur when running the visualizer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration rejected before startup.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
