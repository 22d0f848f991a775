// src/host/mod.rs - Boundary to the compositing host that owns the camera
use std::collections::BTreeSet;

use thiserror::Error;

pub mod simulated;

pub use simulated::SimulatedHost;

/// Opaque reference to a camera item inside the host's current scene.
///
/// Handles are only meaningful to the [`PositioningService`] that issued them
/// and are not expected to stay valid across scene changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Unable to find any camera items!")]
    NoCameraNames,
    #[error("No current scene available!")]
    NoActiveScene,
    #[error("Current source is not a scene!")]
    NotAScene,
    #[error("No camera in current scene found!")]
    CameraNotFound,
    #[error("Source item for camera not found")]
    SourceUnresolvable,
}

/// Scene and camera access provided by the compositing host.
///
/// The control-plane never owns camera state; every read and write goes
/// through this interface. Calls are synchronous and expected to be cheap.
pub trait PositioningService: Send + Sync {
    /// Resolves the active camera: the first of `names` (in iteration order)
    /// present in the current scene.
    fn resolve_active(&self, names: &BTreeSet<String>) -> Result<CameraHandle, HostError>;

    /// Source name behind a camera item.
    fn name(&self, camera: CameraHandle) -> Result<String, HostError>;

    /// Current position of a camera item.
    fn position(&self, camera: CameraHandle) -> Result<(f32, f32), HostError>;

    /// Pushes a new position to a camera item.
    fn set_position(&self, camera: CameraHandle, x: f32, y: f32) -> Result<(), HostError>;

    /// Host render frame rate. May report a non-positive value when the host
    /// has no active output; callers substitute 60 in that case.
    fn frame_rate(&self) -> f64;
}
