// src/context.rs - Shared control-plane state, passed explicitly from the
// composition root instead of living behind process-wide singletons.
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use crate::host::{CameraHandle, HostError, PositioningService};

/// Camera-name registry plus the handle to the host's positioning service.
///
/// Shared across all connections and the motion engine via `Arc`. The name
/// set is replaced wholesale under a write lock, so concurrent readers never
/// observe a partially updated set.
pub struct CameraContext {
    positioning: Arc<dyn PositioningService>,
    camera_names: RwLock<BTreeSet<String>>,
}

impl CameraContext {
    pub fn new(positioning: Arc<dyn PositioningService>) -> Self {
        Self {
            positioning,
            camera_names: RwLock::new(BTreeSet::new()),
        }
    }

    /// Replaces the camera-name set wholesale. Duplicates collapse; order is
    /// irrelevant (resolution probes names in sorted order).
    pub fn set_camera_names(&self, names: Vec<String>) {
        let set: BTreeSet<String> = names.into_iter().collect();
        let joined = set
            .iter()
            .map(|n| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!("Setting camera names: {}", joined);
        *self.camera_names.write().unwrap() = set;
    }

    pub fn camera_names(&self) -> BTreeSet<String> {
        self.camera_names.read().unwrap().clone()
    }

    /// Resolves the active camera: first configured name found in the
    /// current scene.
    pub fn resolve_active(&self) -> Result<CameraHandle, HostError> {
        let names = self.camera_names.read().unwrap();
        if names.is_empty() {
            return Err(HostError::NoCameraNames);
        }
        self.positioning.resolve_active(&names)
    }

    pub fn positioning(&self) -> &dyn PositioningService {
        self.positioning.as_ref()
    }
}
