// src/host/simulated.rs - In-memory stand-in for the compositing host
//
// Backs the standalone binary and the test suite: a single scene holding
// named sources with positions, plus a configurable frame rate.
use std::collections::BTreeSet;
use std::sync::Mutex;

use super::{CameraHandle, HostError, PositioningService};

struct SimSource {
    id: u64,
    name: String,
    x: f32,
    y: f32,
}

struct SimScene {
    active: bool,
    sources: Vec<SimSource>,
    frame_rate: f64,
    next_id: u64,
}

pub struct SimulatedHost {
    scene: Mutex<SimScene>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            scene: Mutex::new(SimScene {
                active: true,
                sources: Vec::new(),
                frame_rate: 60.0,
                next_id: 1,
            }),
        }
    }

    /// Adds a named source to the scene and returns its handle.
    pub fn add_source(&self, name: &str, x: f32, y: f32) -> CameraHandle {
        let mut scene = self.scene.lock().unwrap();
        let id = scene.next_id;
        scene.next_id += 1;
        scene.sources.push(SimSource {
            id,
            name: name.to_string(),
            x,
            y,
        });
        CameraHandle(id)
    }

    /// Simulates the host having no current scene.
    pub fn set_scene_active(&self, active: bool) {
        self.scene.lock().unwrap().active = active;
    }

    pub fn set_frame_rate(&self, frame_rate: f64) {
        self.scene.lock().unwrap().frame_rate = frame_rate;
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PositioningService for SimulatedHost {
    fn resolve_active(&self, names: &BTreeSet<String>) -> Result<CameraHandle, HostError> {
        let scene = self.scene.lock().unwrap();
        if !scene.active {
            return Err(HostError::NoActiveScene);
        }
        for name in names {
            if let Some(source) = scene.sources.iter().find(|s| &s.name == name) {
                return Ok(CameraHandle(source.id));
            }
        }
        Err(HostError::CameraNotFound)
    }

    fn name(&self, camera: CameraHandle) -> Result<String, HostError> {
        let scene = self.scene.lock().unwrap();
        scene
            .sources
            .iter()
            .find(|s| s.id == camera.0)
            .map(|s| s.name.clone())
            .ok_or(HostError::SourceUnresolvable)
    }

    fn position(&self, camera: CameraHandle) -> Result<(f32, f32), HostError> {
        let scene = self.scene.lock().unwrap();
        scene
            .sources
            .iter()
            .find(|s| s.id == camera.0)
            .map(|s| (s.x, s.y))
            .ok_or(HostError::SourceUnresolvable)
    }

    fn set_position(&self, camera: CameraHandle, x: f32, y: f32) -> Result<(), HostError> {
        let mut scene = self.scene.lock().unwrap();
        let source = scene
            .sources
            .iter_mut()
            .find(|s| s.id == camera.0)
            .ok_or(HostError::SourceUnresolvable)?;
        source.x = x;
        source.y = y;
        Ok(())
    }

    fn frame_rate(&self) -> f64 {
        self.scene.lock().unwrap().frame_rate
    }
}
