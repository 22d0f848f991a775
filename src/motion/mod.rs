// src/motion/mod.rs - Single-flight camera motion engine
//
// Turns a target position, a duration and an easing curve into a paced
// sequence of position updates pushed to the host. At most one animation is
// in flight at a time; overlapping requests are dropped with a warning, never
// queued or merged.
pub mod easing;

pub use easing::{EasingError, EasingKind, ease};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::context::CameraContext;
use crate::host::CameraHandle;

pub struct MotionEngine {
    ctx: Arc<CameraContext>,
    speed_px_per_sec: f32,
    moving: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MotionEngine {
    pub fn new(ctx: Arc<CameraContext>, speed_px_per_sec: f32) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            ctx,
            speed_px_per_sec,
            moving: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Starts an animation toward `(x, y)` and returns immediately.
    ///
    /// If no active camera resolves, or an animation is already in flight,
    /// the request is dropped with a warning. The caller has already replied
    /// `OK` by the time this runs; failures here are log-only.
    pub fn move_to(&self, x: f32, y: f32, duration_ms: u64, easing: EasingKind) {
        let camera = match self.ctx.resolve_active() {
            Ok(camera) => camera,
            Err(e) => {
                tracing::warn!("Can't find active camera; moving is not possible! ({})", e);
                return;
            }
        };

        // Atomic check-and-set: two near-simultaneous requests cannot both
        // win the flag.
        if self
            .moving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Camera moving is already active");
            return;
        }

        let ctx = self.ctx.clone();
        let moving = self.moving.clone();
        let speed = self.speed_px_per_sec;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            run_animation(ctx, camera, x, y, duration_ms, easing, speed, &mut shutdown_rx).await;
            moving.store(false, Ordering::SeqCst);
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Reads the current camera position and animates to `current + delta`.
    pub fn move_by(&self, dx: f32, dy: f32, duration_ms: u64, easing: EasingKind) {
        let camera = match self.ctx.resolve_active() {
            Ok(camera) => camera,
            Err(e) => {
                tracing::warn!("Can't find active camera; moving is not possible! ({})", e);
                return;
            }
        };

        let (start_x, start_y) = match self.ctx.positioning().position(camera) {
            Ok(pos) => pos,
            Err(e) => {
                tracing::warn!("Failed to read camera position: {}", e);
                return;
            }
        };

        self.move_to(start_x + dx, start_y + dy, duration_ms, easing);
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::SeqCst)
    }

    /// Signals any in-flight animation to stop and waits for it, bounded.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(Duration::from_secs(1), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Animation task failed: {}", e),
                Err(_) => tracing::warn!("Timed out waiting for animation task to stop"),
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_animation(
    ctx: Arc<CameraContext>,
    camera: CameraHandle,
    x: f32,
    y: f32,
    duration_ms: u64,
    easing: EasingKind,
    speed_px_per_sec: f32,
    shutdown_rx: &mut broadcast::Receiver<()>,
) {
    let (start_x, start_y) = match ctx.positioning().position(camera) {
        Ok(pos) => pos,
        Err(e) => {
            tracing::warn!("Failed to read camera position: {}", e);
            return;
        }
    };
    tracing::debug!("Starting pos: {}, {}", start_x, start_y);

    let distance = ((x - start_x).powi(2) + (y - start_y).powi(2)).sqrt();

    let mut fps = ctx.positioning().frame_rate();
    if fps <= 0.0 {
        tracing::error!("Failed to retrieve frame rate from host. Defaulting to 60.");
        fps = 60.0;
    }

    let speed_per_frame = speed_px_per_sec / fps as f32;
    let steps = ((distance / speed_per_frame).round() as i64).max(1);
    let step_duration = duration_ms as f32 / steps as f32;

    tracing::debug!("Number of steps: {}", steps);
    tracing::debug!("FPS: {}", fps);
    tracing::debug!("Step duration: {}", step_duration);

    for i in 0..steps {
        let t = ease(easing, i as f32 / steps as f32);

        let new_x = start_x + t * (x - start_x);
        let new_y = start_y + t * (y - start_y);

        if let Err(e) = ctx.positioning().set_position(camera, new_x, new_y) {
            tracing::warn!("Failed to update camera position: {}", e);
            return;
        }

        tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::debug!("Animation stopped by shutdown signal");
                return;
            }
            _ = tokio::time::sleep(Duration::from_millis(step_duration as u64)) => {}
        }
    }
}
