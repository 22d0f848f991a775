// src/lib.rs - Camera motion control-plane
//
// A line-oriented TCP control server that repositions a camera element in a
// video-compositing host. The host owns the camera; all scene access goes
// through the `host::PositioningService` boundary.
pub mod config;
pub mod context;
pub mod host;
pub mod motion;
pub mod protocol;
pub mod router;
pub mod server;

pub use config::{Config, load_config};
pub use context::CameraContext;
pub use host::{CameraHandle, HostError, PositioningService, SimulatedHost};
pub use motion::{EasingKind, MotionEngine};
pub use protocol::{Command, ParseError};
pub use router::CommandRouter;
pub use server::{CommandServer, ServerError};
