// src/router/mod.rs - Verb registry and built-in command handlers
//
// Handlers run synchronously on the connection's I/O path and return exactly
// one reply line. Motion handlers validate, kick the engine off and reply
// `OK` without waiting for the animation; resolution failures after that
// acknowledgement are log-only (deliberate wire-protocol asymmetry).
use std::collections::HashMap;
use std::num::IntErrorKind;
use std::sync::Arc;

use crate::context::CameraContext;
use crate::motion::{EasingKind, MotionEngine};
use crate::protocol::{Command, ParseError, parse_command};

pub type HandlerFn = Box<dyn Fn(&HandlerContext, &Command) -> String + Send + Sync>;

/// Shared state handed to every handler invocation.
pub struct HandlerContext {
    pub ctx: Arc<CameraContext>,
    pub engine: Arc<MotionEngine>,
}

pub struct CommandRouter {
    handlers: HashMap<String, HandlerFn>,
    handler_ctx: HandlerContext,
}

impl CommandRouter {
    pub fn new(ctx: Arc<CameraContext>, engine: Arc<MotionEngine>) -> Self {
        let mut router = Self {
            handlers: HashMap::new(),
            handler_ctx: HandlerContext { ctx, engine },
        };
        router.register_handler("test_echo", Box::new(handle_test_echo));
        router.register_handler("set_camera_names", Box::new(handle_set_camera_names));
        router.register_handler("get_camera_name", Box::new(handle_get_camera_name));
        router.register_handler("move_to", Box::new(handle_move_to));
        router.register_handler("move_by", Box::new(handle_move_by));
        router.register_handler("get_camera_position", Box::new(handle_get_camera_position));
        router
    }

    pub fn register_handler(&mut self, verb: &str, handler: HandlerFn) {
        self.handlers.insert(verb.to_string(), handler);
    }

    /// Parses one raw line and dispatches it. Always returns a reply line;
    /// malformed input and unknown verbs degrade to error text, never a
    /// dropped connection.
    pub fn process_message(&self, line: &str) -> String {
        match parse_command(line) {
            Ok(command) => self.dispatch(&command),
            Err(ParseError::Malformed(raw)) => {
                tracing::error!("Error processing message: invalid command: {}", raw);
                "ERROR: Invalid command".to_string()
            }
        }
    }

    pub fn dispatch(&self, command: &Command) -> String {
        match self.handlers.get(&command.verb) {
            Some(handler) => handler(&self.handler_ctx, command),
            None => {
                tracing::error!("Unknown command: {}", command.verb);
                format!("ERROR: Unknown command: {}", command.verb)
            }
        }
    }
}

fn log_error(message: String) -> String {
    tracing::error!("{}", message);
    format!("ERROR: {message}")
}

fn handle_test_echo(_hctx: &HandlerContext, command: &Command) -> String {
    match command.args.as_slice() {
        [text] if !text.is_empty() => format!("Test echo: {text}"),
        _ => "Test echo: This test message is 100% gluten-free, enjoy responsibly!".to_string(),
    }
}

fn handle_set_camera_names(hctx: &HandlerContext, command: &Command) -> String {
    let names: Vec<String> = command
        .args
        .iter()
        .filter(|name| !name.is_empty())
        .cloned()
        .collect();

    if names.is_empty() {
        return log_error("No valid camera names provided".to_string());
    }

    let count = names.len();
    hctx.ctx.set_camera_names(names);
    format!("OK: Camera names set ({count})")
}

fn handle_get_camera_name(hctx: &HandlerContext, _command: &Command) -> String {
    let result = hctx
        .ctx
        .resolve_active()
        .and_then(|camera| hctx.ctx.positioning().name(camera));
    match result {
        Ok(name) => name,
        Err(e) => log_error(e.to_string()),
    }
}

fn handle_get_camera_position(hctx: &HandlerContext, _command: &Command) -> String {
    let result = hctx
        .ctx
        .resolve_active()
        .and_then(|camera| hctx.ctx.positioning().position(camera));
    match result {
        Ok((x, y)) => format!("camera-position: x={x}, y={y}"),
        Err(e) => log_error(e.to_string()),
    }
}

fn handle_move_to(hctx: &HandlerContext, command: &Command) -> String {
    match parse_motion_args("move_to", &command.args) {
        Ok((x, y, duration, easing)) => {
            hctx.engine.move_to(x as f32, y as f32, duration, easing);
            "OK".to_string()
        }
        Err(reply) => reply,
    }
}

fn handle_move_by(hctx: &HandlerContext, command: &Command) -> String {
    match parse_motion_args("move_by", &command.args) {
        Ok((dx, dy, duration, easing)) => {
            hctx.engine.move_by(dx as f32, dy as f32, duration, easing);
            "OK".to_string()
        }
        Err(reply) => reply,
    }
}

enum ArgError {
    NotInteger,
    OutOfRange,
}

/// Validates `x, y, duration[, easing]` for the motion verbs. On failure the
/// `Err` carries the finished error reply line.
fn parse_motion_args(verb: &str, args: &[String]) -> Result<(i32, i32, u64, EasingKind), String> {
    if args.len() != 3 && args.len() != 4 {
        return Err(log_error(format!(
            "Wrong number of parameters for {verb} command: {}",
            args.len()
        )));
    }

    let parsed: Result<(i32, i32, u64, EasingKind), ArgError> = (|| {
        let x = parse_int::<i32>(&args[0])?;
        let y = parse_int::<i32>(&args[1])?;
        let duration = parse_int::<u64>(&args[2])?;
        let easing = match args.get(3) {
            Some(value) => {
                let value = parse_int::<u8>(value)?;
                EasingKind::try_from(value).map_err(|_| ArgError::OutOfRange)?
            }
            None => EasingKind::Linear,
        };
        Ok((x, y, duration, easing))
    })();

    parsed.map_err(|e| match e {
        ArgError::NotInteger => log_error(format!(
            "Invalid parameter(s) for {verb}. All parameters must be integers."
        )),
        ArgError::OutOfRange => log_error(format!("Parameter(s) out of range for {verb}.")),
    })
}

fn parse_int<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    value: &str,
) -> Result<T, ArgError> {
    value.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ArgError::OutOfRange,
        _ => ArgError::NotInteger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;

    fn test_router() -> (Arc<SimulatedHost>, CommandRouter) {
        let host = Arc::new(SimulatedHost::new());
        let ctx = Arc::new(CameraContext::new(host.clone()));
        let engine = Arc::new(MotionEngine::new(ctx.clone(), 300.0));
        (host, CommandRouter::new(ctx, engine))
    }

    #[test]
    fn malformed_input_yields_invalid_reply() {
        let (_host, router) = test_router();
        assert_eq!(router.process_message("foo"), "ERROR: Invalid command");
    }

    #[test]
    fn unregistered_verb_yields_unknown_reply() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("frobnicate()"),
            "ERROR: Unknown command: frobnicate"
        );
    }

    #[test]
    fn echo_with_one_argument() {
        let (_host, router) = test_router();
        assert_eq!(router.process_message("test_echo(hello)"), "Test echo: hello");
    }

    #[test]
    fn echo_without_argument_uses_placeholder() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("test_echo()"),
            "Test echo: This test message is 100% gluten-free, enjoy responsibly!"
        );
    }

    #[test]
    fn set_names_then_resolve_name() {
        let (host, router) = test_router();
        host.add_source("Cam 1", 0.0, 0.0);

        assert_eq!(
            router.process_message("set_camera_names(\"Cam 1\", \"Cam 2\")"),
            "OK: Camera names set (2)"
        );
        assert_eq!(router.process_message("get_camera_name()"), "Cam 1");
    }

    #[test]
    fn set_names_rejects_all_empty() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("set_camera_names(\"\", \"\")"),
            "ERROR: No valid camera names provided"
        );
    }

    #[test]
    fn camera_name_without_configuration() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("get_camera_name()"),
            "ERROR: Unable to find any camera items!"
        );
    }

    #[test]
    fn camera_name_without_matching_source() {
        let (_host, router) = test_router();
        router.process_message("set_camera_names(Cam)");
        assert_eq!(
            router.process_message("get_camera_name()"),
            "ERROR: No camera in current scene found!"
        );
    }

    #[test]
    fn position_query_formats_coordinates() {
        let (host, router) = test_router();
        host.add_source("Cam 1", 12.5, -4.0);
        router.process_message("set_camera_names(\"Cam 1\")");
        assert_eq!(
            router.process_message("get_camera_position()"),
            "camera-position: x=12.5, y=-4"
        );
    }

    #[test]
    fn move_to_wrong_argument_count() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("move_to(1,2)"),
            "ERROR: Wrong number of parameters for move_to command: 2"
        );
    }

    #[test]
    fn move_to_non_integer_arguments() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("move_to(a,b,c)"),
            "ERROR: Invalid parameter(s) for move_to. All parameters must be integers."
        );
    }

    #[test]
    fn move_to_out_of_range_arguments() {
        let (_host, router) = test_router();
        assert_eq!(
            router.process_message("move_to(99999999999999999999,0,100)"),
            "ERROR: Parameter(s) out of range for move_to."
        );
        assert_eq!(
            router.process_message("move_to(0,0,100,11)"),
            "ERROR: Parameter(s) out of range for move_to."
        );
    }

    #[tokio::test]
    async fn move_to_acknowledges_before_resolution() {
        // No camera configured at all: still OK on the wire, warn in the log.
        let (_host, router) = test_router();
        assert_eq!(router.process_message("move_to(100,100,50)"), "OK");
    }

    #[tokio::test]
    async fn move_to_with_easing_starts_animation() {
        let (host, router) = test_router();
        host.add_source("Cam 1", 0.0, 0.0);
        router.process_message("set_camera_names(\"Cam 1\")");

        assert_eq!(router.process_message("move_to(100,100,50,10)"), "OK");
    }

    #[test]
    fn custom_handlers_can_be_registered() {
        let (_host, mut router) = test_router();
        router.register_handler("ping", Box::new(|_, _| "pong".to_string()));
        assert_eq!(router.process_message("ping()"), "pong");
    }
}
