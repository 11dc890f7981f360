//! Control handler. Acknowledges shutdown/restart requests without acting on them.

pub const SHUTDOWN_RESPONSE: &str = "Shutdown command received";
pub const RESTART_RESPONSE: &str = "Restart command received";
pub const UNRECOGNIZED_RESPONSE: &str = "Control command not recognized";

pub fn respond(text: &str) -> &'static str {
    if text.contains("shutdown") {
        SHUTDOWN_RESPONSE
    } else if text.contains("restart") {
        RESTART_RESPONSE
    } else {
        UNRECOGNIZED_RESPONSE
    }
}
