use serde::Serialize;
use std::time::SystemTime;

use crate::state::{DialogState, HorizontalPosition, VerticalPosition};

/// Exit code reserved for a `quit:` directive
pub const EXIT_CODE_COMMAND_QUIT: i32 = 5;

/// Input to the engine task
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Text read from the command file, with the file's modification time
    Chunk { text: String, modified: SystemTime },
}

/// Side effect a directive asks the host to perform
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Move/resize the window frame
    Reposition {
        width: f64,
        /// Frame height including the title bar
        height: f64,
        vertical: VerticalPosition,
        horizontal: HorizontalPosition,
        offset: f64,
    },
    /// Bring the window to the foreground
    Activate,
    /// Terminate with the given exit code
    Quit { exit_code: i32 },
}

/// Line emitted on stdout with `--json`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRecord<'a> {
    State { state: &'a DialogState },
    Effect { effect: &'a Effect },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_effect_record() {
        let effect = Effect::Quit {
            exit_code: EXIT_CODE_COMMAND_QUIT,
        };
        let json = serde_json::to_string(&OutputRecord::Effect { effect: &effect }).unwrap();
        assert!(json.contains("\"type\":\"effect\""));
        assert!(json.contains("\"effect\":\"quit\""));
        assert!(json.contains("\"exit_code\":5"));
    }

    #[test]
    fn test_serialize_state_record() {
        let state = DialogState::default();
        let json = serde_json::to_string(&OutputRecord::State { state: &state }).unwrap();
        assert!(json.starts_with("{\"type\":\"state\""));
    }
}
