//! Output formatting for CLI commands

use serde::Serialize;

/// Format output as JSON (--json) or with the command's text renderer
pub fn format_output<T: Serialize>(data: &T, json: bool, text: impl FnOnce(&T) -> String) -> String {
    if json {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
    } else {
        text(data)
    }
}
