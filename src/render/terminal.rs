//! Terminal rendering for panels and the chat log.
//!
//! Table mode prints colored, aligned rows; JSON mode prints one JSON
//! document per panel so the output can be piped.

use colored::Colorize;
use serde_json::{Value, json};

use super::{DisplayMap, LOADING_TEXT, Panel, PanelState};
use crate::chat::{ChatLine, Sender};

/// Turn colored output off when the config says so. `NO_COLOR` is already
/// honored by `colored` itself.
pub fn configure_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Print a panel under a bold title.
pub fn print_panel(title: &str, panel: &Panel) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(50));

    match panel.state() {
        PanelState::Empty => println!("  {}", "(no result yet)".dimmed()),
        PanelState::Loading => println!("  {}", LOADING_TEXT.dimmed()),
        PanelState::Error(message) => {
            println!("  {} {}", "✗".red().bold(), message.red());
        }
        PanelState::Success { data, .. } => {
            if data.is_empty() {
                println!("  {}", "(empty result)".dimmed());
            }
            for line in format_rows(data) {
                println!("{line}");
            }
        }
    }
    println!();
}

/// Print a panel as a JSON document.
pub fn print_panel_json(title: &str, panel: &Panel) {
    let value = panel_json(title, panel);
    println!(
        "{}",
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    );
}

/// JSON form of a panel: `{module, panel, status, data | error}`.
///
/// `data` is an array of `{label, value}` objects in row order, so repeated
/// labels survive.
pub fn panel_json(title: &str, panel: &Panel) -> Value {
    let mut value = json!({
        "module": title,
        "panel": panel.id(),
    });

    let (status, key, body) = match panel.state() {
        PanelState::Empty => ("empty", None, Value::Null),
        PanelState::Loading => ("loading", None, Value::Null),
        PanelState::Error(message) => ("error", Some("error"), Value::String(message.clone())),
        PanelState::Success { data, .. } => ("success", Some("data"), rows_json(data)),
    };

    value["status"] = Value::String(status.to_string());
    if let Some(key) = key {
        value[key] = body;
    }
    value
}

fn rows_json(map: &DisplayMap) -> Value {
    map.rows()
        .iter()
        .map(|(label, value)| json!({ "label": label, "value": value }))
        .collect()
}

/// Aligned `label  value` lines, indented by two spaces. Labels keep their
/// own leading whitespace, so nested rows stay nested.
pub fn format_rows(map: &DisplayMap) -> Vec<String> {
    let width = map
        .rows()
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    map.rows()
        .iter()
        .map(|(label, value)| {
            let pad = width - label.chars().count();
            format!("  {}{}  {}", label.bold(), " ".repeat(pad), value)
        })
        .collect()
}

/// Print one chat log line with a sender prompt.
pub fn print_chat_line(line: &ChatLine) {
    match line.sender {
        Sender::User => println!("{} {}", "you ›".cyan().bold(), line.text),
        Sender::Bot => println!("{} {}", "bot ›".green().bold(), line.text),
    }
}
