//! Presentation helpers: result panels, display mappings, HTML escaping.
//!
//! A [`Panel`] is the result container of one dashboard module. Handlers
//! only ever move it between three states (loading, error, success); how the
//! state is drawn is up to the caller, either as the page's HTML fragment
//! ([`Panel::to_html`]) or on the terminal ([`terminal`]).

pub mod terminal;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Text shown while a request is in flight.
pub const LOADING_TEXT: &str = "Processing...";

// ---------------------------------------------------------------------------
// Display mapping
// ---------------------------------------------------------------------------

/// Ordered `label → value` rows produced by a module's response transform.
///
/// Labels may repeat; rows keep insertion order. Serializes as a JSON
/// object in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMap {
    rows: Vec<(String, String)>,
}

impl DisplayMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push((label.into(), value.into()));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(label, value);
        self
    }

    /// Value of the first row with this label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indented (2-space) JSON text of the mapping.
    pub fn to_pretty_json(&self) -> String {
        // Serializing string pairs into a Vec cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl Serialize for DisplayMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (label, value) in &self.rows {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// What a panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing rendered yet.
    Empty,
    Loading,
    Error(String),
    Success { data: DisplayMap, json: String },
}

/// Result container for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    id: String,
    state: PanelState,
    visible: bool,
}

impl Panel {
    /// A hidden, empty panel with the page element id (e.g. `pricing-result`).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: PanelState::Empty,
            visible: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Replace the content with the loading indicator. Visibility is left
    /// as it was.
    pub fn show_loading(&mut self) {
        self.state = PanelState::Loading;
    }

    /// Replace the content with an error and make the panel visible.
    ///
    /// `message` goes into the HTML fragment verbatim; callers pass trusted
    /// or pre-escaped text.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.state = PanelState::Error(message.into());
        self.visible = true;
    }

    /// Replace the content with the indented JSON of `data` and make the
    /// panel visible.
    pub fn show_result(&mut self, data: DisplayMap) {
        let json = data.to_pretty_json();
        self.state = PanelState::Success { data, json };
        self.visible = true;
    }

    /// Error text, if the panel shows an error.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            PanelState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Display mapping, if the panel shows a result.
    pub fn result(&self) -> Option<&DisplayMap> {
        match &self.state {
            PanelState::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The page's inner HTML for the current state.
    pub fn to_html(&self) -> String {
        match &self.state {
            PanelState::Empty => String::new(),
            PanelState::Loading => format!(
                r#"<div class="loading"><i class="fas fa-spinner fa-spin"></i> {LOADING_TEXT}</div>"#
            ),
            PanelState::Error(message) => format!(
                r#"<div class="error-message"><i class="fas fa-exclamation-circle"></i> {message}</div>"#
            ),
            PanelState::Success { json, .. } => format!(
                r#"<div class="success-message"><pre>{}</pre></div>"#,
                escape_html(json)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_replaces_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn display_map_keeps_order_and_duplicates() {
        let map = DisplayMap::new()
            .with("Product 1", "A (HIGH)")
            .with("  Reason", "first")
            .with("Product 2", "B (NORMAL)")
            .with("  Reason", "second");
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("  Reason"), Some("first"));
        assert_eq!(
            map.to_pretty_json(),
            "{\n  \"Product 1\": \"A (HIGH)\",\n  \"  Reason\": \"first\",\n  \"Product 2\": \"B (NORMAL)\",\n  \"  Reason\": \"second\"\n}"
        );
    }

    #[test]
    fn empty_map_serializes_to_empty_object() {
        assert_eq!(DisplayMap::new().to_pretty_json(), "{}");
    }

    #[test]
    fn loading_keeps_visibility() {
        let mut panel = Panel::new("sentiment-result");
        panel.show_loading();
        assert_eq!(panel.state(), &PanelState::Loading);
        assert!(!panel.is_visible());
        panel.show_loading();
        assert_eq!(panel.state(), &PanelState::Loading);
    }

    #[test]
    fn error_is_visible_and_not_escaped() {
        let mut panel = Panel::new("pricing-result");
        panel.show_error("<b>bad</b>");
        assert!(panel.is_visible());
        assert_eq!(panel.error(), Some("<b>bad</b>"));
        assert!(panel.to_html().contains("<b>bad</b>"));
        assert!(panel.to_html().starts_with(r#"<div class="error-message">"#));
    }

    #[test]
    fn result_renders_indented_json() {
        let mut panel = Panel::new("benchmark-result");
        panel.show_result(DisplayMap::new().with("Trend", "UP"));
        assert!(panel.is_visible());
        assert_eq!(panel.result().and_then(|m| m.get("Trend")), Some("UP"));
        assert_eq!(
            panel.to_html(),
            "<div class=\"success-message\"><pre>{\n  &quot;Trend&quot;: &quot;UP&quot;\n}</pre></div>"
        );
    }
}
