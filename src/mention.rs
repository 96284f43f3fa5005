//! `@agent` mentions
//!
//! A message can address one agent directly by mentioning it (`@cfo what
//! margin...`). This module extracts that target and drives the autocomplete
//! menu that helps the user type it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Agents a message can be addressed to, in menu order.
pub const KNOWN_AGENTS: [&str; 3] = ["designer", "farmer", "cfo"];

/// Agent implied when an image is attached without a mention.
pub const IMAGE_AGENT: &str = "designer";

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)@(designer|farmer|cfo)\b").expect("Invalid mention regex"));

/// A user message split into its target agent and the text to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Lowercase agent key, or `None` to let the server pick
    pub target_agent: Option<String>,
    /// Message with every mention removed, trimmed
    pub clean_text: String,
    /// Attached image, if any
    pub image_id: Option<String>,
}

impl ParsedMessage {
    /// Attach an image; with no explicit mention the image goes to the designer.
    pub fn with_image(mut self, image_id: Option<String>) -> Self {
        if self.target_agent.is_none() && image_id.is_some() {
            self.target_agent = Some(IMAGE_AGENT.to_string());
        }
        self.image_id = image_id;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image_id.is_some()
    }
}

/// Extract the first mention (case-insensitive) and strip all of them.
///
/// # Example
///
/// ```
/// use biochat::mention::parse_mention;
///
/// let parsed = parse_mention("@CFO what is our margin?");
/// assert_eq!(parsed.target_agent.as_deref(), Some("cfo"));
/// assert_eq!(parsed.clean_text, "what is our margin?");
/// ```
pub fn parse_mention(raw_text: &str) -> ParsedMessage {
    let target_agent = MENTION_RE
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase());

    let clean_text = MENTION_RE.replace_all(raw_text, "").trim().to_string();

    ParsedMessage {
        target_agent,
        clean_text,
        image_id: None,
    }
}

/// Autocomplete menu state for typing a mention.
///
/// The menu opens while the text after the last `@` could still become a
/// known agent name. Nothing is selected when it opens; arrow keys move the
/// selection and wrap around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionMenu {
    visible: bool,
    selected: Option<usize>,
}

impl MentionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mention text of the highlighted item, e.g. `@farmer`.
    pub fn selected(&self) -> Option<String> {
        self.selected.map(|i| format!("@{}", KNOWN_AGENTS[i]))
    }

    /// Update visibility after the input text changed.
    pub fn on_input(&mut self, text: &str) {
        let Some(at) = text.rfind('@') else {
            self.hide();
            return;
        };

        let fragment = &text[at + 1..];
        let partial = fragment.to_lowercase();
        let could_complete = KNOWN_AGENTS.iter().any(|a| a.starts_with(&partial));

        if fragment.is_empty() || (could_complete && !fragment.contains(' ')) {
            self.show();
        } else {
            self.hide();
        }
    }

    pub fn move_down(&mut self) {
        if self.visible {
            self.selected = Some(self.selected.map_or(0, |i| (i + 1) % KNOWN_AGENTS.len()));
        }
    }

    pub fn move_up(&mut self) {
        if self.visible {
            let len = KNOWN_AGENTS.len();
            self.selected = Some(self.selected.map_or(len - 1, |i| (i + len - 1) % len));
        }
    }

    /// Complete the mention being typed in `text`.
    ///
    /// Returns the new input text, with everything from the last `@` replaced
    /// by the selected mention and a space, or `None` if nothing is selected.
    pub fn accept(&mut self, text: &str) -> Option<String> {
        if !self.visible {
            return None;
        }
        let mention = self.selected()?;
        let at = text.rfind('@').unwrap_or(text.len());
        self.hide();
        Some(format!("{}{} ", &text[..at], mention))
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.selected = None;
    }

    fn show(&mut self) {
        self.visible = true;
        self.selected = None;
    }
}
