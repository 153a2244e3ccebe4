mod action;
mod key_handler;
mod render;

pub use action::InputAction;

use crate::ui::theme::Theme;
use ratatui::style::Style;
use tui_textarea::TextArea;

pub const PLACEHOLDER: &str = "Ask about GDSC events, Android, Web...";

const PASTE_PLACEHOLDER_THRESHOLD: usize = 200;

#[derive(Debug, Clone)]
struct PastedBlock {
    content: String,
    paste_id: usize,
}

/// Message composer. While locked (a reply is streaming, or the session
/// never came up) typing still works but Enter does not submit.
pub struct InputWidget<'a> {
    textarea: TextArea<'a>,
    suggestions: Vec<String>,
    show_suggestions: bool,
    selected_suggestion: usize,
    pasted_blocks: Vec<PastedBlock>,
    next_paste_id: usize,
    locked: bool,
}

impl InputWidget<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            textarea: Self::create_textarea(),
            suggestions: Vec::new(),
            show_suggestions: false,
            selected_suggestion: 0,
            pasted_blocks: Vec::new(),
            next_paste_id: 0,
            locked: false,
        }
    }

    /// Composed text with paste placeholders expanded.
    #[must_use]
    pub fn text(&self) -> String {
        let raw = self.textarea.lines().join("\n");
        if self.pasted_blocks.is_empty() {
            raw
        } else {
            expand_placeholders(&raw, &self.pasted_blocks)
        }
    }

    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<String> = text.lines().map(ToString::to_string).collect();
        self.textarea = TextArea::new(lines);
        Self::configure(&mut self.textarea);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.pasted_blocks.clear();
    }

    pub fn clear(&mut self) {
        self.textarea = Self::create_textarea();
        self.suggestions.clear();
        self.show_suggestions = false;
        self.pasted_blocks.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(String::is_empty)
    }

    pub fn take(&mut self) -> String {
        let text = self.text();
        self.clear();
        text
    }

    pub const fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn create_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea.set_placeholder_style(Theme::muted());
        Self::configure(&mut textarea);
        textarea
    }

    fn configure(textarea: &mut TextArea<'_>) {
        textarea.set_cursor_line_style(Style::default());
        textarea.set_cursor_style(Theme::white());
    }

    fn make_placeholder(id: usize, byte_len: usize) -> String {
        format!("[paste#{id}:{byte_len}]")
    }
}

/// Parses `[paste#ID:LEN]` at the start of `s`.
fn parse_placeholder(s: &str) -> Option<(usize, usize, usize)> {
    let rest = s.strip_prefix("[paste#")?;
    let (id, rest) = rest.split_once(':')?;
    let (len, _) = rest.split_once(']')?;
    let consumed = "[paste#".len() + id.len() + 1 + len.len() + 1;
    Some((id.parse().ok()?, len.parse().ok()?, consumed))
}

/// Each block replaces the first placeholder carrying its id and size;
/// anything else that merely looks like a placeholder stays as typed.
fn expand_placeholders(raw: &str, blocks: &[PastedBlock]) -> String {
    let mut expanded = vec![false; blocks.len()];
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("[paste#") {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let hit = parse_placeholder(rest).and_then(|(id, len, consumed)| {
            blocks
                .iter()
                .enumerate()
                .find(|(i, b)| !expanded[*i] && b.paste_id == id && b.content.len() == len)
                .map(|(i, b)| (i, b, consumed))
        });

        if let Some((index, block, consumed)) = hit {
            expanded[index] = true;
            out.push_str(&block.content);
            rest = &rest[consumed..];
        } else {
            out.push('[');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    out
}

impl Default for InputWidget<'_> {
    fn default() -> Self {
        Self::new()
    }
}
