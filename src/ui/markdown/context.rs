use ratatui::text::Span;

use crate::ui::theme::{BoxChars, Theme};

const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub indent_level: usize,
    pub quote_depth: usize,
    pub width: Option<usize>,
}

impl RenderContext {
    const INDENT_STR: &'static str = "  ";
    const QUOTE_WIDTH: usize = 2;

    pub const fn new(width: Option<usize>) -> Self {
        Self {
            indent_level: 0,
            quote_depth: 0,
            width,
        }
    }

    /// Leading spans for every line: list indentation, then one bar per
    /// enclosing blockquote.
    pub fn prefix(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(1 + self.quote_depth);
        if self.indent_level > 0 {
            spans.push(Span::raw(Self::INDENT_STR.repeat(self.indent_level)));
        }
        for _ in 0..self.quote_depth {
            spans.push(Span::styled(format!("{} ", BoxChars::VERTICAL), Theme::border()));
        }
        spans
    }

    pub const fn prefix_width(&self) -> usize {
        self.indent_level * Self::INDENT_STR.len() + self.quote_depth * Self::QUOTE_WIDTH
    }

    pub fn available_width(&self) -> usize {
        self.width
            .unwrap_or(DEFAULT_WIDTH)
            .saturating_sub(self.prefix_width())
            .max(1)
    }

    pub const fn nested(&self) -> Self {
        Self {
            indent_level: self.indent_level + 1,
            ..*self
        }
    }

    pub const fn quoted(&self) -> Self {
        Self {
            quote_depth: self.quote_depth + 1,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_width_counts_indent_and_quotes() {
        let ctx = RenderContext::new(Some(40)).nested().quoted();
        assert_eq!(ctx.prefix_width(), 4);
        assert_eq!(ctx.available_width(), 36);

        let text: String = ctx.prefix().iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "  │ ");
    }

    #[test]
    fn test_available_width_never_zero() {
        let ctx = RenderContext::new(Some(2)).nested().nested();
        assert_eq!(ctx.available_width(), 1);
    }
}
