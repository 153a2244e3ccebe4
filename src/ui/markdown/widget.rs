use markdown::{ParseOptions, to_mdast};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::ui::theme::Theme;

use super::block::render_node;
use super::context::RenderContext;

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("failed to parse markdown: {0}")]
    Parse(String),
}

/// Renders assistant replies (GitHub-flavoured markdown) into styled,
/// pre-wrapped lines.
#[derive(Debug, Clone)]
pub struct MarkdownWidget {
    content: String,
    width: Option<usize>,
}

impl MarkdownWidget {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            width: None,
        }
    }

    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render_to_lines(&self) -> Result<Vec<Line<'static>>, MarkdownError> {
        let ast = to_mdast(&self.content, &ParseOptions::gfm())
            .map_err(|e| MarkdownError::Parse(e.to_string()))?;

        let mut lines = render_node(&ast, RenderContext::new(self.width));
        while lines.last().is_some_and(|line| line.spans.is_empty()) {
            lines.pop();
        }

        Ok(lines)
    }

    /// Like [`render_to_lines`](Self::render_to_lines), but falls back to
    /// the raw text so a reply is never hidden.
    #[must_use]
    pub fn render_or_plain(&self) -> Vec<Line<'static>> {
        self.render_to_lines().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "markdown fallback");
            self.content
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), Theme::off_white())))
                .collect()
        })
    }
}
