#![allow(clippy::cast_possible_truncation)]

mod render;
mod scroll_state;

pub use render::render_message;
pub use scroll_state::ScrollState;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::core::types::Message;
use crate::ui::theme::{BoxChars, Theme};

const MORE_INDICATOR: &str = "↓ More";

/// Scrollable transcript of the conversation.
pub struct ChatWidget<'a> {
    messages: &'a [Message],
    scroll: &'a mut ScrollState,
    spinner_frame: usize,
}

impl<'a> ChatWidget<'a> {
    #[must_use]
    pub const fn new(
        messages: &'a [Message],
        scroll: &'a mut ScrollState,
        spinner_frame: usize,
    ) -> Self {
        Self {
            messages,
            scroll,
            spinner_frame,
        }
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 {
            return;
        }

        if self.messages.is_empty() {
            Self::render_empty_state(area, buf);
            return;
        }

        let content_width = area.width.saturating_sub(2);
        let lines = self.collect_lines(content_width);

        self.scroll.sync(lines.len(), area.height as usize);

        let range = self.scroll.visible_range();
        for (i, line) in lines[range].iter().enumerate() {
            buf.set_line(area.x + 1, area.y + i as u16, line, content_width);
        }

        if self.scroll.has_more_below() {
            Self::render_more_indicator(area, buf);
        }
    }

    fn collect_lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (idx, message) in self.messages.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            lines.extend(render_message(message, width, self.spinner_frame));
        }

        lines
    }

    fn render_empty_state(area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::default(),
            Line::from(vec![
                Span::styled(format!("{} ", BoxChars::SPARKLE), Theme::assistant()),
                Span::styled("Chatbot With Gemini", Theme::primary_bold()),
            ])
            .alignment(Alignment::Center),
            Line::default(),
            Line::from(Span::styled(
                "Type a message below and press Enter to chat.",
                Theme::muted(),
            ))
            .alignment(Alignment::Center),
        ];

        Paragraph::new(lines).render(area, buf);
    }

    fn render_more_indicator(area: Rect, buf: &mut Buffer) {
        let width = MORE_INDICATOR.chars().count() as u16 + 2;
        if area.width <= width {
            return;
        }

        let indicator_area = Rect {
            x: area.x + area.width - width,
            y: area.y + area.height - 1,
            width,
            height: 1,
        };

        Paragraph::new(Line::from(Span::styled(MORE_INDICATOR, Theme::warning())))
            .render(indicator_area, buf);
    }
}
