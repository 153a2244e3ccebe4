#![allow(clippy::cast_possible_truncation)]

use crate::core::prompt::{FAILURE_NOTICE, INIT_FAILURE_NOTICE};
use crate::tui::state::Notice;
use crate::ui::theme::{BoxChars, Theme};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

const MAX_NOTICE_LINES: usize = 8;
const DISMISS_HINT: &str = "  (Esc to dismiss)";

/// Lines for the notice band between transcript and composer.
#[must_use]
pub fn notice_lines(notice: &Notice<'_>) -> Vec<Line<'static>> {
    let (headline, detail, dismissible) = match *notice {
        Notice::Unavailable(detail) => (INIT_FAILURE_NOTICE, Some(detail), false),
        Notice::Failed(detail) => (FAILURE_NOTICE, Some(detail), true),
        Notice::Info(text) => {
            let mut rows = text.lines();
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!("{} {}", BoxChars::INFO, rows.next().unwrap_or_default()),
                    Theme::primary(),
                ),
                Span::styled(DISMISS_HINT, Theme::muted()),
            ])];
            lines.extend(
                rows.take(MAX_NOTICE_LINES - 1)
                    .map(|row| Line::from(Span::styled(format!("  {row}"), Theme::off_white()))),
            );
            return lines;
        }
    };

    let mut first = vec![Span::styled(
        format!("{} {headline}", BoxChars::INFO),
        Theme::error(),
    )];
    if dismissible {
        first.push(Span::styled(DISMISS_HINT, Theme::muted()));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(format!("  {detail}"), Theme::muted())));
    }
    lines
}

pub fn render_notice(buf: &mut Buffer, area: Rect, lines: &[Line<'_>]) {
    for (i, line) in lines.iter().take(area.height as usize).enumerate() {
        buf.set_line(area.x + 1, area.y + i as u16, line, area.width.saturating_sub(2));
    }
}
