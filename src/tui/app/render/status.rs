#![allow(clippy::cast_possible_truncation)]

use crate::core::types::Usage;
use crate::ui::theme::{Spinners, Theme};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use std::time::Duration;

pub const DISCLAIMER: &str = "Gemini can make mistakes. Please verify important technical details.";

pub struct StatusInfo<'a> {
    pub is_processing: bool,
    pub elapsed: Option<Duration>,
    pub spinner_frame: usize,
    pub last_usage: Option<&'a Usage>,
    pub session_usage: &'a Usage,
}

fn format_tokens(count: u32) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", f64::from(count) / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", f64::from(count) / 1_000.0)
    } else {
        count.to_string()
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs > 0 {
        format!("{secs}s")
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

fn right_side(info: &StatusInfo<'_>) -> Option<Line<'static>> {
    if info.is_processing {
        let frames = Spinners::BRAILLE;
        let frame_char = frames[info.spinner_frame % frames.len()];
        let elapsed = info
            .elapsed
            .map(|d| format!(" {}", format_elapsed(d)))
            .unwrap_or_default();

        return Some(Line::from(vec![
            Span::styled(format!("{frame_char} Thinking{elapsed}"), Theme::warning()),
            Span::raw(" "),
        ]));
    }

    let text = if let Some(usage) = info.last_usage {
        format!(
            "Last: {}in/{}out | Session: {}",
            format_tokens(usage.input_tokens),
            format_tokens(usage.output_tokens),
            format_tokens(info.session_usage.total())
        )
    } else if info.session_usage.total() > 0 {
        format!("Session: {} tokens", format_tokens(info.session_usage.total()))
    } else {
        return None;
    };

    Some(Line::from(vec![
        Span::styled(text, Theme::muted()),
        Span::raw(" "),
    ]))
}

/// Disclaimer on the left, activity or token usage on the right.
pub fn render_status(buf: &mut Buffer, area: Rect, info: &StatusInfo<'_>) {
    if area.height == 0 {
        return;
    }

    let right = right_side(info);
    let right_width = right.as_ref().map_or(0, |line| line.width() as u16);

    let left = Line::from(vec![Span::raw(" "), Span::styled(DISCLAIMER, Theme::muted())]);
    let left_width = area.width.saturating_sub(right_width + 1);
    buf.set_line(area.x, area.y, &left, left_width);

    if let Some(line) = right
        && right_width <= area.width
    {
        buf.set_line(
            area.x + area.width - right_width,
            area.y,
            &line,
            right_width,
        );
    }
}
