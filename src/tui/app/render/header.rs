#![allow(clippy::cast_possible_truncation)]

use crate::ui::theme::{BoxChars, BrandColors, Theme};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub const TITLE: &str = "Chatbot With Gemini";
const ONLINE: &str = "Gemini Assistant Online";
const OFFLINE: &str = "Gemini Assistant Offline";

/// Title row with connection status, a model subtitle, then the
/// four-colour brand bar.
pub fn render_header(buf: &mut Buffer, area: Rect, model_name: &str, online: bool) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let title = Line::from(vec![
        Span::raw(" "),
        Span::styled(BoxChars::SPARKLE, Theme::assistant()),
        Span::raw(" "),
        Span::styled(TITLE, Theme::title()),
    ]);
    buf.set_line(area.x, area.y, &title, area.width);

    let (dot_style, label) = if online {
        (Theme::success(), ONLINE)
    } else {
        (Theme::error(), OFFLINE)
    };
    let status = Line::from(vec![
        Span::styled(BoxChars::BULLET, dot_style),
        Span::raw(" "),
        Span::styled(label, Theme::muted()),
        Span::raw(" "),
    ]);
    let status_width = status.width() as u16;
    if area.width > title.width() as u16 + status_width + 1 {
        buf.set_line(
            area.x + area.width - status_width,
            area.y,
            &status,
            status_width,
        );
    }

    if area.height > 1 && !model_name.is_empty() {
        let subtitle = Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("Model: {model_name}"), Theme::muted()),
        ]);
        buf.set_line(area.x, area.y + 1, &subtitle, area.width);
    }

    if area.height > 2 {
        render_brand_bar(buf, Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        });
    }
}

fn render_brand_bar(buf: &mut Buffer, area: Rect) {
    let segments = BrandColors::BAR.len() as u16;
    let segment_width = area.width / segments;

    for (i, color) in BrandColors::BAR.iter().enumerate() {
        let i = i as u16;
        let x = area.x + i * segment_width;
        let width = if i + 1 == segments {
            area.width - i * segment_width
        } else {
            segment_width
        };
        let line = Line::from(Span::styled(
            BoxChars::HEAVY_HORIZONTAL.repeat(width as usize),
            Style::new().fg(*color),
        ));
        buf.set_line(x, area.y, &line, width);
    }
}
