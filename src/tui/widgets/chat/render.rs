use ratatui::text::{Line, Span};

use crate::core::types::Message;
use crate::ui::markdown::MarkdownWidget;
use crate::ui::theme::{BoxChars, Spinners, Theme};

const ASSISTANT_NAME: &str = "Gemini";
const USER_NAME: &str = "You";
const BODY_INDENT: &str = "  ";
const MIN_BUBBLE_WIDTH: usize = 12;

/// Lines for one bubble: a header with author and time, then the body.
pub fn render_message(message: &Message, width: u16, spinner_frame: usize) -> Vec<Line<'static>> {
    let width = width as usize;
    if message.is_user() {
        render_user(message, width)
    } else {
        render_assistant(message, width, spinner_frame)
    }
}

fn right_align(mut line: Line<'static>, width: usize) -> Line<'static> {
    let pad = width.saturating_sub(line.width());
    if pad > 0 {
        line.spans.insert(0, Span::raw(" ".repeat(pad)));
    }
    line
}

/// User text is shown verbatim: wrapped, never interpreted as markdown.
fn render_user(message: &Message, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![right_align(
        Line::from(vec![
            Span::styled(message.time_label(), Theme::muted()),
            Span::raw("  "),
            Span::styled(USER_NAME, Theme::primary_bold()),
        ]),
        width,
    )];

    let max_bubble = (width * 3 / 4).max(MIN_BUBBLE_WIDTH).min(width);
    let text_width = max_bubble.saturating_sub(2).max(1);
    let wrapped = textwrap::wrap(&message.content, text_width);
    let bubble_width = wrapped
        .iter()
        .map(|line| textwrap::core::display_width(line))
        .max()
        .unwrap_or(0);

    for line in wrapped {
        let pad = bubble_width.saturating_sub(textwrap::core::display_width(&line));
        let body = format!(" {line}{} ", " ".repeat(pad));
        lines.push(right_align(
            Line::from(Span::styled(body, Theme::user_bubble())),
            width,
        ));
    }

    lines
}

fn render_assistant(message: &Message, width: usize, spinner_frame: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", BoxChars::SPARKLE), Theme::assistant()),
        Span::styled(ASSISTANT_NAME, Theme::title()),
        Span::raw("  "),
        Span::styled(message.time_label(), Theme::muted()),
    ])];

    if message.content.is_empty() && message.in_progress {
        lines.push(typing_dots(spinner_frame));
        return lines;
    }

    let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    let body = MarkdownWidget::new(message.content.as_str())
        .width(body_width)
        .render_or_plain();

    lines.extend(body.into_iter().map(|line| {
        let mut spans = vec![Span::raw(BODY_INDENT)];
        spans.extend(line.spans);
        Line::from(spans)
    }));

    if message.in_progress {
        append_cursor(&mut lines);
    }

    lines
}

/// Three dots with one highlighted, cycling with the spinner.
fn typing_dots(spinner_frame: usize) -> Line<'static> {
    let active = (spinner_frame / 3) % Spinners::TYPING_DOTS;
    let mut spans = vec![Span::raw(BODY_INDENT)];

    for i in 0..Spinners::TYPING_DOTS {
        let style = if i == active {
            Theme::assistant()
        } else {
            Theme::border()
        };
        spans.push(Span::styled(BoxChars::BULLET, style));
        spans.push(Span::raw(" "));
    }

    Line::from(spans)
}

fn append_cursor(lines: &mut [Line<'static>]) {
    if let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(BoxChars::CURSOR, Theme::primary()));
    }
}
