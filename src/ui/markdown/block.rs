use markdown::mdast::{Code, Heading, List, ListItem, Node, Paragraph, Table};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::{BoxChars, Theme};

use super::context::RenderContext;
use super::inline::{collect_inline_spans, collect_text_from_nodes};
use super::wrap::wrap_spans;

pub fn render_node(node: &Node, ctx: RenderContext) -> Vec<Line<'static>> {
    match node {
        Node::Root(root) => render_children(&root.children, ctx),

        Node::Heading(heading) => with_trailing_blank(render_heading(heading, ctx)),

        Node::Paragraph(para) => with_trailing_blank(render_paragraph(para, ctx)),

        Node::List(list) => with_trailing_blank(render_list(list, ctx)),

        Node::Code(code) => with_trailing_blank(render_code_block(code, ctx)),

        Node::Table(table) => with_trailing_blank(render_table(table, ctx)),

        Node::ThematicBreak(_) => with_trailing_blank(vec![render_rule(ctx)]),

        Node::Blockquote(quote) => render_children(&quote.children, ctx.quoted()),

        Node::Html(html) => with_trailing_blank(prefixed_wrap(
            vec![Span::styled(html.value.clone(), Theme::muted())],
            ctx,
        )),

        _ => Vec::new(),
    }
}

fn render_children(children: &[Node], ctx: RenderContext) -> Vec<Line<'static>> {
    children
        .iter()
        .flat_map(|child| render_node(child, ctx))
        .collect()
}

fn with_trailing_blank(mut lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    lines.push(Line::default());
    lines
}

fn with_prefix(ctx: RenderContext, line: Line<'static>) -> Line<'static> {
    let mut spans = ctx.prefix();
    spans.extend(line.spans);
    Line::from(spans)
}

fn prefixed_wrap(spans: Vec<Span<'static>>, ctx: RenderContext) -> Vec<Line<'static>> {
    wrap_spans(spans, ctx.available_width())
        .into_iter()
        .map(|line| with_prefix(ctx, line))
        .collect()
}

const fn heading_style(depth: u8) -> Style {
    match depth {
        1 => Theme::primary_bold().add_modifier(Modifier::UNDERLINED),
        2 => Theme::primary_bold(),
        _ => Theme::title(),
    }
}

fn render_heading(heading: &Heading, ctx: RenderContext) -> Vec<Line<'static>> {
    let spans = collect_inline_spans(&heading.children, heading_style(heading.depth));
    prefixed_wrap(spans, ctx)
}

fn render_paragraph(para: &Paragraph, ctx: RenderContext) -> Vec<Line<'static>> {
    let spans = collect_inline_spans(&para.children, Style::default());
    prefixed_wrap(spans, ctx)
}

fn render_list(list: &List, ctx: RenderContext) -> Vec<Line<'static>> {
    let start = list.start.unwrap_or(1);

    list.children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| match child {
            Node::ListItem(item) => {
                let marker = if list.ordered {
                    let number = u64::from(start) + i as u64;
                    format!("{number}. ")
                } else {
                    format!("{} ", BoxChars::DOT)
                };
                Some(render_list_item(item, &marker, ctx))
            }
            _ => None,
        })
        .flatten()
        .collect()
}

fn render_list_item(item: &ListItem, marker: &str, ctx: RenderContext) -> Vec<Line<'static>> {
    let marker = match item.checked {
        Some(true) => "☑ ".to_string(),
        Some(false) => "☐ ".to_string(),
        None => marker.to_string(),
    };
    let marker_width = marker.width();
    let continuation = " ".repeat(marker_width);
    let text_width = ctx.available_width().saturating_sub(marker_width).max(1);

    let mut lines: Vec<Line<'static>> = Vec::new();

    for child in &item.children {
        match child {
            Node::Paragraph(para) => {
                let spans = collect_inline_spans(&para.children, Style::default());
                for line in wrap_spans(spans, text_width) {
                    let lead = if lines.is_empty() {
                        Span::styled(marker.clone(), Theme::primary())
                    } else {
                        Span::raw(continuation.clone())
                    };
                    let mut spans = ctx.prefix();
                    spans.push(lead);
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
            Node::List(nested) => lines.extend(render_list(nested, ctx.nested())),
            other => lines.extend(render_node(other, ctx.nested())),
        }
    }

    if lines.is_empty() {
        let mut spans = ctx.prefix();
        spans.push(Span::styled(marker, Theme::primary()));
        lines.push(Line::from(spans));
    }

    lines
}

fn render_code_block(code: &Code, ctx: RenderContext) -> Vec<Line<'static>> {
    let lang = code.lang.as_deref().unwrap_or("code");

    let mut lines = Vec::with_capacity(code.value.lines().count() + 2);

    lines.push(with_prefix(
        ctx,
        Line::from(Span::styled(
            format!("{} {lang}", BoxChars::ROUND_TOP_LEFT),
            Theme::border(),
        )),
    ));

    for line in code.value.lines() {
        lines.push(with_prefix(
            ctx,
            Line::from(vec![
                Span::styled(format!("{} ", BoxChars::VERTICAL), Theme::border()),
                Span::styled(line.to_string(), Theme::code()),
            ]),
        ));
    }

    lines.push(with_prefix(
        ctx,
        Line::from(Span::styled(
            BoxChars::ROUND_BOTTOM_LEFT.to_string(),
            Theme::border(),
        )),
    ));

    lines
}

fn render_rule(ctx: RenderContext) -> Line<'static> {
    let width = ctx.available_width().min(40);
    with_prefix(
        ctx,
        Line::from(Span::styled(BoxChars::HORIZONTAL.repeat(width), Theme::border())),
    )
}

fn table_rows(table: &Table) -> Vec<Vec<String>> {
    table
        .children
        .iter()
        .filter_map(|row| match row {
            Node::TableRow(row) => Some(
                row.children
                    .iter()
                    .map(|cell| match cell {
                        Node::TableCell(cell) => collect_text_from_nodes(&cell.children),
                        _ => String::new(),
                    })
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

/// Columns are padded to their widest cell; tables wider than the
/// viewport degrade to one unpadded line per row.
fn render_table(table: &Table, ctx: RenderContext) -> Vec<Line<'static>> {
    let rows = table_rows(table);
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let separator = format!(" {} ", BoxChars::VERTICAL);
    let total = widths.iter().sum::<usize>() + separator.width() * (columns - 1);
    let fits = total <= ctx.available_width();

    let mut lines = Vec::with_capacity(rows.len() + 1);

    for (row_index, row) in rows.iter().enumerate() {
        let style = if row_index == 0 {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans = Vec::with_capacity(columns * 2);
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(separator.clone(), Theme::border()));
            }
            let text = if fits {
                format!("{cell}{}", " ".repeat(widths[i].saturating_sub(cell.width())))
            } else {
                cell.clone()
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(with_prefix(ctx, Line::from(spans)));

        if row_index == 0 && fits {
            let rule = widths
                .iter()
                .map(|w| BoxChars::HORIZONTAL.repeat(*w))
                .collect::<Vec<_>>()
                .join(&format!("{0}┼{0}", BoxChars::HORIZONTAL));
            lines.push(with_prefix(ctx, Line::from(Span::styled(rule, Theme::border()))));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown::{ParseOptions, to_mdast};

    fn render(src: &str, width: usize) -> Vec<String> {
        let root = to_mdast(src, &ParseOptions::gfm()).unwrap();
        render_node(&root, RenderContext::new(Some(width)))
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_paragraph_wraps_and_ends_with_blank() {
        let lines = render("Firebase is a backend platform.", 12);
        assert_eq!(lines, vec!["Firebase is", "a backend", "platform.", ""]);
    }

    #[test]
    fn test_ordered_list_numbers_from_start() {
        let lines = render("3. three\n4. four\n", 40);
        assert_eq!(lines[0], "3. three");
        assert_eq!(lines[1], "4. four");
    }

    #[test]
    fn test_bullet_continuation_is_aligned() {
        let lines = render("- alpha beta gamma\n", 10);
        assert_eq!(lines[0], "• alpha");
        assert_eq!(lines[1], "  beta");
        assert_eq!(lines[2], "  gamma");
    }

    #[test]
    fn test_nested_list_indented() {
        let lines = render("- outer\n  - inner\n", 40);
        assert_eq!(lines[0], "• outer");
        assert_eq!(lines[1], "  • inner");
    }

    #[test]
    fn test_task_list_markers() {
        let lines = render("- [x] done\n- [ ] todo\n", 40);
        assert_eq!(lines[0], "☑ done");
        assert_eq!(lines[1], "☐ todo");
    }

    #[test]
    fn test_blockquote_prefixed() {
        let lines = render("> quoted text", 40);
        assert_eq!(lines[0], "│ quoted text");
    }

    #[test]
    fn test_code_block_framed() {
        let lines = render("```kotlin\nval x = 1\n```", 40);
        assert_eq!(lines[0], "╭ kotlin");
        assert_eq!(lines[1], "│ val x = 1");
        assert_eq!(lines[2], "╰");
    }

    #[test]
    fn test_table_columns_padded() {
        let lines = render("| a | bb |\n|---|---|\n| ccc | d |\n", 40);
        assert_eq!(lines[0], "a   │ bb");
        assert_eq!(lines[1], "────┼───");
        assert_eq!(lines[2], "ccc │ d ");
    }

    #[test]
    fn test_table_pads_by_display_width() {
        let lines = render("| 名前 | x |\n|---|---|\n| ab | y |\n", 40);
        assert_eq!(lines[0], "名前 │ x");
        assert_eq!(lines[2], "ab   │ y");
        assert_eq!(lines[0].width(), lines[2].width());
    }

    #[test]
    fn test_heading_styled() {
        let root = to_mdast("## Setup", &ParseOptions::gfm()).unwrap();
        let lines = render_node(&root, RenderContext::new(Some(40)));
        assert_eq!(lines[0].spans[0].content, "Setup");
        assert_eq!(lines[0].spans[0].style.fg, Theme::primary().fg);
    }
}
