use markdown::mdast::Node;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Plain text of an inline subtree, formatting dropped.
pub fn collect_text_from_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        collect_text(node, &mut out);
    }
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        Node::InlineCode(code) => out.push_str(&code.value),
        Node::Html(html) => out.push_str(&html.value),
        Node::Break(_) => out.push(' '),
        Node::Strong(n) => n.children.iter().for_each(|c| collect_text(c, out)),
        Node::Emphasis(n) => n.children.iter().for_each(|c| collect_text(c, out)),
        Node::Delete(n) => n.children.iter().for_each(|c| collect_text(c, out)),
        Node::Link(n) => n.children.iter().for_each(|c| collect_text(c, out)),
        _ => {}
    }
}

/// Styled spans for an inline subtree; nested emphasis accumulates onto
/// `base`.
pub fn collect_inline_spans(nodes: &[Node], base: Style) -> Vec<Span<'static>> {
    nodes
        .iter()
        .flat_map(|node| render_inline(node, base))
        .collect()
}

fn render_inline(node: &Node, style: Style) -> Vec<Span<'static>> {
    match node {
        Node::Text(text) => vec![Span::styled(text.value.clone(), style)],

        Node::Strong(strong) => {
            collect_inline_spans(&strong.children, style.add_modifier(Modifier::BOLD))
        }

        Node::Emphasis(em) => collect_inline_spans(&em.children, style.add_modifier(Modifier::ITALIC)),

        Node::Delete(del) => {
            collect_inline_spans(&del.children, style.add_modifier(Modifier::CROSSED_OUT))
        }

        Node::InlineCode(code) => vec![Span::styled(code.value.clone(), style.patch(Theme::code()))],

        Node::Link(link) => {
            let link_style = style.patch(Theme::primary()).add_modifier(Modifier::UNDERLINED);
            let mut spans = collect_inline_spans(&link.children, link_style);
            if collect_text_from_nodes(&link.children) != link.url {
                spans.push(Span::styled(format!(" ({})", link.url), Theme::muted()));
            }
            spans
        }

        Node::Break(_) => vec![Span::styled("\n", style)],

        Node::Html(html) => vec![Span::styled(html.value.clone(), style)],

        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown::{ParseOptions, to_mdast};

    fn paragraph_children(src: &str) -> Vec<Node> {
        let root = to_mdast(src, &ParseOptions::gfm()).unwrap();
        match root.children().and_then(|c| c.first()) {
            Some(Node::Paragraph(p)) => p.children.clone(),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_collected() {
        let nodes = paragraph_children("Firebase is **a backend** platform.");
        assert_eq!(collect_text_from_nodes(&nodes), "Firebase is a backend platform.");
    }

    #[test]
    fn test_strong_and_emphasis_styles() {
        let nodes = paragraph_children("**bold** and *italic*");
        let spans = collect_inline_spans(&nodes, Style::default());

        assert_eq!(spans[0].content, "bold");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        let italic = spans.iter().find(|s| s.content == "italic").unwrap();
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_nested_styles_accumulate() {
        let nodes = paragraph_children("***both***");
        let spans = collect_inline_spans(&nodes, Style::default());
        let both = &spans[0];
        assert!(both.style.add_modifier.contains(Modifier::BOLD));
        assert!(both.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_strikethrough_and_code() {
        let nodes = paragraph_children("~~old~~ `new()`");
        let spans = collect_inline_spans(&nodes, Style::default());

        assert!(spans[0].style.add_modifier.contains(Modifier::CROSSED_OUT));
        let code = spans.iter().find(|s| s.content == "new()").unwrap();
        assert_eq!(code.style.fg, Theme::code().fg);
    }

    #[test]
    fn test_link_shows_url_when_text_differs() {
        let nodes = paragraph_children("[docs](https://firebase.google.com)");
        let spans = collect_inline_spans(&nodes, Style::default());
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "docs (https://firebase.google.com)");
    }

    #[test]
    fn test_empty_input() {
        assert!(collect_inline_spans(&[], Style::default()).is_empty());
    }
}
