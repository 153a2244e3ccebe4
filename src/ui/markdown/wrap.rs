use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

enum Token {
    Word(Span<'static>),
    Space(Span<'static>),
    Newline,
}

fn tokenize(spans: Vec<Span<'static>>) -> Vec<Token> {
    let mut tokens = Vec::new();

    for span in spans {
        let style = span.style;
        let mut word = String::new();
        let mut space = String::new();

        let flush_word = |word: &mut String, tokens: &mut Vec<Token>| {
            if !word.is_empty() {
                tokens.push(Token::Word(Span::styled(std::mem::take(word), style)));
            }
        };
        let flush_space = |space: &mut String, tokens: &mut Vec<Token>| {
            if !space.is_empty() {
                tokens.push(Token::Space(Span::styled(std::mem::take(space), style)));
            }
        };

        for ch in span.content.chars() {
            if ch == '\n' {
                flush_word(&mut word, &mut tokens);
                space.clear();
                tokens.push(Token::Newline);
            } else if ch.is_whitespace() {
                flush_word(&mut word, &mut tokens);
                space.push(' ');
            } else {
                flush_space(&mut space, &mut tokens);
                word.push(ch);
            }
        }
        flush_word(&mut word, &mut tokens);
        flush_space(&mut space, &mut tokens);
    }

    tokens
}

/// Splits a word wider than `width` into pieces that each fit.
fn split_word(word: &Span<'static>, width: usize) -> Vec<Span<'static>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in word.content.chars() {
        let w = ch.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            pieces.push(Span::styled(std::mem::take(&mut current), word.style));
            current_width = 0;
        }
        current.push(ch);
        current_width += w;
    }
    if !current.is_empty() {
        pieces.push(Span::styled(current, word.style));
    }

    pieces
}

/// Wraps styled spans to `width` display columns at whitespace, keeping
/// each span's style. Embedded newlines force a break.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;
    let mut pending_space: Option<Span<'static>> = None;

    for token in tokenize(spans) {
        match token {
            Token::Newline => {
                lines.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
                pending_space = None;
            }
            Token::Space(span) => {
                if current_width > 0 {
                    pending_space = Some(span);
                }
            }
            Token::Word(word) => {
                let pieces = if word.content.width() > width {
                    split_word(&word, width)
                } else {
                    vec![word]
                };

                for piece in pieces {
                    let piece_width = piece.content.width();
                    let space_width = pending_space.as_ref().map_or(0, |s| s.content.width());

                    if current_width > 0 && current_width + space_width + piece_width > width {
                        lines.push(Line::from(std::mem::take(&mut current)));
                        current_width = 0;
                        pending_space = None;
                    }

                    if let Some(space) = pending_space.take() {
                        current_width += space.content.width();
                        current.push(space);
                    }
                    current_width += piece_width;
                    current.push(piece);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }

    lines
}
