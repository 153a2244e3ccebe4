use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct LayoutAreas {
    pub header: Rect,
    pub chat: Rect,
    pub notice: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Header, transcript, optional notice band, composer, status line.
/// `notice_height` of zero collapses the band.
#[must_use]
pub fn calculate_layout(area: Rect, notice_height: u16) -> LayoutAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(notice_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    LayoutAreas {
        header: chunks[0],
        chat: chunks[1],
        notice: chunks[2],
        input: chunks[3],
        status: chunks[4],
    }
}
