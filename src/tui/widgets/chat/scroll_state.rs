use std::ops::Range;

/// Viewport over the rendered transcript. Follows the tail until the
/// user scrolls away, and resumes following once they return to it.
#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: usize,
    content_height: usize,
    viewport_height: usize,
    follow: bool,
}

impl ScrollState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: 0,
            follow: true,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.follow
    }

    #[must_use]
    pub const fn has_more_below(&self) -> bool {
        self.offset < self.max_offset()
    }

    /// Records new dimensions, then pins to the tail when following.
    pub const fn sync(&mut self, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        let max = self.max_offset();
        if self.follow || self.offset > max {
            self.offset = max;
        }
    }

    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.viewport_height).min(self.content_height);
        self.offset.min(end)..end
    }

    pub const fn line_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = false;
    }

    pub fn line_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset());
        self.follow = self.offset == self.max_offset();
    }

    pub const fn page_up(&mut self) {
        self.line_up(self.page_size());
    }

    pub fn page_down(&mut self) {
        self.line_down(self.page_size());
    }

    pub const fn top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub const fn bottom(&mut self) {
        self.offset = self.max_offset();
        self.follow = true;
    }

    const fn page_size(&self) -> usize {
        if self.viewport_height > 1 {
            self.viewport_height - 1
        } else {
            1
        }
    }

    const fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
