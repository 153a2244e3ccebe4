use std::collections::VecDeque;

const MAX_HISTORY_SIZE: usize = 100;

/// Previously sent prompts, recalled with Up/Down. Whatever was being
/// typed when recall started comes back after stepping past the newest.
#[derive(Debug, Clone, Default)]
pub struct InputHistory {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    draft: Option<String>,
}

impl InputHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            draft: None,
        }
    }

    pub fn push(&mut self, input: String) {
        self.cursor = None;
        self.draft = None;

        if input.trim().is_empty() || self.entries.back() == Some(&input) {
            return;
        }

        if self.entries.len() == MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back(input);
    }

    /// Steps back; `current` is remembered as the draft on the first step.
    pub fn prev(&mut self, current: &str) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let index = match self.cursor {
            None => {
                self.draft = Some(current.to_string());
                self.entries.len() - 1
            }
            Some(i) => i.saturating_sub(1),
        };

        self.cursor = Some(index);
        self.entries.get(index).cloned()
    }

    /// Steps forward; past the newest entry the draft is returned.
    pub fn next(&mut self) -> Option<String> {
        let i = self.cursor?;

        if i + 1 >= self.entries.len() {
            self.cursor = None;
            return Some(self.draft.take().unwrap_or_default());
        }

        self.cursor = Some(i + 1);
        self.entries.get(i + 1).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
