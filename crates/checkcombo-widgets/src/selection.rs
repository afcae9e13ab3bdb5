//! Popup cursor and scroll state.
//!
//! `SelectionState` tracks which popup row has the cursor and which row is
//! scrolled to the top. Navigation takes a predicate so rows that cannot
//! hold the cursor (separators, disabled entries) are skipped.

/// Tracks cursor position and scroll offset over the popup rows.
#[derive(Debug, Clone)]
pub struct SelectionState {
    cursor: usize,
    offset: usize,
    count: usize,
    visible: usize,
}

impl SelectionState {
    /// Start at the top of `count` rows with a `visible`-row window.
    pub fn new(count: usize, visible: usize) -> Self {
        Self {
            cursor: 0,
            offset: 0,
            count,
            visible,
        }
    }

    /// Row under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    /// First row in the window.
    pub fn offset(&self) -> usize {
        self.offset
    }
    /// Number of rows.
    pub fn count(&self) -> usize {
        self.count
    }
    /// Height of the window in rows.
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Change the number of rows, clamping the cursor and offset.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.count == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.count {
            self.cursor = self.count - 1;
        }
        if self.offset >= self.count {
            self.offset = self.count.saturating_sub(self.visible);
        }
        self.ensure_visible();
    }

    /// Change the window height and pull the cursor back into view.
    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
        self.ensure_visible();
    }

    /// Put the cursor on `index`, clamped to the last row.
    pub fn select(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        self.cursor = index.min(self.count - 1);
        self.ensure_visible();
    }

    /// Move to the next row accepted by `pred`, wrapping past the end.
    ///
    /// Stays put when no other row is accepted.
    pub fn move_down_where(&mut self, pred: impl Fn(usize) -> bool) {
        if self.count == 0 {
            return;
        }
        if let Some(next) = (1..=self.count)
            .map(|step| (self.cursor + step) % self.count)
            .find(|&i| pred(i))
        {
            self.cursor = next;
            self.ensure_visible();
        }
    }

    /// Move to the previous row accepted by `pred`, wrapping past the start.
    pub fn move_up_where(&mut self, pred: impl Fn(usize) -> bool) {
        if self.count == 0 {
            return;
        }
        if let Some(prev) = (1..=self.count)
            .map(|step| (self.cursor + self.count - step) % self.count)
            .find(|&i| pred(i))
        {
            self.cursor = prev;
            self.ensure_visible();
        }
    }

    /// Jump to the first accepted row.
    pub fn first_where(&mut self, pred: impl Fn(usize) -> bool) {
        if let Some(i) = (0..self.count).find(|&i| pred(i)) {
            self.cursor = i;
            self.ensure_visible();
        }
    }

    /// Jump to the last accepted row.
    pub fn last_where(&mut self, pred: impl Fn(usize) -> bool) {
        if let Some(i) = (0..self.count).rev().find(|&i| pred(i)) {
            self.cursor = i;
            self.ensure_visible();
        }
    }

    /// Move one page down without wrapping, landing on the nearest accepted
    /// row at or before the target.
    pub fn page_down_where(&mut self, pred: impl Fn(usize) -> bool) {
        if self.count == 0 {
            return;
        }
        let target = self
            .cursor
            .saturating_add(self.visible.max(1))
            .min(self.count - 1);
        if let Some(i) = (self.cursor..=target).rev().find(|&i| pred(i)) {
            self.cursor = i;
            self.ensure_visible();
        }
    }

    /// Move one page up without wrapping, landing on the nearest accepted
    /// row at or after the target.
    pub fn page_up_where(&mut self, pred: impl Fn(usize) -> bool) {
        if self.count == 0 {
            return;
        }
        let target = self.cursor.saturating_sub(self.visible.max(1));
        if let Some(i) = (target..=self.cursor).find(|&i| pred(i)) {
            self.cursor = i;
            self.ensure_visible();
        }
    }

    /// Move the window to start at `offset`, clamped so it never runs past
    /// the last row. The cursor is pulled into the window if it left it.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
        self.ensure_visible();
    }

    /// Scroll the window by `delta` rows without wrapping.
    ///
    /// When the cursor falls out of the window it moves to the nearest row
    /// inside it, preferring rows accepted by `pred`.
    pub fn scroll_where(&mut self, delta: isize, pred: impl Fn(usize) -> bool) {
        if self.count == 0 || self.visible == 0 {
            return;
        }
        self.offset = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
        let end = self.offset + self.visible.min(self.count - self.offset);
        if self.cursor < self.offset {
            self.cursor = (self.offset..end).find(|&i| pred(i)).unwrap_or(self.offset);
        } else if self.cursor >= end {
            self.cursor = (self.offset..end).rev().find(|&i| pred(i)).unwrap_or(end - 1);
        }
    }

    fn max_offset(&self) -> usize {
        self.count.saturating_sub(self.visible.max(1))
    }

    fn ensure_visible(&mut self) {
        if self.count == 0 || self.visible == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset.saturating_add(self.visible) {
            self.offset = self.cursor + 1 - self.visible;
        }
    }
}
