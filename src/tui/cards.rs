/// Card list viewport state.
///
/// Positions are counted in cards. `visible_rows` is refreshed by the draw
/// pass with the number of cards that fit on screen.
pub struct CardListState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for CardListState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 3,
        }
    }
}

impl CardListState {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.max(1);
        let i = match self.selected {
            Some(i) => (i + jump).min(total - 1),
            None => jump.min(total - 1),
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.max(1);
        let i = match self.selected {
            Some(i) => i.saturating_sub(jump),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Scroll without moving the selection off screen
    pub fn scroll_down(&mut self, total: usize) {
        if self.scroll_offset + self.visible_rows < total {
            self.scroll_offset += 1;
        }
        if let Some(i) = self.selected {
            if i < self.scroll_offset {
                self.selected = Some(self.scroll_offset);
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        if let Some(i) = self.selected {
            let last = self.scroll_offset + self.visible_rows.max(1) - 1;
            if i > last {
                self.selected = Some(last);
            }
        }
    }

    /// Back to the top, selecting the first card if there is one
    pub fn reset(&mut self, total: usize) {
        self.scroll_offset = 0;
        self.selected = if total == 0 { None } else { Some(0) };
    }

    /// Keep selection and offset inside a list of `total` cards
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.selected = None;
            self.scroll_offset = 0;
            return;
        }
        self.selected = Some(self.selected.unwrap_or(0).min(total - 1));
        self.scroll_offset = self.scroll_offset.min(total - 1);
    }

    /// Scroll position plus viewport height has reached the end of the list
    pub fn is_at_bottom(&self, total: usize) -> bool {
        self.scroll_offset + self.visible_rows >= total
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(visible_rows: usize) -> CardListState {
        CardListState {
            visible_rows,
            ..Default::default()
        }
    }

    #[test]
    fn selection_scrolls_viewport() {
        let mut cards = list(3);
        for _ in 0..5 {
            cards.select_next(10);
        }
        assert_eq!(cards.selected, Some(4));
        assert_eq!(cards.scroll_offset, 2);
        cards.select_first();
        assert_eq!(cards.scroll_offset, 0);
    }

    #[test]
    fn bottom_detection() {
        let mut cards = list(3);
        assert!(!cards.is_at_bottom(10));
        cards.select_last(10);
        assert_eq!(cards.scroll_offset, 7);
        assert!(cards.is_at_bottom(10));
        // Fewer cards than the viewport holds
        assert!(list(5).is_at_bottom(2));
    }

    #[test]
    fn wheel_scroll_drags_selection() {
        let mut cards = list(2);
        cards.reset(5);
        cards.scroll_down(5);
        assert_eq!(cards.scroll_offset, 1);
        assert_eq!(cards.selected, Some(1));
        for _ in 0..10 {
            cards.scroll_down(5);
        }
        assert_eq!(cards.scroll_offset, 3);

        cards.select_last(5);
        cards.scroll_up();
        assert_eq!(cards.selected, Some(3));
    }

    #[test]
    fn clamp_after_list_shrinks() {
        let mut cards = list(3);
        cards.select_last(20);
        cards.clamp(4);
        assert_eq!(cards.selected, Some(3));
        assert_eq!(cards.scroll_offset, 3);
        cards.clamp(0);
        assert_eq!(cards.selected, None);
    }
}
