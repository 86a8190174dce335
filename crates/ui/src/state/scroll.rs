/// Transcript scroll position, measured in lines up from the newest line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
}

impl ScrollState {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset == 0
    }

    pub fn to_bottom(&mut self) {
        self.offset = 0;
    }

    pub fn page_up(&mut self, page: usize) {
        self.offset = self.offset.saturating_add(page.max(1));
    }

    pub fn page_down(&mut self, page: usize) {
        self.offset = self.offset.saturating_sub(page.max(1));
    }

    /// First visible line for `total` lines in a viewport of `height`.
    ///
    /// Clamps the offset so scrolling past the top is undone on the next draw.
    pub fn top_line(&mut self, total: usize, height: usize) -> usize {
        let max_offset = total.saturating_sub(height);
        self.offset = self.offset.min(max_offset);
        max_offset - self.offset
    }
}
