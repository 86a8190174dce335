/// State for the input composer
///
/// `cursor` counts characters, not bytes, so CJK input edits cleanly.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current input buffer
    pub buffer: String,
    /// Cursor position in characters
    pub cursor: usize,
    /// Characters beyond this count are refused
    pub max_chars: usize,
}

impl InputState {
    pub fn new(max_chars: usize) -> Self {
        Self { buffer: String::new(), cursor: 0, max_chars }
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.char_count() >= self.max_chars
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer.char_indices().nth(char_index).map(|(i, _)| i).unwrap_or(self.buffer.len())
    }

    /// Insert at the cursor; returns `false` when the composer is full.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.is_full() {
            return false;
        }
        let idx = self.byte_index(self.cursor);
        self.buffer.insert(idx, c);
        self.cursor += 1;
        true
    }

    /// Insert pasted text, dropping whatever does not fit.
    pub fn insert_str(&mut self, text: &str) -> usize {
        let room = self.max_chars.saturating_sub(self.char_count());
        let accepted: String = text.chars().filter(|c| !c.is_control() || *c == '\n').take(room).collect();
        let count = accepted.chars().count();

        let idx = self.byte_index(self.cursor);
        self.buffer.insert_str(idx, &accepted);
        self.cursor += count;
        count
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.buffer.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let idx = self.byte_index(self.cursor);
            self.buffer.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Keep the cursor inside the buffer after it was changed from outside.
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.char_count());
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(200)
    }
}
