/// Minimal single-line input editor backing each form field.
#[derive(Debug, Default, Clone)]
pub struct LineEdit {
    pub value: String,
    pub cursor: usize,
}

impl LineEdit {
    pub fn new(s: impl Into<String>) -> Self {
        let value = s.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn set(&mut self, s: impl Into<String>) {
        self.value = s.into();
        self.cursor = self.value.len();
    }

    pub fn push(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.value.remove(idx);
            self.cursor = idx;
        }
    }

    pub fn left(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_inserts_at_cursor() {
        let mut e = LineEdit::new("ab");
        e.left();
        e.push('x');
        assert_eq!(e.value, "axb");
        assert_eq!(e.cursor, 2);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut e = LineEdit::new("abc");
        e.backspace();
        assert_eq!(e.value, "ab");
        e.left();
        e.backspace();
        assert_eq!(e.value, "b");
    }

    #[test]
    fn cursor_stays_on_char_boundaries() {
        let mut e = LineEdit::new("café");
        e.left();
        e.left();
        e.push('f');
        assert_eq!(e.value, "caffé");
        e.right();
        e.right();
        assert_eq!(e.cursor, e.value.len());
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(LineEdit::new("   ").is_blank());
        assert!(!LineEdit::new(" x ").is_blank());
    }
}
