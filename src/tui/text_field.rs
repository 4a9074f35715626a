use std::cmp::min;

/// Editable text buffer backing the topic and essay inputs.
#[derive(Debug, Clone)]
pub struct TextField {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    /// First visible wrapped row, or first visible column for a single-line field.
    offset: usize,
    multiline: bool,
}

/// The slice of a field that fits its box, with the cursor relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub rows: Vec<String>,
    pub cursor: (usize, usize),
}

impl TextField {
    pub fn single_line() -> Self {
        Self::empty(false)
    }

    pub fn multi_line() -> Self {
        Self::empty(true)
    }

    fn empty(multiline: bool) -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            offset: 0,
            multiline,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the content and parks the cursor at the end of it.
    pub fn set_text(&mut self, text: &str) {
        self.lines = if self.multiline {
            text.split('\n').map(str::to_string).collect()
        } else {
            vec![text.replace('\n', " ")]
        };
        self.cursor_row = self.lines.len().saturating_sub(1);
        self.cursor_col = self.line_len(self.cursor_row);
        self.offset = 0;
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.offset = 0;
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Lays the field out in a `width` x `height` box and scrolls so the cursor stays
    /// inside it. Multi-line text wraps at spaces; a single line scrolls sideways.
    pub fn viewport(&mut self, width: usize, height: usize) -> Viewport {
        let width = width.max(1);
        let height = height.max(1);
        if self.multiline {
            self.wrapped_viewport(width, height)
        } else {
            self.sliding_viewport(width)
        }
    }

    fn wrapped_viewport(&mut self, width: usize, height: usize) -> Viewport {
        let mut rows = Vec::new();
        let mut cursor = (0, 0);
        for (row, line) in self.lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            let ranges = wrap_ranges(&chars, width);
            if row == self.cursor_row {
                let idx = ranges
                    .iter()
                    .rposition(|(start, _)| *start <= self.cursor_col)
                    .unwrap_or(0);
                cursor = (rows.len() + idx, self.cursor_col - ranges[idx].0);
            }
            rows.extend(
                ranges
                    .iter()
                    .map(|&(start, end)| chars[start..end].iter().collect::<String>()),
            );
        }

        if cursor.0 < self.offset {
            self.offset = cursor.0;
        } else if cursor.0 >= self.offset + height {
            self.offset = cursor.0 + 1 - height;
        }
        self.offset = self.offset.min(rows.len().saturating_sub(1));

        Viewport {
            rows: rows.into_iter().skip(self.offset).take(height).collect(),
            cursor: (cursor.0 - self.offset, cursor.1),
        }
    }

    fn sliding_viewport(&mut self, width: usize) -> Viewport {
        if self.cursor_col < self.offset {
            self.offset = self.cursor_col;
        } else if self.cursor_col >= self.offset + width {
            self.offset = self.cursor_col + 1 - width;
        }
        let row = self.lines[0].chars().skip(self.offset).take(width).collect();
        Viewport {
            rows: vec![row],
            cursor: (0, self.cursor_col - self.offset),
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let column = self.cursor_col;
        let line = self.current_line_mut();
        let idx = Self::char_to_byte_index(line, column);
        line.insert(idx, ch);
        self.cursor_col += 1;
    }

    /// Returns false when the field is single-line and the newline was refused.
    pub fn insert_newline(&mut self) -> bool {
        if !self.multiline {
            return false;
        }
        let column = self.cursor_col;
        let line = self.current_line_mut();
        let idx = Self::char_to_byte_index(line, column);
        let remainder = line.split_off(idx);
        self.lines.insert(self.cursor_row + 1, remainder);
        self.cursor_row += 1;
        self.cursor_col = 0;
        true
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let column = self.cursor_col;
            let line = self.current_line_mut();
            let end = Self::char_to_byte_index(line, column);
            let start = Self::char_to_byte_index(line, column - 1);
            line.drain(start..end);
            self.cursor_col -= 1;
            return;
        }

        if self.cursor_row == 0 {
            return;
        }

        let current_line = self.lines.remove(self.cursor_row);
        self.cursor_row -= 1;
        self.cursor_col = self.line_len(self.cursor_row);
        self.current_line_mut().push_str(&current_line);
    }

    pub fn delete(&mut self) {
        let line_len = self.line_len(self.cursor_row);
        if self.cursor_col < line_len {
            let column = self.cursor_col;
            let line = self.current_line_mut();
            let start = Self::char_to_byte_index(line, column);
            let end = Self::char_to_byte_index(line, column + 1);
            line.drain(start..end);
            return;
        }

        if self.cursor_row + 1 >= self.lines.len() {
            return;
        }

        let next_line = self.lines.remove(self.cursor_row + 1);
        self.current_line_mut().push_str(&next_line);
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_len(self.cursor_row);
        }
    }

    pub fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor_row);
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row == 0 {
            return;
        }
        self.cursor_row -= 1;
        self.cursor_col = min(self.cursor_col, self.line_len(self.cursor_row));
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 >= self.lines.len() {
            return;
        }
        self.cursor_row += 1;
        self.cursor_col = min(self.cursor_col, self.line_len(self.cursor_row));
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_row);
    }

    fn current_line_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        &mut self.lines[self.cursor_row]
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines
            .get(row)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    fn char_to_byte_index(line: &str, column: usize) -> usize {
        line.char_indices()
            .nth(column)
            .map(|(idx, _)| idx)
            .unwrap_or_else(|| line.len())
    }
}

/// Char ranges of the wrapped rows of one line. Rows break after the last space
/// that fits and fall back to a hard break inside long words. A line that exactly
/// fills its last row gets an empty row after it so the cursor has a place to sit.
fn wrap_ranges(line: &[char], width: usize) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while line.len() - start > width {
        let limit = start + width;
        let end = line[start..limit]
            .iter()
            .rposition(|ch| *ch == ' ')
            .map(|idx| start + idx + 1)
            .unwrap_or(limit);
        ranges.push((start, end));
        start = end;
    }
    ranges.push((start, line.len()));
    if line.len() - start == width {
        ranges.push((line.len(), line.len()));
    }
    ranges
}
