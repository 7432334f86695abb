use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells a tab occupies when drawn
pub const TAB_WIDTH: usize = 4;

/// Multi-line text buffer with a cursor, backing the annotation editor.
///
/// The cursor is a (line, byte offset) pair that always sits on a grapheme
/// boundary. Lines are soft-wrapped at word boundaries once a wrap width is
/// set; vertical moves then step through display rows and remember the
/// display column they started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
    sticky_col: Option<usize>,
    /// Wrap width in cells, 0 for no wrapping
    wrap_width: usize,
    /// First visible display row
    pub scroll_row: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        TextArea::new("")
    }
}

impl TextArea {
    /// Buffer holding `text`, cursor at the start.
    pub fn new(text: &str) -> Self {
        TextArea {
            lines: text.split('\n').map(str::to_string).collect(),
            row: 0,
            col: 0,
            sticky_col: None,
            wrap_width: 0,
            scroll_row: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (line index, byte offset within the line)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn set_wrap_width(&mut self, width: usize) {
        if width != self.wrap_width {
            self.wrap_width = width;
            self.sticky_col = None;
        }
    }

    /// Display rows as (line index, byte range within that line)
    pub fn display_rows(&self) -> Vec<(usize, Range<usize>)> {
        let mut rows = Vec::new();
        for (idx, line) in self.lines.iter().enumerate() {
            let starts = wrap_starts(line, self.wrap_width);
            for (k, &start) in starts.iter().enumerate() {
                let end = starts.get(k + 1).copied().unwrap_or(line.len());
                rows.push((idx, start..end));
            }
        }
        rows
    }

    /// Cursor as (display row, display column within that row)
    pub fn cursor_display_pos(&self) -> (usize, usize) {
        let above: usize = self.lines[..self.row]
            .iter()
            .map(|l| wrap_starts(l, self.wrap_width).len())
            .sum();
        let starts = wrap_starts(self.line(), self.wrap_width);
        let k = starts.partition_point(|&s| s <= self.col) - 1;
        (above + k, display_width(&self.line()[starts[k]..self.col]))
    }

    fn line(&self) -> &str {
        &self.lines[self.row]
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        self.lines[self.row].insert(self.col, c);
        self.col += c.len_utf8();
        self.sticky_col = None;
    }

    pub fn insert_newline(&mut self) {
        let rest = self.lines[self.row].split_off(self.col);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
        self.sticky_col = None;
    }

    /// Insert text that may span several lines (paste).
    pub fn insert_str(&mut self, s: &str) {
        let s = s.replace("\r\n", "\n");
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline();
            }
            self.lines[self.row].insert_str(self.col, part);
            self.col += part.len();
        }
        self.sticky_col = None;
    }

    /// Delete the grapheme before the cursor, joining lines at a line
    /// start. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        self.sticky_col = None;
        if let Some(prev) = prev_boundary(self.line(), self.col) {
            self.lines[self.row].replace_range(prev..self.col, "");
            self.col = prev;
            return true;
        }
        if self.row == 0 {
            return false;
        }
        let line = self.lines.remove(self.row);
        self.row -= 1;
        self.col = self.lines[self.row].len();
        self.lines[self.row].push_str(&line);
        true
    }

    /// Delete the grapheme under the cursor, joining the next line at a
    /// line end. Returns whether anything changed.
    pub fn delete(&mut self) -> bool {
        self.sticky_col = None;
        if let Some(next) = next_boundary(self.line(), self.col) {
            self.lines[self.row].replace_range(self.col..next, "");
            return true;
        }
        if self.row + 1 >= self.lines.len() {
            return false;
        }
        let next_line = self.lines.remove(self.row + 1);
        self.lines[self.row].push_str(&next_line);
        true
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    pub fn move_left(&mut self) {
        self.sticky_col = None;
        if let Some(prev) = prev_boundary(self.line(), self.col) {
            self.col = prev;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line().len();
        }
    }

    pub fn move_right(&mut self) {
        self.sticky_col = None;
        if let Some(next) = next_boundary(self.line(), self.col) {
            self.col = next;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_word_left(&mut self) {
        self.sticky_col = None;
        if self.col == 0 {
            self.move_left();
            return;
        }
        self.col = word_left(self.line(), self.col);
    }

    pub fn move_word_right(&mut self) {
        self.sticky_col = None;
        if self.col >= self.line().len() {
            self.move_right();
            return;
        }
        self.col = word_right(self.line(), self.col);
    }

    /// Move up (negative) or down (positive) by `delta` display rows,
    /// keeping the display column where possible.
    pub fn move_vertical(&mut self, delta: isize) {
        let (current, display_col) = self.cursor_display_pos();
        let target_col = *self.sticky_col.get_or_insert(display_col);
        let rows = self.display_rows();
        let target = current.saturating_add_signed(delta).min(rows.len() - 1);
        if target == current {
            return;
        }
        let (row, range) = rows[target].clone();
        let line = &self.lines[row];
        let mut col = range.start + col_to_byte(&line[range.clone()], target_col);
        // The end of a wrapped row is the start of the next one
        if col == range.end && range.end < line.len() {
            col = prev_boundary(line, col).unwrap_or(range.start);
        }
        self.row = row;
        self.col = col;
    }

    pub fn move_home(&mut self) {
        self.sticky_col = None;
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.sticky_col = None;
        self.col = self.line().len();
    }

    pub fn move_top(&mut self) {
        self.sticky_col = None;
        self.row = 0;
        self.col = 0;
    }

    pub fn move_bottom(&mut self) {
        self.sticky_col = None;
        self.row = self.lines.len() - 1;
        self.col = self.line().len();
    }

    /// Adjust the scroll offset so the cursor is inside a viewport of
    /// `height` display rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        let (row, _) = self.cursor_display_pos();
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + height {
            self.scroll_row = row + 1 - height;
        }
    }
}

/// Display width in terminal cells, tabs counted as [`TAB_WIDTH`].
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        TAB_WIDTH
    } else {
        UnicodeWidthStr::width(g)
    }
}

/// Byte offsets where the display rows of `line` start when it is wrapped
/// to `width` cells. Breaks fall after whitespace, which may hang past the
/// edge; a word wider than a row is split.
fn wrap_starts(line: &str, width: usize) -> Vec<usize> {
    let mut starts = vec![0];
    if width == 0 {
        return starts;
    }
    let mut col = 0;
    let mut break_at: Option<(usize, usize)> = None;
    for (i, g) in line.grapheme_indices(true) {
        let w = grapheme_width(g);
        if is_space(g) {
            col += w;
            break_at = Some((i + g.len(), col));
            continue;
        }
        if col + w > width && col > 0 {
            if let Some((at, at_col)) = break_at.take() {
                starts.push(at);
                col -= at_col;
            }
            if col + w > width && col > 0 {
                starts.push(i);
                col = 0;
            }
        }
        col += w;
    }
    starts
}

fn next_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    s[offset..]
        .graphemes(true)
        .next()
        .map(|g| offset + g.len())
}

fn prev_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Byte offset of the grapheme at display column `target`, snapping left
/// inside wide characters.
fn col_to_byte(s: &str, target: usize) -> usize {
    let mut col = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if col + w > target {
            return i;
        }
        col += w;
    }
    s.len()
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

fn word_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

fn word_right(s: &str, offset: usize) -> usize {
    let mut graphemes = s[offset..].grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_space(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| offset + i)
}
