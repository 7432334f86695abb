use ratatui::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::textarea::display_width;

/// Fallback dialog size when the terminal reports no usable area
const FALLBACK_DIALOG: (u16, u16) = (60, 16);

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// The editor dialog covers two thirds of the terminal in each direction.
pub(super) fn dialog_rect(area: Rect) -> Rect {
    let (w, h) = if area.width < 3 || area.height < 3 {
        FALLBACK_DIALOG
    } else {
        (area.width * 2 / 3, area.height * 2 / 3)
    };
    centered_rect_fixed(w.max(20), h.max(6), area)
}

/// The part of `line` between display columns `start` and `start + width`.
/// Tabs become spaces; a wide character cut by either edge becomes spaces.
pub(super) fn visible_slice(line: &str, start: usize, width: usize) -> String {
    let end = start + width;
    let mut out = String::new();
    let mut col = 0;
    for g in line.graphemes(true) {
        let w = display_width(g);
        let next = col + w;
        if next <= start {
            col = next;
            continue;
        }
        if col >= end {
            break;
        }
        if g == "\t" || col < start || next > end {
            let shown = next.min(end) - col.max(start);
            out.extend(std::iter::repeat_n(' ', shown));
        } else {
            out.push_str(g);
        }
        col = next;
    }
    out
}

/// Greedy word wrap on whitespace; words longer than `width` are split.
pub(super) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0;
        for word in paragraph.split_whitespace() {
            let word_w = display_width(word);
            if current_w > 0 && current_w + 1 + word_w <= width {
                current.push(' ');
                current.push_str(word);
                current_w += 1 + word_w;
                continue;
            }
            if current_w > 0 {
                lines.push(std::mem::take(&mut current));
                current_w = 0;
            }
            for g in word.graphemes(true) {
                let w = display_width(g);
                if current_w + w > width && current_w > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0;
                }
                current.push_str(g);
                current_w += w;
            }
        }
        lines.push(current);
    }
    lines
}
