use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::strip_mnemonic;
use crate::tui::app::EditorView;
use crate::tui::theme::Theme;

use super::helpers::{dialog_rect, visible_slice};

/// Render the annotation editor dialog over a filled background
pub fn render_editor(frame: &mut Frame, view: &mut EditorView, theme: &Theme) {
    let area = frame.area();
    let bg = theme.background;
    frame.render_widget(Block::default().style(Style::default().bg(bg)), area);

    let dialog = dialog_rect(area);
    frame.render_widget(Clear, dialog);

    let title_style = Style::default()
        .fg(theme.text_bright)
        .bg(theme.title_bg)
        .add_modifier(Modifier::BOLD);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(bg))
        .title(Span::styled(format!(" {} ", view.title), title_style))
        .style(Style::default().bg(bg));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    // Layout: text | footer (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_text(frame, view, theme, chunks[0]);
    render_footer(frame, view, theme, chunks[1]);
}

fn render_text(frame: &mut Frame, view: &mut EditorView, theme: &Theme, area: Rect) {
    let height = area.height as usize;
    let width = area.width as usize;
    view.area.set_wrap_width(width);
    view.area.scroll_to_cursor(height);

    let text_style = Style::default().fg(theme.text).bg(theme.background);
    let scroll_row = view.area.scroll_row;
    let source = view.area.lines();
    let lines: Vec<Line> = view
        .area
        .display_rows()
        .into_iter()
        .skip(scroll_row)
        .take(height)
        .map(|(idx, range)| {
            // Hanging whitespace is clipped at the edge
            Line::from(Span::styled(visible_slice(&source[idx][range], 0, width), text_style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).style(text_style), area);

    let (row, col) = view.area.cursor_display_pos();
    if height > 0 && width > 0 {
        frame.set_cursor_position((
            area.x + col.min(width - 1) as u16,
            area.y + (row - scroll_row) as u16,
        ));
    }
}

fn render_footer(frame: &mut Frame, view: &EditorView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text).bg(bg);
    let key_style = Style::default().fg(theme.dim).bg(bg);

    if theme.show_key_hints {
        let mut hints = vec![
            Span::styled("Esc", key_style),
            Span::styled(" save & close", text_style),
        ];
        if view.discard.is_some() {
            hints.push(Span::styled("  ^D", key_style));
            hints.push(Span::styled(" discard", text_style));
        }
        frame.render_widget(Paragraph::new(Line::from(hints)), area);
    }

    if let Some(discard) = &view.discard {
        let button_style = Style::default()
            .fg(theme.class_color(discard.style_class))
            .bg(bg)
            .add_modifier(Modifier::BOLD);
        let button = Line::from(Span::styled(
            format!("[ {} ]", strip_mnemonic(&discard.label)),
            button_style,
        ));
        frame.render_widget(Paragraph::new(button).alignment(Alignment::Right), area);
    }
}
