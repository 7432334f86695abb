use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::host::Confirmation;
use crate::i18n::tr;
use crate::model::{mnemonic, strip_mnemonic};
use crate::tui::theme::Theme;

use super::helpers::{centered_rect_fixed, wrap_text};

const POPUP_WIDTH: u16 = 56;

/// Render a destructive-action confirmation popup centered on the frame
pub fn render_confirm(frame: &mut Frame, request: &Confirmation, theme: &Theme) {
    let area = frame.area();
    let bg = theme.background;

    let header_style = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(theme.text).bg(bg);
    let dim_style = Style::default().fg(theme.dim).bg(bg);
    let destructive_style = Style::default()
        .fg(theme.destructive)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let popup_w = POPUP_WIDTH.min(area.width.saturating_sub(2));
    // borders plus one column of padding on each side
    let text_w = popup_w.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for line in wrap_text(&request.primary, text_w) {
        lines.push(Line::from(Span::styled(format!(" {}", line), header_style)));
    }
    lines.push(Line::from(""));
    for line in wrap_text(&request.secondary, text_w) {
        lines.push(Line::from(Span::styled(format!(" {}", line), text_style)));
    }
    lines.push(Line::from(""));

    // Buttons: Cancel, then the affirmative action
    let affirmative = strip_mnemonic(&request.affirmative);
    lines.push(Line::from(vec![
        Span::styled(" [ ", text_style),
        Span::styled(strip_mnemonic(&tr("_Cancel")), text_style),
        Span::styled(" ]  [ ", text_style),
        Span::styled(affirmative.as_str(), destructive_style),
        Span::styled(" ]", text_style),
    ]));

    if theme.show_key_hints {
        lines.push(Line::from(""));
        let enter = match mnemonic(&request.affirmative) {
            Some(key) => format!(" Enter/{}", key),
            None => " Enter".to_string(),
        };
        let hints = vec![
            Span::styled(enter, dim_style),
            Span::styled(format!(" {}  ", affirmative), text_style),
            Span::styled("Esc", dim_style),
            Span::styled(" cancel", text_style),
        ];
        lines.push(Line::from(hints));
    }

    let popup_h = ((lines.len() as u16) + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::erase::erase_confirmation;
    use crate::ops::session::{conflict_confirmation, discard_confirmation};
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};

    fn render(request: &Confirmation, theme: &Theme) -> String {
        render_to_string(TERM_W, TERM_H, |frame, _| render_confirm(frame, request, theme))
    }

    #[test]
    fn erase_popup_shows_both_texts_and_buttons() {
        let out = render(&erase_confirmation(), &Theme::default());
        assert!(out.contains("Do you really want to erase the annotations"));
        assert!(out.contains("attached?"));
        assert!(out.contains("The annotations will be lost forever."));
        assert!(out.contains("[ Cancel ]  [ Erase ]"));
        assert!(out.contains("Enter/r Erase"));
        assert!(out.contains("Esc cancel"));
    }

    #[test]
    fn discard_popup_uses_discard_label() {
        let out = render(&discard_confirmation(), &Theme::default());
        assert!(out.contains("Are you sure you want to discard the current"));
        assert!(out.contains("changes?"));
        assert!(out.contains("This action cannot be undone."));
        assert!(out.contains("[ Discard changes ]"));
        assert!(out.contains("Enter/d Discard changes"));
    }

    #[test]
    fn conflict_popup_without_hints() {
        let theme = Theme {
            show_key_hints: false,
            ..Theme::default()
        };
        let out = render(&conflict_confirmation(), &theme);
        assert!(out.contains("At least two annotations in the file selection"));
        assert!(out.contains("This will set up a blank new annotation."));
        assert!(out.contains("[ OK ]"));
        assert!(!out.contains("Esc cancel"));
    }
}
