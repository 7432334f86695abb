use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::textarea::TextArea;

/// Lines moved by PageUp/PageDown
const PAGE_LINES: isize = 10;

/// What a key press in the editor asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Nothing beyond cursor movement
    None,
    /// The buffer changed
    Edited,
    /// Close the dialog, saving changes
    Close,
    /// Activate the discard control
    Discard,
}

pub fn handle_editor_key(area: &mut TextArea, key: KeyEvent) -> EditorCommand {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => EditorCommand::Close,
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => EditorCommand::Close,
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => EditorCommand::Discard,

        (_, KeyCode::Enter) => {
            area.insert_newline();
            EditorCommand::Edited
        }
        (_, KeyCode::Tab) => {
            area.insert_char('\t');
            EditorCommand::Edited
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            area.insert_char(c);
            EditorCommand::Edited
        }
        (_, KeyCode::Backspace) => edited(area.backspace()),
        (_, KeyCode::Delete) => edited(area.delete()),

        _ => {
            move_cursor(area, key);
            EditorCommand::None
        }
    }
}

fn move_cursor(area: &mut TextArea, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Left if ctrl => area.move_word_left(),
        KeyCode::Right if ctrl => area.move_word_right(),
        KeyCode::Home if ctrl => area.move_top(),
        KeyCode::End if ctrl => area.move_bottom(),
        KeyCode::Left => area.move_left(),
        KeyCode::Right => area.move_right(),
        KeyCode::Up => area.move_vertical(-1),
        KeyCode::Down => area.move_vertical(1),
        KeyCode::PageUp => area.move_vertical(-PAGE_LINES),
        KeyCode::PageDown => area.move_vertical(PAGE_LINES),
        KeyCode::Home => area.move_home(),
        KeyCode::End => area.move_end(),
        _ => {}
    }
}

/// Text dropped into the editor in one go (bracketed paste)
pub fn handle_editor_paste(area: &mut TextArea, text: &str) -> EditorCommand {
    if text.is_empty() {
        return EditorCommand::None;
    }
    area.insert_str(text);
    EditorCommand::Edited
}

fn edited(changed: bool) -> EditorCommand {
    if changed {
        EditorCommand::Edited
    } else {
        EditorCommand::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_reports_edits() {
        let mut area = TextArea::default();
        assert_eq!(handle_editor_key(&mut area, key(KeyCode::Char('h'))), EditorCommand::Edited);
        assert_eq!(
            handle_editor_key(
                &mut area,
                KeyEvent::new(KeyCode::Char('I'), KeyModifiers::SHIFT)
            ),
            EditorCommand::Edited
        );
        assert_eq!(handle_editor_key(&mut area, key(KeyCode::Enter)), EditorCommand::Edited);
        assert_eq!(area.text(), "hI\n");
    }

    #[test]
    fn backspace_at_start_is_not_an_edit() {
        let mut area = TextArea::new("x");
        assert_eq!(handle_editor_key(&mut area, key(KeyCode::Backspace)), EditorCommand::None);
        assert_eq!(handle_editor_key(&mut area, key(KeyCode::Delete)), EditorCommand::Edited);
        assert_eq!(area.text(), "");
    }

    #[test]
    fn movement_is_not_an_edit() {
        let mut area = TextArea::new("one\ntwo");
        for code in [KeyCode::Down, KeyCode::End, KeyCode::Left, KeyCode::Home, KeyCode::Up] {
            assert_eq!(handle_editor_key(&mut area, key(code)), EditorCommand::None);
        }
        assert_eq!(area.cursor(), (0, 0));
        assert_eq!(
            handle_editor_key(&mut area, KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL)),
            EditorCommand::None
        );
        assert_eq!(area.cursor(), (1, 3));
    }

    #[test]
    fn dismissal_keys() {
        let mut area = TextArea::default();
        assert_eq!(handle_editor_key(&mut area, key(KeyCode::Esc)), EditorCommand::Close);
        assert_eq!(handle_editor_key(&mut area, ctrl('s')), EditorCommand::Close);
        assert_eq!(handle_editor_key(&mut area, ctrl('d')), EditorCommand::Discard);
        // other control chords are not typed into the buffer
        assert_eq!(handle_editor_key(&mut area, ctrl('x')), EditorCommand::None);
        assert_eq!(area.text(), "");
    }

    #[test]
    fn paste_is_one_edit() {
        let mut area = TextArea::default();
        assert_eq!(handle_editor_paste(&mut area, "a\nb"), EditorCommand::Edited);
        assert_eq!(handle_editor_paste(&mut area, ""), EditorCommand::None);
        assert_eq!(area.text(), "a\nb");
    }
}
