use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::host::Confirmation;
use crate::model::mnemonic;

/// Key handling for a confirmation popup.
///
/// Returns `Some(true)` when the affirmative action was chosen, `Some(false)`
/// when the popup was dismissed any other way, and `None` to keep waiting.
/// Enter picks the affirmative action, which is the popup's default.
pub fn handle_confirm_key(request: &Confirmation, key: KeyEvent) -> Option<bool> {
    if !matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT) {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(true),
        KeyCode::Esc => Some(false),
        KeyCode::Char(c) => {
            let c = c.to_lowercase().next()?;
            if Some(c) == mnemonic(&request.affirmative) || c == 'y' {
                Some(true)
            } else if c == 'n' || c == 'c' {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::erase::erase_confirmation;
    use crate::ops::session::discard_confirmation;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_and_mnemonic_confirm() {
        let erase = erase_confirmation();
        assert_eq!(handle_confirm_key(&erase, key(KeyCode::Enter)), Some(true));
        assert_eq!(handle_confirm_key(&erase, key(KeyCode::Char('r'))), Some(true));
        assert_eq!(
            handle_confirm_key(&erase, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(true)
        );
        assert_eq!(handle_confirm_key(&erase, key(KeyCode::Char('y'))), Some(true));

        let discard = discard_confirmation();
        assert_eq!(handle_confirm_key(&discard, key(KeyCode::Char('d'))), Some(true));
        assert_eq!(handle_confirm_key(&discard, key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn escape_and_cancel_decline() {
        let discard = discard_confirmation();
        assert_eq!(handle_confirm_key(&discard, key(KeyCode::Esc)), Some(false));
        assert_eq!(handle_confirm_key(&discard, key(KeyCode::Char('n'))), Some(false));
        assert_eq!(handle_confirm_key(&discard, key(KeyCode::Char('c'))), Some(false));
    }

    #[test]
    fn control_chords_are_ignored() {
        let erase = erase_confirmation();
        assert_eq!(
            handle_confirm_key(&erase, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(handle_confirm_key(&erase, key(KeyCode::Tab)), None);
    }
}
