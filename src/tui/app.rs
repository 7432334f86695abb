use std::io::{self, Stdout};
use std::sync::Once;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, error};

use crate::host::{Confirmation, Prompt};
use crate::module;
use crate::ops::session::{DiscardAffordance, EditSession, SessionOutcome};

use super::input::{self, EditorCommand};
use super::render;
use super::textarea::TextArea;
use super::theme::Theme;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

static PANIC_HOOK: Once = Once::new();

/// What the editor dialog shows
#[derive(Debug, Clone)]
pub struct EditorView {
    pub title: String,
    pub area: TextArea,
    /// The discard control, mirrored from the session
    pub discard: Option<DiscardAffordance>,
}

impl EditorView {
    pub fn new(session: &EditSession) -> Self {
        EditorView {
            title: session.title().to_string(),
            area: TextArea::new(session.text()),
            discard: session.discard_affordance().cloned(),
        }
    }

    /// Push the edited buffer into the session.
    fn sync(&mut self, session: &mut EditSession) {
        let change = session.replace_text(self.area.text());
        debug!("buffer edited, discard control {:?}", change);
        self.discard = session.discard_affordance().cloned();
    }
}

/// How the editor dialog was left
#[derive(Debug)]
pub enum EditorExit {
    /// Closed normally, or the terminal failed; the session still has to be
    /// committed
    Closed(EditSession),
    /// Edits were thrown away after confirmation
    Discarded,
}

/// Where the editor loop draws and gets its input.
pub trait EditorHost: Prompt {
    /// Draw `view`, then wait for the next event. `None` when nothing
    /// arrived in time.
    fn next_event(&mut self, view: &mut EditorView) -> io::Result<Option<Event>>;

    /// Editor drawn behind confirmation popups, `None` to clear it.
    fn set_backdrop(&mut self, view: Option<EditorView>);
}

/// Run the editor for `session` on `host` until it is closed or discarded.
///
/// A host failure closes the dialog as if the user had, so the edits can
/// still be saved.
pub fn drive_editor<H: EditorHost>(host: &mut H, mut session: EditSession) -> EditorExit {
    let mut view = EditorView::new(&session);
    loop {
        let command = match host.next_event(&mut view) {
            Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                input::handle_editor_key(&mut view.area, key)
            }
            Ok(Some(Event::Paste(text))) => input::handle_editor_paste(&mut view.area, &text),
            Ok(_) => continue,
            Err(e) => {
                error!("terminal failed, closing the editor: {}", e);
                return EditorExit::Closed(session);
            }
        };

        match command {
            EditorCommand::None => {}
            EditorCommand::Edited => view.sync(&mut session),
            EditorCommand::Close => return EditorExit::Closed(session),
            EditorCommand::Discard => {
                // ^D does nothing while there is no discard control
                if view.discard.is_none() {
                    continue;
                }
                host.set_backdrop(Some(view.clone()));
                let outcome = session.discard(&mut *host);
                host.set_backdrop(None);
                match outcome {
                    SessionOutcome::Discarded => return EditorExit::Discarded,
                    SessionOutcome::StillOpen(kept) => session = kept,
                    SessionOutcome::Closed(_) => unreachable!("discard never commits"),
                }
            }
        }
    }
}

/// The terminal in raw mode on the alternate screen.
///
/// Dropping it restores the terminal.
pub struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    /// Editor drawn behind a confirmation popup
    backdrop: Option<EditorView>,
}

impl Screen {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
                return Err(e);
            }
        };

        // Restore the terminal on panic
        PANIC_HOOK.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |panic_info| {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
                original_hook(panic_info);
            }));
        });

        Ok(Screen {
            terminal,
            theme: module::style(),
            backdrop: None,
        })
    }

    fn leave(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()
    }

    /// Run the editor dialog for `session` until it is closed or discarded.
    pub fn run_editor(&mut self, session: EditSession) -> EditorExit {
        drive_editor(self, session)
    }

    fn run_confirm(&mut self, request: &Confirmation) -> io::Result<bool> {
        loop {
            let theme = &self.theme;
            let backdrop = &mut self.backdrop;
            self.terminal.draw(|frame| {
                match backdrop.as_mut() {
                    Some(view) => render::render_editor(frame, view, theme),
                    None => render::render_backdrop(frame, theme),
                }
                render::render_confirm(frame, request, theme);
            })?;

            if let Some(Event::Key(key)) = next_event()?
                && key.kind == KeyEventKind::Press
                && let Some(answer) = input::handle_confirm_key(request, key)
            {
                return Ok(answer);
            }
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            error!("cannot restore terminal: {}", e);
        }
    }
}

impl EditorHost for Screen {
    fn next_event(&mut self, view: &mut EditorView) -> io::Result<Option<Event>> {
        let theme = &self.theme;
        self.terminal
            .draw(|frame| render::render_editor(frame, view, theme))?;
        next_event()
    }

    fn set_backdrop(&mut self, view: Option<EditorView>) {
        self.backdrop = view;
    }
}

impl Prompt for Screen {
    fn confirm(&mut self, request: &Confirmation) -> bool {
        self.run_confirm(request).unwrap_or_else(|e| {
            error!("cannot show confirmation: {}", e);
            false
        })
    }
}

/// Prompts on the terminal, entering the alternate screen only for the
/// duration of each question.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, request: &Confirmation) -> bool {
        match Screen::enter() {
            Ok(mut screen) => screen.confirm(request),
            Err(e) => {
                error!("cannot show confirmation: {}", e);
                false
            }
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn next_event() -> io::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::io::{MemoryStore, MetadataStore};
    use crate::model::{Entry, Selection};
    use crate::ops::OpenOutcome;

    /// Feeds scripted events and answers, recording what the editor showed.
    struct Scripted {
        events: VecDeque<io::Result<Option<Event>>>,
        answers: VecDeque<bool>,
        asked: usize,
        /// Whether the discard control was shown at each draw
        shown_discard: Vec<bool>,
        backdrop_during_prompt: Vec<bool>,
        backdrop: Option<EditorView>,
    }

    impl Scripted {
        fn new(events: Vec<Event>, answers: Vec<bool>) -> Self {
            Scripted {
                events: events.into_iter().map(|e| Ok(Some(e))).collect(),
                answers: answers.into(),
                asked: 0,
                shown_discard: Vec::new(),
                backdrop_during_prompt: Vec::new(),
                backdrop: None,
            }
        }
    }

    impl Prompt for Scripted {
        fn confirm(&mut self, _request: &Confirmation) -> bool {
            self.asked += 1;
            self.backdrop_during_prompt.push(self.backdrop.is_some());
            self.answers.pop_front().unwrap_or(false)
        }
    }

    impl EditorHost for Scripted {
        fn next_event(&mut self, view: &mut EditorView) -> io::Result<Option<Event>> {
            self.shown_discard.push(view.discard.is_some());
            self.events
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::other("script ran out")))
        }

        fn set_backdrop(&mut self, view: Option<EditorView>) {
            self.backdrop = view;
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn typed(text: &str) -> Vec<Event> {
        text.chars().map(|c| key(KeyCode::Char(c))).collect()
    }

    fn session(annotation: Option<&str>) -> EditSession {
        let store = MemoryStore::new();
        if let Some(text) = annotation {
            store.set(std::path::Path::new("/tmp/a.txt"), text).unwrap();
        }
        let selection = Selection::single(Entry::file("/tmp/a.txt"));
        let mut never = |_: &Confirmation| false;
        match EditSession::open(&selection, &store, &mut never, None).unwrap() {
            OpenOutcome::Opened(session) => session,
            OpenOutcome::Declined => panic!("open declined"),
        }
    }

    #[test]
    fn typing_reaches_the_session_and_mirrors_discard_control() {
        let mut events = typed("hi");
        events.push(key(KeyCode::Backspace));
        events.push(key(KeyCode::Backspace));
        events.push(key(KeyCode::Esc));
        let mut host = Scripted::new(events, vec![]);

        let exit = drive_editor(&mut host, session(None));
        let EditorExit::Closed(session) = exit else {
            panic!("expected the editor to close");
        };
        assert_eq!(session.text(), "");
        assert!(!session.is_modified());
        // blank, "h", "hi", "h", blank
        assert_eq!(host.shown_discard, vec![false, true, true, true, false]);
    }

    #[test]
    fn close_hands_back_edited_session() {
        let mut events = typed("note");
        events.push(ctrl('s'));
        let mut host = Scripted::new(events, vec![]);

        match drive_editor(&mut host, session(None)) {
            EditorExit::Closed(session) => {
                assert_eq!(session.text(), "note");
                assert!(session.is_modified());
            }
            EditorExit::Discarded => panic!("expected close"),
        }
        assert_eq!(host.asked, 0);
    }

    #[test]
    fn terminal_failure_keeps_the_edits() {
        let mut host = Scripted::new(typed("unsaved"), vec![]);
        host.events.push_back(Err(io::Error::other("terminal gone")));

        match drive_editor(&mut host, session(Some("old"))) {
            EditorExit::Closed(session) => {
                assert_eq!(session.text(), "unsavedold");
                assert!(session.is_modified());
            }
            EditorExit::Discarded => panic!("edits must not be dropped"),
        }
    }

    #[test]
    fn discard_asks_over_the_editor() {
        let mut events = typed("x");
        events.push(ctrl('d'));
        events.push(ctrl('d'));
        let mut host = Scripted::new(events, vec![false, true]);

        let exit = drive_editor(&mut host, session(None));
        assert!(matches!(exit, EditorExit::Discarded));
        assert_eq!(host.asked, 2);
        assert_eq!(host.backdrop_during_prompt, vec![true, true]);
        assert!(host.backdrop.is_none());
    }

    #[test]
    fn discard_without_changes_is_ignored() {
        let mut host = Scripted::new(vec![ctrl('d'), key(KeyCode::Esc)], vec![true]);
        let exit = drive_editor(&mut host, session(Some("same")));
        assert!(matches!(exit, EditorExit::Closed(_)));
        assert_eq!(host.asked, 0);
    }
}
