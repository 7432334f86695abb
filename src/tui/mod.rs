pub mod app;
pub mod input;
pub mod render;
pub mod textarea;
pub mod theme;

pub use app::{EditorExit, EditorHost, EditorView, Screen, TerminalPrompt, drive_editor};
