mod confirm;
mod editor;

pub use confirm::handle_confirm_key;
pub use editor::{EditorCommand, handle_editor_key, handle_editor_paste};
