pub mod confirm_popup;
pub mod editor_view;
mod helpers;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::theme::Theme;

pub use confirm_popup::render_confirm;
pub use editor_view::render_editor;

/// Background fill for a confirmation shown without an editor behind it
pub fn render_backdrop(frame: &mut Frame, theme: &Theme) {
    let bg_style = Style::default().bg(theme.background);
    frame.render_widget(Block::default().style(bg_style), frame.area());
}
