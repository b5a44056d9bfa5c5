/*
 * The control-factory contract panels are built from. The core never creates
 * native controls itself; a backend (the Win32 one, or a fake in tests) hands
 * out boxed `Control`s that can be shown, hidden, moved and read or written as
 * text.
 */

use crate::error::Result as ShellResult;
use crate::types::{ControlId, Rect};

pub trait Control {
    /// The id the backend assigned at creation; clicks are reported with it.
    fn id(&self) -> ControlId;
    fn show(&mut self);
    fn hide(&mut self);
    fn move_to(&mut self, rect: Rect);
    /// List and tree controls report one item per line.
    fn text(&self) -> String;
    /// List and tree controls take one item per line.
    fn set_text(&mut self, text: &str);
}

pub trait ControlFactory {
    fn create_label(&mut self, text: &str) -> ShellResult<Box<dyn Control>>;
    fn create_input(&mut self, text: &str, multiline: bool) -> ShellResult<Box<dyn Control>>;
    fn create_button(&mut self, text: &str) -> ShellResult<Box<dyn Control>>;
    fn create_list_view(&mut self) -> ShellResult<Box<dyn Control>>;
    fn create_tree_view(&mut self) -> ShellResult<Box<dyn Control>>;
    fn create_combo_box(&mut self, items: &[&str]) -> ShellResult<Box<dyn Control>>;
}

/// Visibility helpers shared by every panel.
pub(crate) fn show_all<'a>(controls: impl IntoIterator<Item = &'a mut Box<dyn Control>>) {
    for control in controls {
        control.show();
    }
}

pub(crate) fn hide_all<'a>(controls: impl IntoIterator<Item = &'a mut Box<dyn Control>>) {
    for control in controls {
        control.hide();
    }
}
