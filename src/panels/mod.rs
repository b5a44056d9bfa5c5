/*
 * Panel groups: fixed sets of controls that render one kind of tab content.
 * A panel is stateless between activations apart from what its controls hold
 * on screen; `save_state` flushes that into the tab's content and `set_state`
 * loads content back. Both ignore content of a variant the panel does not
 * own.
 */

pub mod controls;
mod project;
mod registry;
mod request;
mod settings;

pub use controls::{Control, ControlFactory};
pub use project::ProjectPanel;
pub use registry::PanelRegistry;
pub use request::RequestPanel;
pub use settings::SettingsPanel;

#[cfg(test)]
pub(crate) use registry::spy;

use crate::content::TabContent;
use crate::types::{ControlId, PanelGroupId, Rect};

pub trait Panel {
    fn panel_group(&self) -> PanelGroupId;
    /// Lays the controls out inside `bounds` (the content area below the
    /// strip).
    fn resize(&mut self, bounds: Rect);
    fn show(&mut self);
    fn hide(&mut self);
    /// Captures on-screen edits into `content`.
    fn save_state(&mut self, content: &mut TabContent);
    /// Populates the controls from `content`.
    fn set_state(&mut self, content: &TabContent);
    /// Maps a click on one of this panel's buttons to the action it stands
    /// for. Controls the panel does not own yield `None`.
    fn button_clicked(&self, _control: ControlId) -> Option<PanelAction> {
        None
    }
}

/// Actions a panel's own buttons trigger on the tab it is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    SendRequest,
}

/// Splits `total` pixels into rows: fixed heights first, the remainder to
/// the row marked `None`.
pub(crate) fn stack_rows(bounds: Rect, padding: i32, rows: &[Option<i32>]) -> Vec<Rect> {
    let inner = bounds.inset(padding, padding);
    let gaps = padding * (rows.len() as i32 - 1).max(0);
    let fixed: i32 = rows.iter().flatten().sum();
    let flexible = (inner.height() - gaps - fixed).max(0);
    let mut top = inner.top;
    rows.iter()
        .map(|row| {
            let height = row.unwrap_or(flexible);
            let rect = Rect::new(inner.left, top, inner.right.max(inner.left), top + height);
            top += height + padding;
            rect
        })
        .collect()
}
