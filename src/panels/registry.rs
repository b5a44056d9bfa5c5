/*
 * Panel registry and switcher. Maps each panel group to its panel and keeps
 * track of which one is on screen. Switching follows a fixed sequence: the
 * owner flushes the outgoing panel with `save_shown`, then `show` hides the
 * outgoing controls, lays out and shows the target, and loads the incoming
 * tab's content into it.
 *
 * Only the shown panel is resized; hidden panels are laid out again on their
 * next `show`.
 */

use super::{Panel, PanelAction};
use crate::content::TabContent;
use crate::error::{Result as ShellResult, ShellError, invariant_violation};
use crate::types::{ControlId, PanelGroupId, Rect};

use std::collections::HashMap;

pub struct PanelRegistry {
    panels: HashMap<PanelGroupId, Box<dyn Panel>>,
    shown: Option<PanelGroupId>,
    content_bounds: Rect,
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self {
            panels: HashMap::new(),
            shown: None,
            content_bounds: Rect::default(),
        }
    }

    /// Registers a panel under its own group. Panels start hidden.
    pub fn register(&mut self, mut panel: Box<dyn Panel>) -> ShellResult<()> {
        let group = panel.panel_group();
        if self.panels.contains_key(&group) {
            log::warn!("[Panels] panel group {group:?} registered twice");
            return Err(ShellError::DuplicatePanelGroup(group));
        }
        panel.hide();
        self.panels.insert(group, panel);
        log::debug!("[Panels] registered {group:?}");
        Ok(())
    }

    pub fn is_registered(&self, group: PanelGroupId) -> bool {
        self.panels.contains_key(&group)
    }

    pub fn shown(&self) -> Option<PanelGroupId> {
        self.shown
    }

    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Flushes the shown panel's on-screen edits into `content`.
    pub fn save_shown(&mut self, content: &mut TabContent) {
        if let Some(panel) = self.shown.and_then(|g| self.panels.get_mut(&g)) {
            panel.save_state(content);
        }
    }

    /// Puts `group` on screen with `content` loaded. Returns `false` without
    /// touching any control when `group` is not registered.
    pub fn show(&mut self, group: PanelGroupId, content: &TabContent) -> bool {
        if !self.panels.contains_key(&group) {
            invariant_violation(&format!("show called for unregistered panel group {group:?}"));
            return false;
        }

        if let Some(outgoing) = self.shown.filter(|g| *g != group) {
            if let Some(panel) = self.panels.get_mut(&outgoing) {
                panel.hide();
            }
            log::debug!("[Panels] {outgoing:?} -> {group:?}");
        }

        let bounds = self.content_bounds;
        if let Some(panel) = self.panels.get_mut(&group) {
            panel.resize(bounds);
            panel.show();
            panel.set_state(content);
        }
        self.shown = Some(group);
        true
    }

    /// Reloads the shown panel from `content`, e.g. after a background
    /// result landed in the active tab.
    pub fn refresh_shown(&mut self, content: &TabContent) {
        if let Some(panel) = self.shown.and_then(|g| self.panels.get_mut(&g)) {
            panel.set_state(content);
        }
    }

    /// Asks the shown panel what a click on `control` means. Hidden panels
    /// never answer.
    pub fn button_clicked(&self, control: ControlId) -> Option<PanelAction> {
        let panel = self.shown.and_then(|g| self.panels.get(&g))?;
        panel.button_clicked(control)
    }

    /// Hides whatever is shown; used when the last tab closes.
    pub fn hide_all(&mut self) {
        if let Some(panel) = self.shown.take().and_then(|g| self.panels.get_mut(&g)) {
            panel.hide();
        }
    }

    /// Records the content area and lays out only the shown panel.
    pub fn resize(&mut self, bounds: Rect) {
        self.content_bounds = bounds;
        if let Some(panel) = self.shown.and_then(|g| self.panels.get_mut(&g)) {
            panel.resize(bounds);
        }
    }
}
