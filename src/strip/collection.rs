/*
 * Ordered tab collection. Owns identity assignment, insertion, removal and
 * active-tab selection. Mutations queue `CollectionEvent`s which the owning
 * `TabStrip` drains to switch panels and notify the host.
 *
 * Invariant: `active`, when set, names a member of `tabs`; it is `None` only
 * when the collection is empty.
 */

use crate::content::TabContent;
use crate::error::invariant_violation;
use crate::types::{PanelGroupId, TabId};

#[derive(Debug)]
pub struct Tab {
    id: TabId,
    pub title: String,
    panel_group: PanelGroupId,
    content: TabContent,
}

impl Tab {
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn panel_group(&self) -> PanelGroupId {
        self.panel_group
    }

    pub fn content(&self) -> &TabContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut TabContent {
        &mut self.content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    Activated {
        previous: Option<TabId>,
        current: TabId,
    },
    /// The active tab was removed and nothing is left to activate.
    Emptied { previous: TabId },
    Closed(TabId),
    RepaintRequested,
}

#[derive(Debug)]
pub struct TabCollection {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    events: Vec<CollectionEvent>,
}

impl Default for TabCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TabCollection {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Appends a tab and activates it. Always succeeds.
    pub fn add(&mut self, title: &str, panel_group: PanelGroupId, content: TabContent) -> TabId {
        if content.panel_group() != panel_group {
            invariant_violation(&format!(
                "tab content for {:?} added to panel group {panel_group:?}",
                content.panel_group()
            ));
        }
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(Tab {
            id,
            title: title.to_string(),
            panel_group,
            content,
        });
        log::debug!("[TabStrip] added tab {id:?} '{title}' ({panel_group:?})");
        self.set_active(id);
        self.events.push(CollectionEvent::RepaintRequested);
        id
    }

    /// Removes `id`. Closing the active tab activates the tab now at its
    /// position, else the last tab, else nothing. Unknown ids are ignored.
    pub fn close(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            log::trace!("[TabStrip] close ignored for unknown tab {id:?}");
            return;
        };
        self.tabs.remove(index);
        log::debug!("[TabStrip] closed tab {id:?} at index {index}");

        if self.active == Some(id) {
            let replacement = self
                .tabs
                .get(index)
                .or_else(|| self.tabs.last())
                .map(Tab::id);
            match replacement {
                Some(next) => {
                    self.active = Some(next);
                    self.events.push(CollectionEvent::Activated {
                        previous: Some(id),
                        current: next,
                    });
                }
                None => {
                    self.active = None;
                    self.events.push(CollectionEvent::Emptied { previous: id });
                }
            }
        }
        self.events.push(CollectionEvent::Closed(id));
        self.events.push(CollectionEvent::RepaintRequested);
    }

    /// Activates `id`. Re-activating the active tab is a silent no-op.
    pub fn activate(&mut self, id: TabId) {
        if self.index_of(id).is_none() {
            invariant_violation(&format!("activate called for unknown tab {id:?}"));
            return;
        }
        if self.active == Some(id) {
            return;
        }
        self.set_active(id);
        self.events.push(CollectionEvent::RepaintRequested);
    }

    fn set_active(&mut self, id: TabId) {
        let previous = self.active.replace(id);
        self.events.push(CollectionEvent::Activated {
            previous,
            current: id,
        });
    }

    /// Renames a tab without touching its identity or content.
    pub fn set_title(&mut self, id: TabId, title: &str) -> bool {
        match self.get_mut(id) {
            Some(tab) => {
                tab.title = title.to_string();
                self.events.push(CollectionEvent::RepaintRequested);
                true
            }
            None => false,
        }
    }

    /// First tab bound to `group`, in visual order.
    pub fn find_by_panel_group(&self, group: PanelGroupId) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.panel_group == group)
            .map(Tab::id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).map(Tab::id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active?;
        self.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }
}
