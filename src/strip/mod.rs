/*
 * The caption tab strip. `TabStrip` owns the tab collection, the hover
 * tracker, the panel registry and the shared drawing resources of one window
 * and turns raw pointer input into collection mutations and panel switches.
 *
 * Every mutation goes through the collection, whose queued events are then
 * replayed here: an activation flushes the outgoing panel into the tab that is
 * losing focus before the incoming panel is loaded, emptying the collection
 * hides the content area, and all repaint requests of one mutation collapse
 * into a single `RepaintRequested`. The host drains the resulting
 * `TabStripEvent`s with `take_events`.
 */

pub mod collection;
pub mod geometry;
pub mod hover;
pub mod renderer;

pub use collection::{Tab, TabCollection};
pub use geometry::StripLayout;
pub use hit_test::{HitTarget, hit_test};
pub use hover::{HoverState, HoverTracker};
pub use renderer::StripResources;

use crate::collaborators::{
    Completion, CompletionSender, PersistenceStore, RequestExecutor, Waker, completion_channel,
};
use crate::config::TabStripConfig;
use crate::content::{ProjectContent, SettingsContent, TabContent};
use crate::drawing::{DrawingSurface, ResourceFactory};
use crate::error::{Result as ShellResult, ShellError};
use crate::panels::{Panel, PanelAction, PanelRegistry};
use crate::types::{ControlId, PanelGroupId, Rect, StripCommand, TabId, TabStripEvent};
use collection::CollectionEvent;
use renderer::StripView;

use crossbeam_channel::Receiver;
use std::path::Path;
use std::time::Duration;

pub const SENDING_STATUS: &str = "Sending\u{2026}";

pub struct TabStrip {
    config: TabStripConfig,
    tabs: TabCollection,
    hover: HoverTracker,
    panels: PanelRegistry,
    resources: StripResources,
    width: i32,
    height: i32,
    events: Vec<TabStripEvent>,
    completion_tx: CompletionSender,
    completion_rx: Receiver<Completion>,
    executor: Option<Box<dyn RequestExecutor>>,
}

impl TabStrip {
    /// Validates `config` and creates the shared drawing objects. `waker` is
    /// called from background threads whenever a request completion is
    /// queued; it must schedule `drain_completions` on the owning thread.
    pub fn new(
        config: TabStripConfig,
        factory: &mut dyn ResourceFactory,
        waker: Waker,
    ) -> ShellResult<Self> {
        config.validate()?;
        let resources = StripResources::create(
            factory,
            &config.palette,
            &config.metrics,
            config.font.as_ref(),
        );
        let (completion_tx, completion_rx) = completion_channel(waker);
        log::debug!("[TabStrip] created");
        Ok(Self {
            config,
            tabs: TabCollection::new(),
            hover: HoverTracker::new(),
            panels: PanelRegistry::new(),
            resources,
            width: 0,
            height: 0,
            events: Vec::new(),
            completion_tx,
            completion_rx,
            executor: None,
        })
    }

    pub fn config(&self) -> &TabStripConfig {
        &self.config
    }

    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    pub fn shown_panel(&self) -> Option<PanelGroupId> {
        self.panels.shown()
    }

    /// Layout for the current width and tab count. Recomputed on every call.
    pub fn layout(&self) -> StripLayout {
        StripLayout::compute(&self.config.metrics, self.tabs.len(), self.width)
    }

    /// A handle executors can move to other threads.
    pub fn completion_sender(&self) -> CompletionSender {
        self.completion_tx.clone()
    }

    pub fn register_panel(&mut self, panel: Box<dyn Panel>) -> ShellResult<()> {
        self.panels.register(panel)
    }

    /// The executor `StripCommand::SendRequest` goes through.
    pub fn set_request_executor(&mut self, executor: Box<dyn RequestExecutor>) {
        self.executor = Some(executor);
    }

    pub fn take_events(&mut self) -> Vec<TabStripEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Tab operations -------------------------------------------------

    pub fn add_tab(&mut self, title: &str, panel_group: PanelGroupId, content: TabContent) -> TabId {
        let id = self.tabs.add(title, panel_group, content);
        self.apply_collection_events();
        id
    }

    pub fn close_tab(&mut self, id: TabId) {
        self.tabs.close(id);
        self.apply_collection_events();
    }

    pub fn activate_tab(&mut self, id: TabId) {
        self.tabs.activate(id);
        self.apply_collection_events();
    }

    pub fn rename_tab(&mut self, id: TabId, title: &str) -> bool {
        let renamed = self.tabs.set_title(id, title);
        if !renamed {
            log::trace!("[TabStrip] rename ignored for unknown tab {id:?}");
        }
        self.apply_collection_events();
        renamed
    }

    pub fn find_tab_by_panel_group(&self, group: PanelGroupId) -> Option<TabId> {
        self.tabs.find_by_panel_group(group)
    }

    /// Flushes the shown panel's edits into the active tab.
    pub fn sync_active_content(&mut self) {
        if let Some(tab) = self.tabs.active_tab_mut() {
            self.panels.save_shown(tab.content_mut());
        }
    }

    pub fn execute(&mut self, command: StripCommand) {
        log::debug!("[TabStrip] execute {command:?}");
        match command {
            StripCommand::AddDefaultTab => {
                let group = self.config.default_panel_group;
                let title = self.config.default_title.clone();
                self.add_tab(&title, group, TabContent::default_for(group));
            }
            StripCommand::AddTab { title, content } => {
                let group = content.panel_group();
                self.add_tab(&title, group, content);
            }
            StripCommand::CloseTab(id) => self.close_tab(id),
            StripCommand::ActivateTab(id) => self.activate_tab(id),
            StripCommand::RenameTab { tab, title } => {
                self.rename_tab(tab, &title);
            }
            StripCommand::OpenMenu => self.events.push(TabStripEvent::MenuRequested),
            StripCommand::SendRequest(tab) => self.send_with_installed_executor(tab),
            StripCommand::BeginCaptionDrag => {
                self.events.push(TabStripEvent::CaptionDragRequested)
            }
        }
    }

    /// The click table: which command a click on `hit` issues.
    pub fn route_click(&self, hit: HitTarget) -> Option<StripCommand> {
        match hit {
            HitTarget::Tab(i) => self.tabs.id_at(i).map(StripCommand::ActivateTab),
            HitTarget::CloseButton(i) => self.tabs.id_at(i).map(StripCommand::CloseTab),
            HitTarget::AddButton => Some(StripCommand::AddDefaultTab),
            HitTarget::MenuButton => Some(StripCommand::OpenMenu),
            HitTarget::Caption => Some(StripCommand::BeginCaptionDrag),
            HitTarget::None => None,
        }
    }

    /// The command a click on a panel button issues. Only the shown panel
    /// answers, and its actions apply to the active tab.
    pub fn route_button(&self, control: ControlId) -> Option<StripCommand> {
        let action = self.panels.button_clicked(control)?;
        let tab = self.tabs.active()?;
        match action {
            PanelAction::SendRequest => Some(StripCommand::SendRequest(tab)),
        }
    }

    /// Dispatches a button click reported by the host window. Returns
    /// `false` when no shown panel owns `control`.
    pub fn handle_button_click(&mut self, control: ControlId) -> bool {
        let Some(command) = self.route_button(control) else {
            log::trace!("[TabStrip] click on {control:?} has no action");
            return false;
        };
        self.execute(command);
        true
    }

    // --- Pointer input --------------------------------------------------

    /// Returns whether the hover state changed (and a repaint was queued).
    pub fn handle_pointer_move(&mut self, x: i32, y: i32) -> bool {
        let layout = self.layout();
        let changed = self.hover.pointer_moved(&layout, x, y);
        if changed {
            self.events.push(TabStripEvent::RepaintRequested);
        }
        changed
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        let changed = self.hover.pointer_left();
        if changed {
            self.events.push(TabStripEvent::RepaintRequested);
        }
        changed
    }

    /// Dispatches a completed click. Returns `false` when the click landed
    /// on free caption space or outside the strip, i.e. the host should treat
    /// it as its own.
    pub fn handle_click(&mut self, x: i32, y: i32) -> bool {
        let hit = hit_test(&self.layout(), x, y);
        let Some(command) = self.route_click(hit) else {
            return false;
        };
        let consumed = !matches!(command, StripCommand::BeginCaptionDrag);
        self.execute(command);
        consumed
    }

    // --- Painting and layout ----------------------------------------------

    pub fn paint<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let layout = self.layout();
        let view = StripView {
            layout: &layout,
            tabs: &self.tabs,
            hover: self.hover.state(),
            palette: &self.config.palette,
            metrics: &self.config.metrics,
            resources: &self.resources,
        };
        renderer::paint(surface, &view);
    }

    /// The window's client area changed. The strip spans the full width; the
    /// content area is everything below it.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        let strip_height = self.config.metrics.strip_height;
        self.panels.resize(Rect::new(
            0,
            strip_height,
            self.width,
            self.height.max(strip_height),
        ));
        self.hover.refresh(&self.layout());
        self.events.push(TabStripEvent::RepaintRequested);
    }

    pub fn content_bounds(&self) -> Rect {
        self.panels.content_bounds()
    }

    pub fn release_resources(&mut self, factory: &mut dyn ResourceFactory) {
        self.resources.release(factory);
        log::debug!("[TabStrip] drawing resources released");
    }

    // --- Request dispatch -------------------------------------------------

    /// Sends the request held by `tab`. The tab shows a sending status until
    /// its completion is drained.
    pub fn dispatch_request(
        &mut self,
        executor: &mut dyn RequestExecutor,
        tab: TabId,
    ) -> ShellResult<()> {
        self.sync_active_content();
        let timeout = self.request_timeout();
        let active = self.tabs.active() == Some(tab);

        let entry = self.tabs.get_mut(tab).ok_or(ShellError::UnknownTab(tab))?;
        let content = entry.content_mut().as_request_mut().ok_or_else(|| {
            ShellError::OperationFailed(format!("tab {tab:?} does not hold a request"))
        })?;
        content.status = SENDING_STATUS.to_string();
        let spec = content.request.clone();
        if active {
            self.panels.refresh_shown(entry.content());
        }

        log::debug!(
            "[TabStrip] sending {} {} for {tab:?} (timeout {}s)",
            spec.method.as_str(),
            spec.url,
            timeout.as_secs()
        );
        executor.send(spec, timeout, self.completion_tx.callback_for(tab));
        Ok(())
    }

    fn send_with_installed_executor(&mut self, tab: TabId) {
        let Some(mut executor) = self.executor.take() else {
            log::warn!("[TabStrip] send requested for {tab:?} without a request executor");
            return;
        };
        if let Err(e) = self.dispatch_request(executor.as_mut(), tab) {
            log::warn!("[TabStrip] could not send {tab:?}: {e}");
        }
        self.executor = Some(executor);
    }

    /// Applies every queued completion. Results for tabs that were closed,
    /// or no longer hold a request, are dropped. Returns how many were
    /// applied.
    pub fn drain_completions(&mut self) -> usize {
        if self.completion_rx.is_empty() {
            return 0;
        }
        // A refresh below would otherwise overwrite unsaved edits.
        self.sync_active_content();

        let limit = self.config.history_limit;
        let mut applied = 0;
        while let Ok(Completion { tab, outcome }) = self.completion_rx.try_recv() {
            let Some(content) = self
                .tabs
                .get_mut(tab)
                .and_then(|t| t.content_mut().as_request_mut())
            else {
                log::trace!("[Completions] discarding result for stale tab {tab:?}");
                continue;
            };
            match outcome {
                Ok(record) => {
                    log::debug!("[Completions] {tab:?} -> {}", record.summary());
                    content.push_response(record, limit);
                }
                Err(e) => {
                    log::debug!("[Completions] {tab:?} failed: {e}");
                    content.status = format!("Error: {e}");
                }
            }
            applied += 1;

            if self.tabs.active() == Some(tab) {
                if let Some(entry) = self.tabs.get(tab) {
                    self.panels.refresh_shown(entry.content());
                }
            }
        }
        applied
    }

    fn request_timeout(&self) -> Duration {
        self.tabs
            .find_by_panel_group(PanelGroupId::Settings)
            .and_then(|id| self.tabs.get(id))
            .and_then(|tab| match tab.content() {
                TabContent::Settings(s) => Some(s.settings.request_timeout),
                _ => None,
            })
            .unwrap_or(self.config.request_timeout)
    }

    // --- Persistence ------------------------------------------------------

    pub fn save_project(
        &mut self,
        store: &mut dyn PersistenceStore,
        tab: TabId,
        path: &Path,
    ) -> ShellResult<()> {
        self.sync_active_content();
        let entry = self.tabs.get_mut(tab).ok_or(ShellError::UnknownTab(tab))?;
        let TabContent::Project(project) = entry.content_mut() else {
            return Err(ShellError::OperationFailed(format!(
                "tab {tab:?} does not hold a project"
            )));
        };
        store.save_project(path, &project.tree)?;
        project.path = Some(path.to_path_buf());
        log::debug!("[TabStrip] saved project of {tab:?} to {}", path.display());
        Ok(())
    }

    /// Opens the project at `path` in a new tab, or activates the tab that
    /// already shows it.
    pub fn load_project_tab(
        &mut self,
        store: &mut dyn PersistenceStore,
        path: &Path,
    ) -> ShellResult<TabId> {
        let existing = self.tabs.iter().find_map(|tab| match tab.content() {
            TabContent::Project(p) if p.path.as_deref() == Some(path) => Some(tab.id()),
            _ => None,
        });
        if let Some(id) = existing {
            self.activate_tab(id);
            return Ok(id);
        }

        let tree = store.load_project(path)?;
        let title = tree.name().to_string();
        let content = ProjectContent {
            tree,
            path: Some(path.to_path_buf()),
        };
        Ok(self.add_tab(&title, PanelGroupId::ProjectTree, TabContent::Project(content)))
    }

    pub fn save_settings(
        &mut self,
        store: &mut dyn PersistenceStore,
        tab: TabId,
        path: &Path,
    ) -> ShellResult<()> {
        self.sync_active_content();
        let entry = self.tabs.get(tab).ok_or(ShellError::UnknownTab(tab))?;
        let TabContent::Settings(content) = entry.content() else {
            return Err(ShellError::OperationFailed(format!(
                "tab {tab:?} does not hold settings"
            )));
        };
        store.save_settings(path, &content.settings)?;
        Ok(())
    }

    /// Loads settings into the settings tab, creating it when none is open.
    pub fn load_settings_tab(
        &mut self,
        store: &mut dyn PersistenceStore,
        path: &Path,
    ) -> ShellResult<TabId> {
        let settings = store.load_settings(path)?;
        match self.find_tab_by_panel_group(PanelGroupId::Settings) {
            Some(id) => {
                if let Some(tab) = self.tabs.get_mut(id) {
                    *tab.content_mut() = TabContent::Settings(SettingsContent { settings });
                }
                if self.tabs.active() == Some(id) {
                    if let Some(tab) = self.tabs.get(id) {
                        self.panels.refresh_shown(tab.content());
                    }
                } else {
                    self.activate_tab(id);
                }
                Ok(id)
            }
            None => Ok(self.add_tab(
                "Settings",
                PanelGroupId::Settings,
                TabContent::Settings(SettingsContent { settings }),
            )),
        }
    }

    // --- Event replay -----------------------------------------------------

    fn apply_collection_events(&mut self) {
        let mut repaint = false;
        for event in self.tabs.take_events() {
            match event {
                CollectionEvent::Activated { previous, current } => {
                    if let Some(outgoing) = previous.and_then(|id| self.tabs.get_mut(id)) {
                        self.panels.save_shown(outgoing.content_mut());
                    }
                    if let Some(incoming) = self.tabs.get(current) {
                        self.panels.show(incoming.panel_group(), incoming.content());
                    }
                    self.events.push(TabStripEvent::TabActivated(current));
                }
                CollectionEvent::Emptied { previous } => {
                    log::debug!("[TabStrip] last tab {previous:?} closed");
                    self.panels.hide_all();
                    self.events.push(TabStripEvent::TabsExhausted);
                }
                CollectionEvent::Closed(id) => self.events.push(TabStripEvent::TabClosed(id)),
                CollectionEvent::RepaintRequested => repaint = true,
            }
        }
        if self.hover.refresh(&self.layout()) {
            repaint = true;
        }
        if repaint {
            self.events.push(TabStripEvent::RepaintRequested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CompletionCallback, ExecutorError, PersistenceError};
    use crate::content::{
        ProjectTree, RequestContent, RequestSpec, ResponseRecord, Settings,
    };
    use crate::drawing::recording::RecordingSurface;
    use crate::panels::spy::{Journal, SPY_SEND, SpyPanel};
    use std::cell::RefCell;
    use std::rc::Rc;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WIDTH: i32 = 1200;

    fn strip_with(journal: &Journal) -> TabStrip {
        strip_on(&mut RecordingSurface::new(), journal)
    }

    /// Creates the strip's shared objects on `surface`, so later paints on the
    /// same surface can resolve them.
    fn strip_on(surface: &mut RecordingSurface, journal: &Journal) -> TabStrip {
        let mut strip =
            TabStrip::new(TabStripConfig::default(), surface, Arc::new(|| {})).unwrap();
        for group in [
            PanelGroupId::RequestEditor,
            PanelGroupId::ProjectTree,
            PanelGroupId::Settings,
        ] {
            strip.register_panel(SpyPanel::boxed(group, journal)).unwrap();
        }
        strip.resize(WIDTH, 800);
        strip.take_events();
        journal.borrow_mut().clear();
        strip
    }

    fn request_tab(strip: &mut TabStrip, title: &str) -> TabId {
        strip.add_tab(
            title,
            PanelGroupId::RequestEditor,
            TabContent::default_for(PanelGroupId::RequestEditor),
        )
    }

    fn centre(rect: Rect) -> (i32, i32) {
        ((rect.left + rect.right) / 2, (rect.top + rect.bottom) / 2)
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = TabStripConfig::default();
        config.metrics.tab_min_width = config.metrics.tab_max_width + 1;
        let result = TabStrip::new(config, &mut RecordingSurface::new(), Arc::new(|| {}));
        assert!(matches!(result, Err(ShellError::InvalidConfig(_))));
    }

    #[test]
    fn switching_groups_saves_the_outgoing_tab_before_loading_the_next() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        request_tab(&mut strip, "A");
        journal.borrow_mut().clear();

        strip.add_tab(
            "Settings",
            PanelGroupId::Settings,
            TabContent::default_for(PanelGroupId::Settings),
        );

        assert_eq!(
            *journal.borrow(),
            vec![
                "RequestEditor.save_state",
                "RequestEditor.hide",
                "Settings.resize(1200,764)",
                "Settings.show",
                "Settings.set_state",
            ]
        );
        assert_eq!(strip.shown_panel(), Some(PanelGroupId::Settings));
    }

    #[test]
    fn closing_the_active_tab_reactivates_its_neighbour() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let a = request_tab(&mut strip, "A");
        let b = request_tab(&mut strip, "B");
        strip.take_events();

        strip.close_tab(b);
        assert_eq!(
            strip.take_events(),
            vec![
                TabStripEvent::TabActivated(a),
                TabStripEvent::TabClosed(b),
                TabStripEvent::RepaintRequested,
            ]
        );
        assert_eq!(strip.tabs().active(), Some(a));
    }

    #[test]
    fn closing_the_last_tab_hides_the_content_area() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let a = request_tab(&mut strip, "A");
        strip.take_events();

        strip.close_tab(a);
        let events = strip.take_events();
        assert!(events.contains(&TabStripEvent::TabsExhausted));
        assert_eq!(strip.shown_panel(), None);
        assert_eq!(journal.borrow().last().unwrap(), "RequestEditor.hide");
    }

    #[test]
    fn clicks_follow_the_routing_table() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let a = request_tab(&mut strip, "A");
        let b = request_tab(&mut strip, "B");
        strip.take_events();
        let layout = strip.layout();

        let (x, y) = centre(layout.close_rect(layout.tab_rect(0)));
        assert!(strip.handle_click(x, y));
        assert!(strip.tabs().get(a).is_none());
        assert_eq!(strip.tabs().active(), Some(b));

        let layout = strip.layout();
        let (x, y) = centre(layout.add_button_rect());
        assert!(strip.handle_click(x, y));
        assert_eq!(strip.tabs().len(), 2);
        let added = strip.tabs().active_tab().unwrap();
        assert_eq!(added.title, "New Request");
        assert_eq!(added.panel_group(), PanelGroupId::RequestEditor);

        strip.take_events();
        let (x, y) = centre(strip.layout().menu_button_rect());
        assert!(strip.handle_click(x, y));
        assert_eq!(strip.take_events(), vec![TabStripEvent::MenuRequested]);
    }

    #[test]
    fn caption_clicks_are_left_to_the_host() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        request_tab(&mut strip, "A");
        strip.take_events();

        let layout = strip.layout();
        let x = (layout.add_button_rect().right + layout.menu_button_rect().left) / 2;
        assert!(!strip.handle_click(x, 2));
        assert_eq!(strip.take_events(), vec![TabStripEvent::CaptionDragRequested]);

        assert!(!strip.handle_click(x, 500));
        assert!(strip.take_events().is_empty());
    }

    #[test]
    fn hover_changes_request_one_repaint_each() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        request_tab(&mut strip, "A");
        strip.take_events();
        let (x, y) = centre(strip.layout().tab_rect(0));

        assert!(strip.handle_pointer_move(x, y));
        assert!(!strip.handle_pointer_move(x + 1, y));
        assert!(strip.handle_pointer_leave());
        assert_eq!(
            strip.take_events(),
            vec![TabStripEvent::RepaintRequested, TabStripEvent::RepaintRequested]
        );
    }

    #[test]
    fn closing_the_hovered_tab_refreshes_hover() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let a = request_tab(&mut strip, "A");
        let (x, y) = centre(strip.layout().tab_rect(0));
        strip.handle_pointer_move(x, y);
        assert_eq!(strip.hover_state(), HoverState::HoverTab(0));

        strip.close_tab(a);
        assert_ne!(strip.hover_state(), HoverState::HoverTab(0));
    }

    #[test]
    fn paint_draws_every_title() {
        let journal = Journal::default();
        let mut surface = RecordingSurface::new();
        let mut strip = strip_on(&mut surface, &journal);
        request_tab(&mut strip, "Users");
        request_tab(&mut strip, "Orders");

        strip.paint(&mut surface);
        let titles: Vec<String> = surface.texts().into_iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Users", "Orders"]);
    }

    #[test]
    fn rename_keeps_identity_and_content() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let a = request_tab(&mut strip, "A");
        strip.execute(StripCommand::RenameTab {
            tab: a,
            title: "Login".into(),
        });
        assert_eq!(strip.tabs().get(a).unwrap().title, "Login");
        assert!(!strip.rename_tab(TabId(99), "nope"));
    }

    /// Holds callbacks until the test decides to complete them.
    #[derive(Default)]
    struct DeferredExecutor {
        pending: Vec<(RequestSpec, Duration, CompletionCallback)>,
    }

    impl RequestExecutor for DeferredExecutor {
        fn send(&mut self, request: RequestSpec, timeout: Duration, on_complete: CompletionCallback) {
            self.pending.push((request, timeout, on_complete));
        }
    }

    type SentQueue = Rc<RefCell<Vec<(RequestSpec, CompletionCallback)>>>;

    /// Executor owned by the strip; the test keeps a handle to its queue.
    struct QueueExecutor(SentQueue);

    impl RequestExecutor for QueueExecutor {
        fn send(&mut self, request: RequestSpec, _timeout: Duration, on_complete: CompletionCallback) {
            self.0.borrow_mut().push((request, on_complete));
        }
    }

    fn response(status: u16) -> ResponseRecord {
        ResponseRecord {
            status,
            elapsed: Duration::from_millis(7),
            body: "{}".into(),
        }
    }

    #[test]
    fn send_button_click_dispatches_the_active_request() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let sent = SentQueue::default();
        strip.set_request_executor(Box::new(QueueExecutor(sent.clone())));
        request_tab(&mut strip, "Users");
        let tab = request_tab(&mut strip, "Orders");

        assert_eq!(strip.route_button(SPY_SEND), Some(StripCommand::SendRequest(tab)));
        assert!(strip.handle_button_click(SPY_SEND));
        assert_eq!(sent.borrow().len(), 1);
        let content = strip.tabs().get(tab).unwrap().content().as_request().unwrap();
        assert_eq!(content.status, SENDING_STATUS);

        let (_, callback) = sent.borrow_mut().pop().unwrap();
        callback(Ok(response(204)));
        assert_eq!(strip.drain_completions(), 1);
        let content = strip.tabs().get(tab).unwrap().content().as_request().unwrap();
        assert_eq!(content.history.len(), 1);
    }

    #[test]
    fn button_clicks_need_an_owning_panel_and_an_executor() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let tab = request_tab(&mut strip, "Users");
        let before = strip.tabs().get(tab).unwrap().content().clone();

        assert!(!strip.handle_button_click(ControlId(1)));
        // Routed, but nothing is installed to send it.
        assert!(strip.handle_button_click(SPY_SEND));
        assert_eq!(strip.tabs().get(tab).unwrap().content(), &before);

        strip.add_tab(
            "Settings",
            PanelGroupId::Settings,
            TabContent::default_for(PanelGroupId::Settings),
        );
        assert_eq!(strip.route_button(SPY_SEND), None);
    }

    #[test]
    fn completions_land_in_the_issuing_tab() {
        let journal = Journal::default();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let mut surface = RecordingSurface::new();
        let mut strip = TabStrip::new(
            TabStripConfig::default(),
            &mut surface,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
        strip
            .register_panel(SpyPanel::boxed(PanelGroupId::RequestEditor, &journal))
            .unwrap();

        let tab = strip.add_tab(
            "Users",
            PanelGroupId::RequestEditor,
            TabContent::Request(RequestContent::new(RequestSpec {
                url: "https://example.com/users".into(),
                ..RequestSpec::default()
            })),
        );
        let mut executor = DeferredExecutor::default();
        strip.dispatch_request(&mut executor, tab).unwrap();

        let content = strip.tabs().get(tab).unwrap().content().as_request().unwrap();
        assert_eq!(content.status, SENDING_STATUS);
        let (spec, timeout, callback) = executor.pending.pop().unwrap();
        assert_eq!(spec.url, "https://example.com/users");
        assert_eq!(timeout, Duration::from_secs(30));

        callback(Ok(response(200)));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(strip.drain_completions(), 1);

        let content = strip.tabs().get(tab).unwrap().content().as_request().unwrap();
        assert_eq!(content.history.len(), 1);
        assert_eq!(content.status, "HTTP 200 (7 ms, 2 bytes)");
        assert_eq!(journal.borrow().last().unwrap(), "RequestEditor.set_state");
    }

    #[test]
    fn completions_for_closed_tabs_are_discarded() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let keep = request_tab(&mut strip, "Keep");
        let gone = request_tab(&mut strip, "Gone");
        let mut executor = DeferredExecutor::default();
        strip.dispatch_request(&mut executor, gone).unwrap();
        strip.close_tab(gone);

        let (_, _, callback) = executor.pending.pop().unwrap();
        callback(Err(ExecutorError::Connection("refused".into())));
        assert_eq!(strip.drain_completions(), 0);
        assert_eq!(strip.tabs().len(), 1);
        assert!(strip.tabs().get(keep).is_some());
    }

    #[test]
    fn failures_become_status_text() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let tab = request_tab(&mut strip, "A");
        let mut executor = DeferredExecutor::default();
        strip.dispatch_request(&mut executor, tab).unwrap();

        let (_, _, callback) = executor.pending.pop().unwrap();
        callback(Err(ExecutorError::Timeout(Duration::from_secs(30))));
        strip.drain_completions();

        let content = strip.tabs().get(tab).unwrap().content().as_request().unwrap();
        assert_eq!(content.status, "Error: request timed out after 30s");
        assert!(content.history.is_empty());
    }

    #[test]
    fn settings_tab_overrides_the_default_timeout() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let tab = request_tab(&mut strip, "A");
        strip.add_tab(
            "Settings",
            PanelGroupId::Settings,
            TabContent::Settings(SettingsContent {
                settings: Settings {
                    request_timeout: Duration::from_secs(5),
                    ..Settings::default()
                },
            }),
        );
        let mut executor = DeferredExecutor::default();
        strip.dispatch_request(&mut executor, tab).unwrap();
        assert_eq!(executor.pending[0].1, Duration::from_secs(5));
    }

    #[test]
    fn dispatching_from_a_non_request_tab_fails() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let settings = strip.add_tab(
            "Settings",
            PanelGroupId::Settings,
            TabContent::default_for(PanelGroupId::Settings),
        );
        let mut executor = DeferredExecutor::default();
        assert!(matches!(
            strip.dispatch_request(&mut executor, settings),
            Err(ShellError::OperationFailed(_))
        ));
        assert!(matches!(
            strip.dispatch_request(&mut executor, TabId(42)),
            Err(ShellError::UnknownTab(TabId(42)))
        ));
        assert!(executor.pending.is_empty());
    }

    #[derive(Default)]
    struct MemoryStore {
        projects: HashMap<PathBuf, ProjectTree>,
        settings: HashMap<PathBuf, Settings>,
    }

    impl PersistenceStore for MemoryStore {
        fn load_project(&mut self, path: &Path) -> Result<ProjectTree, PersistenceError> {
            self.projects
                .get(path)
                .cloned()
                .ok_or_else(|| PersistenceError::NotFound(path.to_path_buf()))
        }
        fn save_project(&mut self, path: &Path, project: &ProjectTree) -> Result<(), PersistenceError> {
            self.projects.insert(path.to_path_buf(), project.clone());
            Ok(())
        }
        fn load_settings(&mut self, path: &Path) -> Result<Settings, PersistenceError> {
            self.settings
                .get(path)
                .cloned()
                .ok_or_else(|| PersistenceError::NotFound(path.to_path_buf()))
        }
        fn save_settings(&mut self, path: &Path, settings: &Settings) -> Result<(), PersistenceError> {
            self.settings.insert(path.to_path_buf(), settings.clone());
            Ok(())
        }
    }

    #[test]
    fn projects_round_trip_through_the_store() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let mut store = MemoryStore::default();
        let path = Path::new("shop.json");

        let tab = strip.add_tab(
            "shop",
            PanelGroupId::ProjectTree,
            TabContent::Project(ProjectContent::new(ProjectTree::new("shop"))),
        );
        strip.save_project(&mut store, tab, path).unwrap();
        assert!(store.projects.contains_key(path));

        // Already open: re-activated, not duplicated.
        request_tab(&mut strip, "other");
        assert_eq!(strip.load_project_tab(&mut store, path).unwrap(), tab);
        assert_eq!(strip.tabs().active(), Some(tab));
        assert_eq!(strip.tabs().len(), 2);

        strip.close_tab(tab);
        let reopened = strip.load_project_tab(&mut store, path).unwrap();
        assert_ne!(reopened, tab);
        assert_eq!(strip.tabs().get(reopened).unwrap().title, "shop");
    }

    #[test]
    fn missing_files_surface_as_persistence_errors() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let mut store = MemoryStore::default();
        let err = strip
            .load_project_tab(&mut store, Path::new("missing.json"))
            .unwrap_err();
        assert!(matches!(err, ShellError::Persistence(PersistenceError::NotFound(_))));
        assert!(strip.tabs().is_empty());
    }

    #[test]
    fn settings_load_into_the_open_settings_tab() {
        let journal = Journal::default();
        let mut strip = strip_with(&journal);
        let mut store = MemoryStore::default();
        let path = Path::new("settings.json");
        let stored = Settings {
            verify_tls: false,
            ..Settings::default()
        };
        store.settings.insert(path.to_path_buf(), stored.clone());

        let first = strip.load_settings_tab(&mut store, path).unwrap();
        request_tab(&mut strip, "A");
        let second = strip.load_settings_tab(&mut store, path).unwrap();
        assert_eq!(first, second);
        assert_eq!(strip.tabs().active(), Some(first));

        strip.save_settings(&mut store, first, Path::new("copy.json")).unwrap();
        assert_eq!(store.settings[Path::new("copy.json")], stored);
    }
}
