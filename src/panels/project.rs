/*
 * Project panel: an editable project name above a tree view showing the
 * project's outline.
 */

use super::controls::{Control, ControlFactory, hide_all, show_all};
use super::{Panel, stack_rows};
use crate::content::TabContent;
use crate::error::Result as ShellResult;
use crate::types::{PanelGroupId, Rect};

const PADDING: i32 = 8;
const ROW_HEIGHT: i32 = 24;

pub struct ProjectPanel {
    name: Box<dyn Control>,
    tree: Box<dyn Control>,
}

impl ProjectPanel {
    pub fn new(factory: &mut dyn ControlFactory) -> ShellResult<Self> {
        Ok(Self {
            name: factory.create_input("", false)?,
            tree: factory.create_tree_view()?,
        })
    }
}

impl Panel for ProjectPanel {
    fn panel_group(&self) -> PanelGroupId {
        PanelGroupId::ProjectTree
    }

    fn resize(&mut self, bounds: Rect) {
        let rows = stack_rows(bounds, PADDING, &[Some(ROW_HEIGHT), None]);
        self.name.move_to(rows[0]);
        self.tree.move_to(rows[1]);
    }

    fn show(&mut self) {
        show_all([&mut self.name, &mut self.tree]);
    }

    fn hide(&mut self) {
        hide_all([&mut self.name, &mut self.tree]);
    }

    fn save_state(&mut self, content: &mut TabContent) {
        let TabContent::Project(project) = content else {
            return;
        };
        let name = self.name.text();
        let name = name.trim();
        if !name.is_empty() && name != project.tree.name() {
            let root = project.tree.root();
            project.tree.rename(root, name);
        }
    }

    fn set_state(&mut self, content: &TabContent) {
        let Some(project) = content.as_project() else {
            return;
        };
        self.name.set_text(project.tree.name());
        self.tree.set_text(&project.tree.outline().join("\n"));
    }
}
