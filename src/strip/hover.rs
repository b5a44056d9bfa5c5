/*
 * Hover state machine for the strip. The state is derived from the last
 * pointer position and only exists to drive painting; every method reports
 * whether the visible state changed so the caller requests exactly one
 * repaint per change and none for a reclassification into the same state.
 */

use super::geometry::StripLayout;
use super::hit_test::{HitTarget, hit_test};
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    HoverTab(usize),
    HoverTabClose(usize),
    HoverAdd,
    HoverMenu,
}

impl HoverState {
    fn from_hit(hit: HitTarget) -> Self {
        match hit {
            HitTarget::Tab(i) => HoverState::HoverTab(i),
            HitTarget::CloseButton(i) => HoverState::HoverTabClose(i),
            HitTarget::AddButton => HoverState::HoverAdd,
            HitTarget::MenuButton => HoverState::HoverMenu,
            HitTarget::Caption | HitTarget::None => HoverState::Idle,
        }
    }

    /// The hovered tab, including when its close glyph is hovered.
    pub fn hovered_tab(self) -> Option<usize> {
        match self {
            HoverState::HoverTab(i) | HoverState::HoverTabClose(i) => Some(i),
            _ => None,
        }
    }

    pub fn close_hovered(self) -> bool {
        matches!(self, HoverState::HoverTabClose(_))
    }

    pub fn add_hovered(self) -> bool {
        self == HoverState::HoverAdd
    }

    pub fn menu_hovered(self) -> bool {
        self == HoverState::HoverMenu
    }
}

#[derive(Debug, Default)]
pub struct HoverTracker {
    state: HoverState,
    last_pointer: Option<Point>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Re-classifies the pointer. A pointer below the strip forces `Idle`,
    /// since moving into the content area may not produce a leave event.
    pub fn pointer_moved(&mut self, layout: &StripLayout, x: i32, y: i32) -> bool {
        self.last_pointer = Some(Point::new(x, y));
        let next = if y > layout.strip_height() {
            HoverState::Idle
        } else {
            HoverState::from_hit(hit_test(layout, x, y))
        };
        self.transition(next)
    }

    pub fn pointer_left(&mut self) -> bool {
        self.last_pointer = None;
        self.transition(HoverState::Idle)
    }

    /// Re-evaluates the last known pointer against a new layout, e.g. after
    /// a tab under the pointer was closed.
    pub fn refresh(&mut self, layout: &StripLayout) -> bool {
        match self.last_pointer {
            Some(p) => self.pointer_moved(layout, p.x, p.y),
            None => self.transition(HoverState::Idle),
        }
    }

    fn transition(&mut self, next: HoverState) -> bool {
        if next == self.state {
            return false;
        }
        log::trace!("[TabStrip] hover {:?} -> {next:?}", self.state);
        self.state = next;
        true
    }
}
