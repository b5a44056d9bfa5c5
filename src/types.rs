/*
 * Platform-agnostic types shared by the tab strip, the panel registry and the
 * host application: identities, integer geometry, the commands a host (or the
 * click routing table) can issue, and the events the strip reports back.
 *
 * Nothing here touches native handles, so hosts and tests on any platform can
 * drive the strip purely through these values.
 */

use crate::content::TabContent;

/// Identity of a tab. Assigned from a strictly increasing counter and never
/// reused within one `TabCollection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

/// Identity of one native control in the host window, as reported with the
/// control's notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub usize);

/// The kinds of panel group a tab can be bound to. Each group owns exactly one
/// `TabContent` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelGroupId {
    RequestEditor,
    ProjectTree,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in strip-client pixels. `contains` treats both edges
/// as inclusive, so on a shared edge the first rectangle tested wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Overlap of the open interiors; touching edges do not count.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Shrinks the rectangle by `dx`/`dy` on each side.
    pub const fn inset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right - dx, self.bottom - dy)
    }

    /// Clamps the right edge so the rectangle ends no later than `max_right`.
    pub fn clip_right(&self, max_right: i32) -> Rect {
        Rect::new(self.left, self.top, self.right.min(max_right), self.bottom)
    }
}

/*
 * Commands the strip understands. Clicks are translated into these through the
 * click routing table, and hosts can issue them directly, so behavior is
 * testable without constructing any native control.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum StripCommand {
    /// Adds a tab with the configured default title and panel group.
    AddDefaultTab,
    AddTab {
        title: String,
        content: TabContent,
    },
    CloseTab(TabId),
    ActivateTab(TabId),
    RenameTab {
        tab: TabId,
        title: String,
    },
    OpenMenu,
    /// Sends the request held by the tab through the installed executor.
    SendRequest(TabId),
    /// The pointer was pressed on free caption space; the host may start a
    /// window drag.
    BeginCaptionDrag,
}

/// Notifications the strip reports to its host. Drained with
/// `TabStrip::take_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStripEvent {
    TabActivated(TabId),
    /// The active tab was closed and no tab is left.
    TabsExhausted,
    TabClosed(TabId),
    MenuRequested,
    CaptionDragRequested,
    RepaintRequested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_inclusive_on_all_edges() {
        let r = Rect::new(10, 0, 20, 30);
        assert!(r.contains(10, 0));
        assert!(r.contains(20, 30));
        assert!(!r.contains(21, 15));
        assert!(!r.contains(15, -1));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9, 0, 20, 10)));
    }

    #[test]
    fn inset_and_clip_keep_origin_semantics() {
        let r = Rect::from_origin_size(4, 6, 100, 20);
        assert_eq!(r.inset(2, 3), Rect::new(6, 9, 102, 23));
        assert_eq!(r.clip_right(50), Rect::new(4, 6, 50, 26));
        assert_eq!(r.clip_right(500), r);
    }
}
