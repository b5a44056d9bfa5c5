/*
 * Geometry engine for the caption tab strip. Everything here is a pure
 * function of (metrics, tab count, strip width): the layout is recomputed for
 * every paint and every hit test, and is never cached across a resize or a
 * change in tab count.
 *
 * Tabs share one uniform width:
 *   tab_width = clamp((available - (n - 1) * gap) / n, min, max)
 * where `available` is the strip width minus the left padding and the space
 * reserved for the add and menu buttons. When even `min` does not fit, tabs
 * keep `min` and run past the reserved area; the renderer clips them.
 */

use crate::config::TabStripMetrics;
use crate::types::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripLayout {
    strip_width: i32,
    strip_height: i32,
    tab_count: usize,
    tab_width: i32,
    tab_top: i32,
    left_padding: i32,
    tab_gap: i32,
    close_size: i32,
    close_inner_padding: i32,
    add_button: Rect,
    menu_button: Rect,
}

/// Width left for tabs once the padding and both buttons are reserved.
pub fn available_tab_width(metrics: &TabStripMetrics, strip_width: i32) -> i32 {
    let reserved = metrics.left_padding
        + metrics.add_button_offset
        + metrics.add_button_size
        + metrics.trailing_gap
        + metrics.menu_button_width;
    (strip_width - reserved).max(0)
}

/// The uniform tab width for `tab_count` tabs. Zero tabs yield `max_width`
/// so callers never divide by zero.
pub fn tab_width(metrics: &TabStripMetrics, tab_count: usize, strip_width: i32) -> i32 {
    if tab_count == 0 {
        return metrics.tab_max_width;
    }
    let n = tab_count as i64;
    let available = available_tab_width(metrics, strip_width) as i64;
    let raw = (available - (n - 1) * metrics.tab_gap as i64) / n;
    raw.clamp(metrics.tab_min_width as i64, metrics.tab_max_width as i64) as i32
}

impl StripLayout {
    pub fn compute(metrics: &TabStripMetrics, tab_count: usize, strip_width: i32) -> Self {
        let strip_width = strip_width.max(0);
        let width = tab_width(metrics, tab_count, strip_width);

        let tabs_right = if tab_count == 0 {
            metrics.left_padding
        } else {
            let n = tab_count as i32;
            metrics.left_padding + n * width + (n - 1) * metrics.tab_gap
        };

        let add_left = tabs_right + metrics.add_button_offset;
        let add_top = metrics.tab_top + (metrics.strip_height - metrics.tab_top - metrics.add_button_size) / 2;
        let add_button = Rect::from_origin_size(
            add_left,
            add_top,
            metrics.add_button_size,
            metrics.add_button_size,
        );

        let menu_button = Rect::new(
            (strip_width - metrics.menu_button_width).max(0),
            0,
            strip_width,
            metrics.strip_height,
        );

        Self {
            strip_width,
            strip_height: metrics.strip_height,
            tab_count,
            tab_width: width,
            tab_top: metrics.tab_top,
            left_padding: metrics.left_padding,
            tab_gap: metrics.tab_gap,
            close_size: metrics.close_size,
            close_inner_padding: metrics.close_inner_padding,
            add_button,
            menu_button,
        }
    }

    pub fn strip_width(&self) -> i32 {
        self.strip_width
    }

    pub fn strip_height(&self) -> i32 {
        self.strip_height
    }

    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    pub fn tab_width(&self) -> i32 {
        self.tab_width
    }

    pub fn strip_rect(&self) -> Rect {
        Rect::new(0, 0, self.strip_width, self.strip_height)
    }

    /// Rectangle of tab `index`. Indices past `tab_count` are still laid out
    /// on the same grid; callers bound them.
    pub fn tab_rect(&self, index: usize) -> Rect {
        let left = self.left_padding + index as i32 * (self.tab_width + self.tab_gap);
        Rect::new(left, self.tab_top, left + self.tab_width, self.strip_height)
    }

    pub fn tab_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..self.tab_count).map(|i| self.tab_rect(i))
    }

    /// The close glyph: vertically centered, right-aligned with the inner
    /// padding.
    pub fn close_rect(&self, tab: Rect) -> Rect {
        let right = tab.right - self.close_inner_padding;
        let top = tab.top + (tab.height() - self.close_size) / 2;
        Rect::new(right - self.close_size, top, right, top + self.close_size)
    }

    pub fn add_button_rect(&self) -> Rect {
        self.add_button
    }

    pub fn menu_button_rect(&self) -> Rect {
        self.menu_button
    }

    /// Right edge tabs are clipped to when painting, so overflow never draws
    /// over the menu button.
    pub fn tab_clip_right(&self) -> i32 {
        self.menu_button.left
    }
}
