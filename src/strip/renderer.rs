/*
 * Immediate-mode renderer for the tab strip. Each paint reads the current
 * layout, collection and hover state and draws, in order: the background, the
 * tabs (fill, title, close glyph), the add glyph, the menu glyph, and the
 * bottom separator with a gap under the active tab.
 *
 * Painting is idempotent: the same inputs always produce the same calls, so
 * repaints can be requested conservatively. Long-lived objects (font,
 * background and active brushes, separator and glyph pens) are created once in
 * `StripResources`; hover highlights use scoped brushes released before the
 * element's draw returns. A missing object skips its element for the frame.
 */

use super::collection::TabCollection;
use super::geometry::StripLayout;
use super::hover::HoverState;
use crate::config::TabStripMetrics;
use crate::drawing::{
    BrushId, DrawingSurface, FontId, PenId, ResourceFactory, TextFormat, with_scoped_brush,
};
use crate::styling_primitives::{Color, FontDescription, TabStripPalette};
use crate::types::{Point, Rect};

/// Drawing objects owned for the lifetime of a strip.
#[derive(Debug, Default)]
pub struct StripResources {
    font: Option<FontId>,
    background: Option<BrushId>,
    active_fill: Option<BrushId>,
    separator: Option<PenId>,
    glyph: Option<PenId>,
}

impl StripResources {
    /// Creates every shared object. Failures are logged and leave that slot
    /// empty; painting then skips or falls back for the affected element.
    pub fn create(
        factory: &mut dyn ResourceFactory,
        palette: &TabStripPalette,
        metrics: &TabStripMetrics,
        font: Option<&FontDescription>,
    ) -> Self {
        fn keep<T>(what: &str, result: crate::error::Result<T>) -> Option<T> {
            result
                .map_err(|e| log::warn!("[TabStrip] could not create {what}: {e}"))
                .ok()
        }
        Self {
            font: font.and_then(|f| keep("font", factory.create_font(f))),
            background: keep("background brush", factory.create_solid_brush(palette.background)),
            active_fill: keep("active brush", factory.create_solid_brush(palette.active_fill)),
            separator: keep(
                "separator pen",
                factory.create_pen(palette.separator, metrics.separator_width),
            ),
            glyph: keep("glyph pen", factory.create_pen(palette.glyph, 1)),
        }
    }

    pub fn release(&mut self, factory: &mut dyn ResourceFactory) {
        if let Some(font) = self.font.take() {
            factory.delete_font(font);
        }
        for brush in [self.background.take(), self.active_fill.take()].into_iter().flatten() {
            factory.delete_brush(brush);
        }
        for pen in [self.separator.take(), self.glyph.take()].into_iter().flatten() {
            factory.delete_pen(pen);
        }
    }
}

/// Everything one paint reads.
pub struct StripView<'a> {
    pub layout: &'a StripLayout,
    pub tabs: &'a TabCollection,
    pub hover: HoverState,
    pub palette: &'a TabStripPalette,
    pub metrics: &'a TabStripMetrics,
    pub resources: &'a StripResources,
}

pub fn paint<S: DrawingSurface + ?Sized>(surface: &mut S, view: &StripView<'_>) {
    let layout = view.layout;
    if layout.strip_width() <= 0 {
        return;
    }

    fill(
        surface,
        view.resources.background,
        view.palette.background,
        layout.strip_rect(),
        None,
    );

    let clip = layout.tab_clip_right();
    let active_index = view.tabs.active_index();
    let mut active_span: Option<Rect> = None;

    for (index, tab) in view.tabs.iter().enumerate() {
        let full = layout.tab_rect(index);
        if full.left >= clip {
            break;
        }
        let rect = full.clip_right(clip);
        let is_active = active_index == Some(index);
        let is_hovered = view.hover.hovered_tab() == Some(index);

        if is_active {
            active_span = Some(rect);
            fill_tab_shape(surface, view, rect, view.resources.active_fill, view.palette.active_fill);
        } else if is_hovered {
            fill_tab_shape(surface, view, rect, None, view.palette.hover_fill);
        }

        let close = layout.close_rect(full);
        let show_close = (is_active || is_hovered) && close.right <= clip;

        let text_right = if show_close {
            close.left - view.metrics.text_padding / 2
        } else {
            rect.right - view.metrics.text_padding
        };
        let text_rect = Rect::new(rect.left + view.metrics.text_padding, rect.top, text_right, rect.bottom);
        if !text_rect.is_empty() {
            let color = if is_active || is_hovered {
                view.palette.text_active
            } else {
                view.palette.text_inactive
            };
            surface.draw_text(&tab.title, text_rect, color, view.resources.font, TextFormat::tab_title());
        }

        if show_close {
            if is_hovered && view.hover.close_hovered() {
                with_scoped_brush(surface, view.palette.close_hover_fill, |s, brush| {
                    s.fill_round_rect(close, view.metrics.corner_radius / 2, brush);
                });
            }
            draw_cross(surface, view.resources.glyph, close.inset(4, 4));
        }
    }

    let add = layout.add_button_rect();
    if add.right <= clip {
        if view.hover.add_hovered() {
            with_scoped_brush(surface, view.palette.hover_fill, |s, brush| {
                s.fill_round_rect(add, view.metrics.corner_radius, brush);
            });
        }
        draw_plus(surface, view.resources.glyph, add.inset(7, 7));
    }

    let menu = layout.menu_button_rect();
    if view.hover.menu_hovered() {
        with_scoped_brush(surface, view.palette.hover_fill, |s, brush| {
            s.fill_rect(menu, brush);
        });
    }
    draw_menu_bars(surface, view.resources.glyph, menu);

    draw_separator(surface, view, active_span);
}

/// Fills a tab with rounded top corners and square bottom corners, so the
/// active tab joins the content area below it.
fn fill_tab_shape<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    view: &StripView<'_>,
    rect: Rect,
    shared: Option<BrushId>,
    color: Color,
) {
    let radius = view.metrics.corner_radius;
    fill(surface, shared, color, rect, Some(radius));
    let square_bottom = Rect::new(rect.left, (rect.bottom - radius).max(rect.top), rect.right, rect.bottom);
    fill(surface, shared, color, square_bottom, None);
}

/// Fills with the shared brush when there is one, otherwise with a scoped
/// brush of the same color.
fn fill<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    shared: Option<BrushId>,
    color: Color,
    rect: Rect,
    radius: Option<i32>,
) {
    let draw = |s: &mut S, brush: BrushId| match radius {
        Some(r) => s.fill_round_rect(rect, r, brush),
        None => s.fill_rect(rect, brush),
    };
    match shared {
        Some(brush) => draw(surface, brush),
        None => {
            with_scoped_brush(surface, color, draw);
        }
    }
}

fn draw_cross<S: DrawingSurface + ?Sized>(surface: &mut S, pen: Option<PenId>, r: Rect) {
    let Some(pen) = pen else { return };
    surface.draw_line(pen, Point::new(r.left, r.top), Point::new(r.right, r.bottom));
    surface.draw_line(pen, Point::new(r.left, r.bottom), Point::new(r.right, r.top));
}

fn draw_plus<S: DrawingSurface + ?Sized>(surface: &mut S, pen: Option<PenId>, r: Rect) {
    let Some(pen) = pen else { return };
    let cx = (r.left + r.right) / 2;
    let cy = (r.top + r.bottom) / 2;
    surface.draw_line(pen, Point::new(r.left, cy), Point::new(r.right, cy));
    surface.draw_line(pen, Point::new(cx, r.top), Point::new(cx, r.bottom));
}

fn draw_menu_bars<S: DrawingSurface + ?Sized>(surface: &mut S, pen: Option<PenId>, menu: Rect) {
    let Some(pen) = pen else { return };
    let cx = (menu.left + menu.right) / 2;
    let cy = (menu.top + menu.bottom) / 2;
    for dy in [-5, 0, 5] {
        surface.draw_line(pen, Point::new(cx - 7, cy + dy), Point::new(cx + 7, cy + dy));
    }
}

fn draw_separator<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    view: &StripView<'_>,
    active_span: Option<Rect>,
) {
    let Some(pen) = view.resources.separator else {
        return;
    };
    let y = view.layout.strip_height() - 1;
    let width = view.layout.strip_width();
    match active_span {
        Some(span) => {
            if span.left > 0 {
                surface.draw_line(pen, Point::new(0, y), Point::new(span.left, y));
            }
            if span.right < width {
                surface.draw_line(pen, Point::new(span.right, y), Point::new(width, y));
            }
        }
        None => surface.draw_line(pen, Point::new(0, y), Point::new(width, y)),
    }
}
