/*
 * The drawing contract the renderer paints through. A `ResourceFactory`
 * creates and destroys brushes, pens and fonts; a `DrawingSurface` draws with
 * them. Handles are opaque integers whose meaning belongs to the backend (the
 * GDI backend stores the raw object handle).
 *
 * Transient objects go through `with_scoped_brush`, which releases the brush
 * after the drawing closure returns no matter how the closure exits.
 */

use crate::error::Result as ShellResult;
use crate::styling_primitives::{Color, FontDescription};
use crate::types::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub usize);

/// Text is always left aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    pub vertical_center: bool,
    pub single_line: bool,
    /// Truncate with a trailing ellipsis when the text does not fit.
    pub end_ellipsis: bool,
}

impl TextFormat {
    /// Single line, left aligned, vertically centered, ellipsis-truncated.
    pub const fn tab_title() -> Self {
        Self {
            vertical_center: true,
            single_line: true,
            end_ellipsis: true,
        }
    }
}

pub trait ResourceFactory {
    fn create_solid_brush(&mut self, color: Color) -> ShellResult<BrushId>;
    fn create_pen(&mut self, color: Color, width: i32) -> ShellResult<PenId>;
    fn create_font(&mut self, font: &FontDescription) -> ShellResult<FontId>;
    fn delete_brush(&mut self, brush: BrushId);
    fn delete_pen(&mut self, pen: PenId);
    fn delete_font(&mut self, font: FontId);
}

pub trait DrawingSurface: ResourceFactory {
    fn fill_rect(&mut self, rect: Rect, brush: BrushId);
    fn fill_round_rect(&mut self, rect: Rect, radius: i32, brush: BrushId);
    fn draw_line(&mut self, pen: PenId, from: Point, to: Point);
    /// Draws `text` inside `rect`. `font: None` means the surface default.
    fn draw_text(
        &mut self,
        text: &str,
        rect: Rect,
        color: Color,
        font: Option<FontId>,
        format: TextFormat,
    );
}

/// Creates a brush for the duration of `draw` and deletes it afterwards.
/// Returns `false` (and draws nothing) when the brush cannot be created.
pub fn with_scoped_brush<S, F>(surface: &mut S, color: Color, draw: F) -> bool
where
    S: DrawingSurface + ?Sized,
    F: FnOnce(&mut S, BrushId),
{
    match surface.create_solid_brush(color) {
        Ok(brush) => {
            draw(surface, brush);
            surface.delete_brush(brush);
            true
        }
        Err(e) => {
            log::warn!("[Drawing] transient brush unavailable, skipping element: {e}");
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingSurface;
    use super::*;

    #[test]
    fn scoped_brush_is_released_after_drawing() {
        let mut surface = RecordingSurface::new();
        let drawn = with_scoped_brush(&mut surface, Color::rgb(1, 2, 3), |s, brush| {
            s.fill_rect(Rect::new(0, 0, 4, 4), brush);
        });
        assert!(drawn);
        assert_eq!(surface.live_objects(), 0);
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn scoped_brush_skips_drawing_when_creation_fails() {
        let mut surface = RecordingSurface::new();
        surface.brush_budget = Some(0);
        let drawn = with_scoped_brush(&mut surface, Color::rgb(1, 2, 3), |_, _| {
            panic!("draw closure must not run without a brush");
        });
        assert!(!drawn);
        assert!(surface.ops.is_empty());
    }
}
