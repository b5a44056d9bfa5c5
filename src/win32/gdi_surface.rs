/*
 * GDI rendition of the drawing traits. `GdiObjects` owns every brush, pen and
 * font handed out by id and outlives individual paints; `GdiSurface` pairs it
 * with the HDC of one WM_PAINT. Objects still alive when `GdiObjects` drops
 * are deleted then.
 */

use crate::drawing::{BrushId, DrawingSurface, FontId, PenId, ResourceFactory, TextFormat};
use crate::error::{Result as ShellResult, ShellError};
use crate::styling_primitives::{Color, FontDescription, FontWeight};
use crate::types::{Point, Rect};

use std::collections::HashMap;

use windows::Win32::{
    Foundation::{COLORREF, RECT},
    Graphics::Gdi::{
        CreateFontIndirectW, CreatePen, CreateSolidBrush, DEFAULT_CHARSET, DEFAULT_GUI_FONT,
        DRAW_TEXT_FORMAT, DT_END_ELLIPSIS, DT_LEFT, DT_NOPREFIX, DT_SINGLELINE, DT_VCENTER,
        DeleteObject, DrawTextW, FW_BOLD, FW_NORMAL, FillRect, GetDC, GetDeviceCaps,
        GetStockObject, HBRUSH, HDC, HFONT, HGDIOBJ, HPEN, LOGFONTW, LOGPIXELSY, LineTo,
        MoveToEx, NULL_PEN, PS_SOLID, ReleaseDC, RoundRect, SelectObject, SetBkMode,
        SetTextColor, TRANSPARENT,
    },
    System::WindowsProgramming::MulDiv,
};
use windows::core::HSTRING;

const DEFAULT_FONT_NAME: &str = "Segoe UI";

pub(crate) fn color_to_colorref(color: &Color) -> COLORREF {
    COLORREF((color.r as u32) | ((color.g as u32) << 8) | ((color.b as u32) << 16))
}

fn to_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

#[derive(Debug, Default)]
pub struct GdiObjects {
    next_id: usize,
    brushes: HashMap<usize, HBRUSH>,
    pens: HashMap<usize, HPEN>,
    fonts: HashMap<usize, HFONT>,
}

impl GdiObjects {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn brush(&self, id: BrushId) -> Option<HBRUSH> {
        self.brushes.get(&id.0).copied()
    }

    fn pen(&self, id: PenId) -> Option<HPEN> {
        self.pens.get(&id.0).copied()
    }

    fn font(&self, id: FontId) -> Option<HFONT> {
        self.fonts.get(&id.0).copied()
    }
}

impl ResourceFactory for GdiObjects {
    fn create_solid_brush(&mut self, color: Color) -> ShellResult<BrushId> {
        let brush = unsafe { CreateSolidBrush(color_to_colorref(&color)) };
        if brush.is_invalid() {
            return Err(ShellError::ResourceCreation("solid brush"));
        }
        let id = self.next_id();
        self.brushes.insert(id, brush);
        Ok(BrushId(id))
    }

    fn create_pen(&mut self, color: Color, width: i32) -> ShellResult<PenId> {
        let pen = unsafe { CreatePen(PS_SOLID, width, color_to_colorref(&color)) };
        if pen.is_invalid() {
            return Err(ShellError::ResourceCreation("pen"));
        }
        let id = self.next_id();
        self.pens.insert(id, pen);
        Ok(PenId(id))
    }

    fn create_font(&mut self, font: &FontDescription) -> ShellResult<FontId> {
        let dpi = if font.size.is_some() { screen_dpi()? } else { 0 };
        let hfont = unsafe { CreateFontIndirectW(&logfont_for(font, dpi)) };
        if hfont.is_invalid() {
            return Err(ShellError::ResourceCreation("font"));
        }
        let id = self.next_id();
        self.fonts.insert(id, hfont);
        Ok(FontId(id))
    }

    fn delete_brush(&mut self, brush: BrushId) {
        if let Some(handle) = self.brushes.remove(&brush.0) {
            let _ = unsafe { DeleteObject(handle.into()) };
        }
    }

    fn delete_pen(&mut self, pen: PenId) {
        if let Some(handle) = self.pens.remove(&pen.0) {
            let _ = unsafe { DeleteObject(handle.into()) };
        }
    }

    fn delete_font(&mut self, font: FontId) {
        if let Some(handle) = self.fonts.remove(&font.0) {
            let _ = unsafe { DeleteObject(handle.into()) };
        }
    }
}

impl Drop for GdiObjects {
    fn drop(&mut self) {
        let leaked = self.brushes.len() + self.pens.len() + self.fonts.len();
        if leaked > 0 {
            log::debug!("[GdiSurface] deleting {leaked} objects still alive at teardown");
        }
        let handles: Vec<HGDIOBJ> = self
            .brushes
            .drain()
            .map(|(_, h)| h.into())
            .chain(self.pens.drain().map(|(_, h)| h.into()))
            .chain(self.fonts.drain().map(|(_, h)| h.into()))
            .collect();
        for handle in handles {
            let _ = unsafe { DeleteObject(handle) };
        }
    }
}

/// Vertical DPI of the screen, for point-to-pixel conversion.
fn screen_dpi() -> ShellResult<i32> {
    let hdc = unsafe { GetDC(None) };
    if hdc.is_invalid() {
        return Err(ShellError::OperationFailed(
            "could not acquire the screen DC to size a font".into(),
        ));
    }
    let dpi = unsafe { GetDeviceCaps(Some(hdc), LOGPIXELSY) };
    unsafe { ReleaseDC(None, hdc) };
    Ok(dpi)
}

/// Describes `font` for CreateFontIndirectW. Point sizes become negative
/// character heights at `dpi`, and the face name is cut to what LOGFONTW
/// holds. Unset fields keep the zero defaults (default precision, quality
/// and pitch).
fn logfont_for(font: &FontDescription, dpi: i32) -> LOGFONTW {
    let mut logfont = LOGFONTW {
        lfHeight: font.size.map_or(0, |pt| -unsafe { MulDiv(pt, dpi, 72) }),
        lfWeight: match font.weight {
            Some(FontWeight::Bold) => FW_BOLD.0 as i32,
            _ => FW_NORMAL.0 as i32,
        },
        lfCharSet: DEFAULT_CHARSET,
        ..Default::default()
    };
    let face = font.name.as_deref().unwrap_or(DEFAULT_FONT_NAME);
    let room = logfont.lfFaceName.len() - 1;
    for (slot, unit) in logfont.lfFaceName.iter_mut().zip(face.encode_utf16().take(room)) {
        *slot = unit;
    }
    logfont
}

fn text_flags(format: TextFormat) -> DRAW_TEXT_FORMAT {
    let mut flags = DT_NOPREFIX | DT_LEFT;
    if format.vertical_center {
        flags |= DT_VCENTER;
    }
    if format.single_line {
        flags |= DT_SINGLELINE;
    }
    if format.end_ellipsis {
        flags |= DT_END_ELLIPSIS;
    }
    flags
}

/// One paint's view of the device context.
pub struct GdiSurface<'a> {
    hdc: HDC,
    objects: &'a mut GdiObjects,
}

impl<'a> GdiSurface<'a> {
    pub fn new(hdc: HDC, objects: &'a mut GdiObjects) -> Self {
        unsafe { SetBkMode(hdc, TRANSPARENT) };
        Self { hdc, objects }
    }

    fn missing(what: &str, id: usize) {
        log::warn!("[GdiSurface] unknown {what} id {id}, skipping element");
    }
}

impl ResourceFactory for GdiSurface<'_> {
    fn create_solid_brush(&mut self, color: Color) -> ShellResult<BrushId> {
        self.objects.create_solid_brush(color)
    }

    fn create_pen(&mut self, color: Color, width: i32) -> ShellResult<PenId> {
        self.objects.create_pen(color, width)
    }

    fn create_font(&mut self, font: &FontDescription) -> ShellResult<FontId> {
        self.objects.create_font(font)
    }

    fn delete_brush(&mut self, brush: BrushId) {
        self.objects.delete_brush(brush);
    }

    fn delete_pen(&mut self, pen: PenId) {
        self.objects.delete_pen(pen);
    }

    fn delete_font(&mut self, font: FontId) {
        self.objects.delete_font(font);
    }
}

impl DrawingSurface for GdiSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, brush: BrushId) {
        let Some(handle) = self.objects.brush(brush) else {
            return Self::missing("brush", brush.0);
        };
        let _ = unsafe { FillRect(self.hdc, &to_rect(rect), handle) };
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: i32, brush: BrushId) {
        let Some(handle) = self.objects.brush(brush) else {
            return Self::missing("brush", brush.0);
        };
        unsafe {
            let old_brush = SelectObject(self.hdc, handle.into());
            let old_pen = SelectObject(self.hdc, GetStockObject(NULL_PEN));
            // A null pen leaves the right and bottom edges unpainted.
            let _ = RoundRect(
                self.hdc,
                rect.left,
                rect.top,
                rect.right + 1,
                rect.bottom + 1,
                radius * 2,
                radius * 2,
            );
            SelectObject(self.hdc, old_pen);
            SelectObject(self.hdc, old_brush);
        }
    }

    fn draw_line(&mut self, pen: PenId, from: Point, to: Point) {
        let Some(handle) = self.objects.pen(pen) else {
            return Self::missing("pen", pen.0);
        };
        unsafe {
            let old_pen = SelectObject(self.hdc, handle.into());
            let _ = MoveToEx(self.hdc, from.x, from.y, None);
            let _ = LineTo(self.hdc, to.x, to.y);
            SelectObject(self.hdc, old_pen);
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        rect: Rect,
        color: Color,
        font: Option<FontId>,
        format: TextFormat,
    ) {
        let font_obj: HGDIOBJ = match font.and_then(|f| self.objects.font(f)) {
            Some(hfont) => hfont.into(),
            None => unsafe { GetStockObject(DEFAULT_GUI_FONT) },
        };
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut bounds = to_rect(rect);
        unsafe {
            let old_font = SelectObject(self.hdc, font_obj);
            SetTextColor(self.hdc, color_to_colorref(&color));
            DrawTextW(self.hdc, &mut wide, &mut bounds, text_flags(format));
            SelectObject(self.hdc, old_font);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_is_bgr() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(color_to_colorref(&c).0, 0x0056_3412);
    }

    #[test]
    fn tab_titles_truncate_with_an_ellipsis() {
        let flags = text_flags(TextFormat::tab_title());
        assert_eq!(flags & DT_END_ELLIPSIS, DT_END_ELLIPSIS);
        assert_eq!(flags & DT_SINGLELINE, DT_SINGLELINE);
        assert_eq!(flags & DT_NOPREFIX, DT_NOPREFIX);
    }

    #[test]
    fn logfont_sizes_in_points_and_truncates_the_face_name() {
        let bold = FontDescription {
            name: Some("A".repeat(40)),
            size: Some(9),
            weight: Some(FontWeight::Bold),
        };
        let logfont = logfont_for(&bold, 96);
        assert_eq!(logfont.lfHeight, -12);
        assert_eq!(logfont.lfWeight, FW_BOLD.0 as i32);
        assert_eq!(logfont.lfFaceName[30], 'A' as u16);
        assert_eq!(logfont.lfFaceName[31], 0);

        let default = logfont_for(&FontDescription::default(), 0);
        assert_eq!(logfont.lfCharSet, DEFAULT_CHARSET);
        assert_eq!(default.lfHeight, 0);
        let face: Vec<u16> = DEFAULT_FONT_NAME.encode_utf16().collect();
        assert_eq!(&default.lfFaceName[..face.len()], face.as_slice());
    }

    #[test]
    fn gdi_objects_hand_out_and_release_brushes() {
        let mut objects = GdiObjects::new();
        let brush = objects.create_solid_brush(Color::rgb(1, 2, 3)).unwrap();
        assert!(objects.brush(brush).is_some());
        objects.delete_brush(brush);
        assert!(objects.brush(brush).is_none());
    }
}
