/*
 * Platform-agnostic styling primitives: colors, font descriptions and the
 * palette the tab strip paints with. The Windows backend converts these into
 * GDI objects; the core only ever passes them to a `ResourceFactory`.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `weight_percent` of `self` mixed with the remainder of `other`.
    /// Weights above 100 count as 100.
    pub fn blend(self, other: Color, weight_percent: u16) -> Color {
        let weight = weight_percent.min(100);
        let mix = |a: u8, b: u8| -> u8 {
            ((a as u16 * weight + b as u16 * (100 - weight)) / 100) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Adds `percent` of full white to every channel, saturating at 255.
    pub fn lighten(self, percent: u16) -> Color {
        let extra = (255u16 * percent) / 100;
        let up = |c: u8| -> u8 { (c as u16 + extra).min(255) as u8 };
        Color {
            r: up(self.r),
            g: up(self.g),
            b: up(self.b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontDescription {
    pub name: Option<String>,
    /// Point size; `None` lets the surface pick its default.
    pub size: Option<i32>,
    pub weight: Option<FontWeight>,
}

fn default_background() -> Color {
    Color::rgb(0x2E, 0x32, 0x39)
}
fn default_text() -> Color {
    Color::rgb(0xE0, 0xE5, 0xEC)
}

/// Colors the strip paints with.
///
/// Only `background` and `text_active` are chosen by the caller;
/// everything else is derived so all strips derive it the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStripPalette {
    pub background: Color,
    /// Fill of the active tab, matching the content area below the strip.
    pub active_fill: Color,
    pub text_active: Color,
    pub text_inactive: Color, // 40% text + 60% background
    pub hover_fill: Color,    // background + 6% white
    pub close_hover_fill: Color,
    pub glyph: Color,
    pub separator: Color,
}

impl TabStripPalette {
    pub fn new(background: Color, text: Color) -> Self {
        let text_inactive = text.blend(background, 40);
        let hover_fill = background.lighten(6);
        let active_fill = background.lighten(10);
        Self {
            background,
            active_fill,
            text_active: text,
            text_inactive,
            hover_fill,
            close_hover_fill: active_fill.lighten(8),
            glyph: text.blend(background, 70),
            separator: background.lighten(14),
        }
    }
}

impl Default for TabStripPalette {
    fn default() -> Self {
        Self::new(default_background(), default_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_derives_text_inactive_and_hover_fill() {
        let bg = Color::rgb(0x2E, 0x32, 0x39);
        let text = Color::rgb(0xE0, 0xE5, 0xEC);
        let palette = TabStripPalette::new(bg, text);

        // text_inactive = 40% text + 60% background
        assert_eq!(
            palette.text_inactive.r,
            ((0xE0u16 * 40 + 0x2Eu16 * 60) / 100) as u8
        );
        assert_eq!(
            palette.text_inactive.b,
            ((0xECu16 * 40 + 0x39u16 * 60) / 100) as u8
        );

        // hover_fill = background + 6% white (≈15 per channel)
        let extra = (255u16 * 6) / 100;
        assert_eq!(palette.hover_fill.g, (bg.g as u16 + extra).min(255) as u8);

        assert_eq!(palette.background, bg);
        assert_eq!(palette.text_active, text);
    }

    #[test]
    fn blend_weights_past_full_stay_on_the_first_color() {
        let a = Color::rgb(200, 10, 90);
        let b = Color::rgb(0, 255, 30);
        assert_eq!(a.blend(b, 120), a);
        assert_eq!(a.blend(b, 100), a);
        assert_eq!(a.blend(b, 0), b);
    }

    #[test]
    fn lighten_saturates_at_white() {
        let c = Color::rgb(250, 0, 128).lighten(10);
        assert_eq!(c, Color::rgb(255, 25, 153));
    }

    #[test]
    fn hover_and_close_hover_fills_are_distinct() {
        let palette = TabStripPalette::default();
        assert_ne!(palette.hover_fill, palette.close_hover_fill);
        assert_ne!(palette.background, palette.active_fill);
    }
}
