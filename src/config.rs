/*
 * Construction-time configuration for a `TabStrip`: the fixed layout constants
 * the geometry engine works from, the palette, the tab font, and the defaults
 * used when the user presses the add button or sends a request.
 *
 * Configuration is validated once in `TabStrip::new`; nothing re-reads it from
 * disk afterwards.
 */

use crate::error::{Result as ShellResult, ShellError};
use crate::styling_primitives::{FontDescription, TabStripPalette};
use crate::types::PanelGroupId;

use std::time::Duration;

/// Fixed layout constants, in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStripMetrics {
    pub strip_height: i32,
    /// Free caption space above the tabs, usable for dragging the window.
    pub tab_top: i32,
    pub left_padding: i32,
    pub tab_gap: i32,
    pub tab_min_width: i32,
    pub tab_max_width: i32,
    pub text_padding: i32,
    pub close_size: i32,
    pub close_inner_padding: i32,
    pub add_button_size: i32,
    pub add_button_offset: i32,
    pub menu_button_width: i32,
    /// Minimum space kept between the add button and the menu button.
    pub trailing_gap: i32,
    pub corner_radius: i32,
    pub separator_width: i32,
}

impl Default for TabStripMetrics {
    fn default() -> Self {
        Self {
            strip_height: 36,
            tab_top: 6,
            left_padding: 8,
            tab_gap: 2,
            tab_min_width: 80,
            tab_max_width: 220,
            text_padding: 10,
            close_size: 16,
            close_inner_padding: 8,
            add_button_size: 26,
            add_button_offset: 6,
            menu_button_width: 46,
            trailing_gap: 8,
            corner_radius: 6,
            separator_width: 1,
        }
    }
}

impl TabStripMetrics {
    pub fn validate(&self) -> ShellResult<()> {
        if self.strip_height <= 0 {
            return Err(ShellError::InvalidConfig(format!(
                "strip_height must be positive, got {}",
                self.strip_height
            )));
        }
        if self.tab_top < 0 || self.tab_top >= self.strip_height {
            return Err(ShellError::InvalidConfig(format!(
                "tab_top {} must lie inside the strip height {}",
                self.tab_top, self.strip_height
            )));
        }
        if self.tab_min_width <= 0 || self.tab_min_width > self.tab_max_width {
            return Err(ShellError::InvalidConfig(format!(
                "tab width range {}..={} is empty",
                self.tab_min_width, self.tab_max_width
            )));
        }
        if self.close_size + 2 * self.close_inner_padding > self.tab_min_width {
            return Err(ShellError::InvalidConfig(format!(
                "close glyph ({} + 2x{}) does not fit a {}px tab",
                self.close_size, self.close_inner_padding, self.tab_min_width
            )));
        }
        if self.close_size > self.strip_height - self.tab_top {
            return Err(ShellError::InvalidConfig(format!(
                "close glyph {} is taller than a tab",
                self.close_size
            )));
        }
        if [
            self.left_padding,
            self.tab_gap,
            self.add_button_size,
            self.add_button_offset,
            self.menu_button_width,
            self.trailing_gap,
        ]
        .iter()
        .any(|v| *v < 0)
        {
            return Err(ShellError::InvalidConfig(
                "paddings, gaps and button sizes must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TabStripConfig {
    pub metrics: TabStripMetrics,
    pub palette: TabStripPalette,
    /// Tab title font; `None` uses the surface's default GUI font.
    pub font: Option<FontDescription>,
    pub default_title: String,
    pub default_panel_group: PanelGroupId,
    pub request_timeout: Duration,
    /// Maximum number of responses kept per request tab.
    pub history_limit: usize,
}

impl Default for TabStripConfig {
    fn default() -> Self {
        Self {
            metrics: TabStripMetrics::default(),
            palette: TabStripPalette::default(),
            font: None,
            default_title: "New Request".to_string(),
            default_panel_group: PanelGroupId::RequestEditor,
            request_timeout: Duration::from_secs(30),
            history_limit: 20,
        }
    }
}

impl TabStripConfig {
    pub fn validate(&self) -> ShellResult<()> {
        self.metrics.validate()?;
        if self.history_limit == 0 {
            return Err(ShellError::InvalidConfig(
                "history_limit must keep at least one response".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TabStripConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_width_range_is_rejected() {
        let metrics = TabStripMetrics {
            tab_min_width: 300,
            tab_max_width: 200,
            ..TabStripMetrics::default()
        };
        assert!(matches!(
            metrics.validate(),
            Err(ShellError::InvalidConfig(_))
        ));
    }

    #[test]
    fn close_glyph_must_fit_the_narrowest_tab() {
        let metrics = TabStripMetrics {
            tab_min_width: 20,
            ..TabStripMetrics::default()
        };
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let config = TabStripConfig {
            history_limit: 0,
            ..TabStripConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
