//! UI theme constants

use crate::layout::{LayoutRect, UiLayoutParams};

/// Window, panel and colour settings for the status UI.
///
/// Colours are ARGB. `background` fills the header, `panel` the panel lines
/// and `border` the rules between them.
#[derive(Debug, Clone, PartialEq)]
pub struct UiTheme {
    pub window_width: i32,
    pub window_height: i32,
    pub header_height: i32,
    pub padding: i32,
    pub visualization_ratio: f32,
    pub encoder_ratio: f32,
    /// Pixel size of one terminal cell (width, height)
    pub cell_size: (i32, i32),
    pub background: u32,
    pub panel: u32,
    pub border: u32,
    pub text: u32,
    pub accent_blue: u32,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            window_width: 720,
            window_height: 420,
            header_height: 60,
            padding: 16,
            visualization_ratio: 0.55,
            encoder_ratio: 0.3,
            cell_size: (8, 16),
            background: 0xff20_2020,
            panel: 0xff24_2424,
            border: 0xff30_3030,
            text: 0xffe6_e6e6,
            accent_blue: 0xff50_78ff,
        }
    }
}

impl UiTheme {
    /// Layout parameters for a canvas of the given size
    pub fn layout_params(&self, width: i32, height: i32) -> UiLayoutParams {
        UiLayoutParams {
            width,
            height,
            header_height: self.header_height,
            visualization_ratio: self.visualization_ratio,
            encoder_ratio: self.encoder_ratio,
        }
    }

    /// Text columns that fit inside `rect` after padding
    pub fn text_columns(&self, rect: &LayoutRect) -> usize {
        let inner = (rect.width - 2 * self.padding).max(0);
        (inner / self.cell_size.0.max(1)) as usize
    }
}

/// Split an ARGB colour into its RGB components
pub fn rgb(argb: u32) -> (u8, u8, u8) {
    (
        ((argb >> 16) & 0xFF) as u8,
        ((argb >> 8) & 0xFF) as u8,
        (argb & 0xFF) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_ui_layout;

    #[test]
    fn test_rgb_drops_alpha() {
        assert_eq!(rgb(0xff50_78ff), (0x50, 0x78, 0xff));
        assert_eq!(rgb(0x6600_0000), (0, 0, 0));
    }

    #[test]
    fn test_default_window_layout() {
        let theme = UiTheme::default();
        let layout = compute_ui_layout(theme.layout_params(theme.window_width, theme.window_height));
        assert_eq!(layout.header.height, 60);
        assert_eq!(layout.encoder.width, 216);
        assert_eq!(layout.secondary.width, 504);
        // 504 px minus 2 * 16 px padding at 8 px per cell
        assert_eq!(theme.text_columns(&layout.secondary), 59);
    }
}
