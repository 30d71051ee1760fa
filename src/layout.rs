//! Status panel layout arithmetic

/// Integer rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The four panels of the status UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiLayout {
    pub header: LayoutRect,
    pub visualization: LayoutRect,
    pub encoder: LayoutRect,
    pub secondary: LayoutRect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiLayoutParams {
    pub width: i32,
    pub height: i32,
    pub header_height: i32,
    /// Share of the height below the header given to the visualization
    pub visualization_ratio: f32,
    /// Share of the width given to the encoder panel
    pub encoder_ratio: f32,
}

/// Split the canvas into header, visualization, encoder and secondary panels.
///
/// The header spans the top; the visualization takes `visualization_ratio` of
/// what remains; the bottom strip is split into encoder (left) and secondary
/// (right). Sizes truncate toward zero and never go negative.
pub fn compute_ui_layout(params: UiLayoutParams) -> UiLayout {
    let body_height = (params.height - params.header_height).max(0);
    let visualization_height = (body_height as f32 * params.visualization_ratio) as i32;
    let bottom_height = (body_height - visualization_height).max(0);
    let encoder_width = (params.width as f32 * params.encoder_ratio) as i32;
    let secondary_width = (params.width - encoder_width).max(0);
    let bottom_y = params.header_height + visualization_height;

    UiLayout {
        header: LayoutRect {
            x: 0,
            y: 0,
            width: params.width,
            height: params.header_height,
        },
        visualization: LayoutRect {
            x: 0,
            y: params.header_height,
            width: params.width,
            height: visualization_height,
        },
        encoder: LayoutRect {
            x: 0,
            y: bottom_y,
            width: encoder_width,
            height: bottom_height,
        },
        secondary: LayoutRect {
            x: encoder_width,
            y: bottom_y,
            width: secondary_width,
            height: bottom_height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_header_visualization_encoder_and_secondary() {
        let width = 1000;
        let height = 600;
        let header_height = 60;
        let body = height - header_height;
        let expected_vis = (body as f32 * 0.55) as i32;
        let expected_encoder_width = (width as f32 * 0.3) as i32;

        let layout = compute_ui_layout(UiLayoutParams {
            width,
            height,
            header_height,
            visualization_ratio: 0.55,
            encoder_ratio: 0.3,
        });

        assert_eq!(
            layout.header,
            LayoutRect {
                x: 0,
                y: 0,
                width,
                height: header_height,
            }
        );

        assert_eq!(layout.visualization.y, header_height);
        assert_eq!(layout.visualization.width, width);
        assert_eq!(layout.visualization.height, expected_vis);

        assert_eq!(layout.encoder.x, 0);
        assert_eq!(layout.encoder.y, header_height + expected_vis);
        assert_eq!(layout.encoder.width, expected_encoder_width);
        assert_eq!(layout.encoder.height, body - expected_vis);

        assert_eq!(layout.secondary.x, layout.encoder.width);
        assert_eq!(layout.secondary.y, layout.encoder.y);
        assert_eq!(layout.secondary.width, width - expected_encoder_width);
        assert_eq!(layout.secondary.height, layout.encoder.height);
    }

    #[test]
    fn test_header_taller_than_canvas() {
        let layout = compute_ui_layout(UiLayoutParams {
            width: 100,
            height: 40,
            header_height: 60,
            visualization_ratio: 0.5,
            encoder_ratio: 0.5,
        });
        assert_eq!(layout.visualization.height, 0);
        assert_eq!(layout.encoder.height, 0);
        assert_eq!(layout.secondary.height, 0);
    }

    #[test]
    fn test_ratio_above_one_clamps_remainders() {
        let layout = compute_ui_layout(UiLayoutParams {
            width: 100,
            height: 100,
            header_height: 0,
            visualization_ratio: 1.0,
            encoder_ratio: 1.5,
        });
        assert_eq!(layout.visualization.height, 100);
        assert_eq!(layout.encoder.height, 0);
        assert_eq!(layout.secondary.width, 0);
    }
}
