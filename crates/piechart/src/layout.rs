use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

/// Offset of the drop shadow below the pie, and its horizontal inset.
const SHADOW_INSET: f64 = 10.0;
const SHADOW_DEPTH: f64 = 20.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    /// Label to the left of the pie, right-aligned against it.
    #[default]
    #[strum(serialize = "Left", serialize = "l", serialize = "0")]
    Left,
    /// Label to the right of the pie, left-aligned against it.
    #[strum(serialize = "Right", serialize = "r", serialize = "1")]
    Right,
}

/// Horizontal anchoring of the label text at `text_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub show_text: bool,
    pub text_position: TextPosition,
    /// Baseline of the label, in pixels from the top of the view.
    pub label_y: f64,
    /// Width reserved for the label. Constant, whatever the current label is.
    pub label_width: f64,
    pub label_height: f64,
    pub pointer_radius: f64,
    pub padding: Padding,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            show_text: true,
            text_position: TextPosition::Left,
            label_y: 40.0,
            label_width: 120.0,
            label_height: 20.0,
            pointer_radius: 2.0,
            padding: Padding::default(),
        }
    }
}

/// Placement of the pie, label and pointer inside a view of a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pie_bounds: Rect,
    pub shadow_bounds: Rect,
    pub text_x: f64,
    pub text_y: f64,
    pub text_align: TextAlign,
    pub show_text: bool,
    pub pointer: Point,
    pub pointer_radius: f64,
    /// Wheel angle measured by the pointer.
    pub pointer_angle: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            pie_bounds: Rect::default(),
            shadow_bounds: Rect::default(),
            text_x: 0.0,
            text_y: 0.0,
            text_align: TextAlign::Right,
            show_text: false,
            pointer: Point::default(),
            pointer_radius: 0.0,
            pointer_angle: 0,
        }
    }
}

impl Layout {
    /// Lays the chart out in a `width` x `height` view.
    ///
    /// The pie is the largest square that fits beside the reserved label width. The pointer sits
    /// level with the middle of the label, on the label side of the pie, and measures one of the
    /// four diagonals depending on whether it ends up above or below the pie center.
    pub fn compute(width: f64, height: f64, cfg: &LayoutConfig) -> Self {
        let pad = &cfg.padding;
        let mut xpad = pad.left + pad.right;
        let ypad = pad.top + pad.bottom;

        if cfg.show_text {
            xpad += cfg.label_width;
        }

        let diameter = (width - xpad).min(height - ypad).max(0.0);
        let mut pie_bounds = Rect::new(pad.left, pad.top, pad.left + diameter, pad.top + diameter);

        let pointer_y = cfg.label_y - cfg.label_height / 2.0;
        let pointer_offset = pie_bounds.center().y - pointer_y;
        let above = pointer_offset >= 0.0;
        let reach = pointer_offset.abs();

        let (text_x, text_align, pointer_x, pointer_angle) = match cfg.text_position {
            TextPosition::Left => {
                if cfg.show_text {
                    pie_bounds = pie_bounds.offset(cfg.label_width, 0.0);
                }
                let angle = if above { 135 } else { 225 };
                (
                    pie_bounds.left,
                    TextAlign::Right,
                    pie_bounds.center().x - reach,
                    angle,
                )
            }
            TextPosition::Right => {
                let angle = if above { 45 } else { 315 };
                (
                    pie_bounds.right,
                    TextAlign::Left,
                    pie_bounds.center().x + reach,
                    angle,
                )
            }
        };

        let shadow_bounds = Rect::new(
            pie_bounds.left + SHADOW_INSET,
            pie_bounds.bottom + SHADOW_INSET,
            pie_bounds.right - SHADOW_INSET,
            pie_bounds.bottom + SHADOW_DEPTH,
        );

        Self {
            pie_bounds,
            shadow_bounds,
            text_x,
            text_y: cfg.label_y,
            text_align,
            show_text: cfg.show_text,
            pointer: Point::new(pointer_x, pointer_y),
            pointer_radius: cfg.pointer_radius,
            pointer_angle,
        }
    }

    pub fn center(&self) -> Point {
        self.pie_bounds.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(text_position: TextPosition, label_y: f64) -> LayoutConfig {
        LayoutConfig {
            text_position,
            label_y,
            label_width: 100.0,
            label_height: 20.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_text_left_pointer_above() {
        let layout = Layout::compute(500.0, 300.0, &cfg(TextPosition::Left, 60.0));
        assert_eq!(layout.pie_bounds, Rect::new(100.0, 0.0, 400.0, 300.0));
        assert_eq!(layout.pointer_angle, 135);
        assert_eq!(layout.text_x, 100.0);
        assert_eq!(layout.text_align, TextAlign::Right);
        // label mid-line at y = 50, 100 above center
        assert_eq!(layout.pointer, Point::new(150.0, 50.0));
        assert_eq!(layout.shadow_bounds, Rect::new(110.0, 310.0, 390.0, 320.0));
    }

    #[test]
    fn test_pointer_diagonal_per_quadrant() {
        let cases = vec![
            (TextPosition::Left, 60.0, 135),
            (TextPosition::Left, 280.0, 225),
            (TextPosition::Right, 60.0, 45),
            (TextPosition::Right, 280.0, 315),
        ];

        for (position, label_y, expected) in cases {
            let layout = Layout::compute(500.0, 300.0, &cfg(position, label_y));
            assert_eq!(layout.pointer_angle, expected, "{} at {}", position, label_y);
        }
    }

    #[test]
    fn test_text_right_keeps_pie_at_padding() {
        let mut config = cfg(TextPosition::Right, 280.0);
        config.padding = Padding {
            left: 10.0,
            top: 5.0,
            right: 10.0,
            bottom: 5.0,
        };
        let layout = Layout::compute(500.0, 300.0, &config);
        assert_eq!(layout.pie_bounds, Rect::new(10.0, 5.0, 300.0, 295.0));
        assert_eq!(layout.text_x, 300.0);
        assert_eq!(layout.text_align, TextAlign::Left);
        // mid-line at 270, center at 150: 120 below
        assert_eq!(layout.pointer, Point::new(275.0, 270.0));
    }

    #[test]
    fn test_degenerate_view_yields_empty_pie() {
        let layout = Layout::compute(50.0, 300.0, &cfg(TextPosition::Left, 0.0));
        assert_eq!(layout.pie_bounds.width(), 0.0);
    }

    #[test]
    fn test_text_position_deserialization() {
        let cases = vec![
            ("\"left\"", TextPosition::Left),
            ("\"LEFT\"", TextPosition::Left),
            ("\"l\"", TextPosition::Left),
            ("\"0\"", TextPosition::Left),
            ("\"Right\"", TextPosition::Right),
            ("\"r\"", TextPosition::Right),
        ];

        for (json, expected) in cases {
            let deserialized: TextPosition = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<TextPosition>("\"up\"").is_err());
    }
}
