//! Draw parameters derived from the chart. Nothing in here holds state; a drawing surface
//! asks for a fresh [`RenderState`] whenever the chart reports it was invalidated.

use crate::chart::PieChart;
use crate::color::{self, Color};
use crate::geometry::{Point, Rect};
use crate::layout::{Layout, TextAlign};
use crate::model::{FULL_CIRCLE, Item};

/// A wedge in drawing convention: degrees clockwise from the positive x axis on a y-down
/// surface. Wheel angles run the other way, so a span `[start, end]` starts drawing at
/// `360 - end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub start: i32,
    pub sweep: i32,
}

pub fn arc(item: &Item) -> Arc {
    Arc {
        start: FULL_CIRCLE - item.end_angle(),
        sweep: item.end_angle() - item.start_angle(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Fraction of a full turn, in `0.0..=1.0`.
    pub offset: f32,
    pub color: Color,
}

/// Gradient sweeping once around `center`, in the same direction as [`Arc`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepGradient {
    pub center: Point,
    pub stops: [ColorStop; 4],
}

impl SweepGradient {
    /// Highlight up to the slice's drawn start, blending into `base` across the slice.
    ///
    /// The highlight is repeated on purpose: some backends require at least three stops once
    /// explicit positions are given.
    pub fn for_slice(item: &Item, center: Point, highlight: Color, base: Color) -> Self {
        let turn = FULL_CIRCLE as f32;
        Self {
            center,
            stops: [
                ColorStop {
                    offset: 0.0,
                    color: highlight,
                },
                ColorStop {
                    offset: (FULL_CIRCLE - item.end_angle()) as f32 / turn,
                    color: highlight,
                },
                ColorStop {
                    offset: (FULL_CIRCLE - item.start_angle()) as f32 / turn,
                    color: base,
                },
                ColorStop {
                    offset: 1.0,
                    color: base,
                },
            ],
        }
    }

    /// Samples the gradient at `offset`, a fraction of a full turn.
    pub fn color_at(&self, offset: f32) -> Color {
        let offset = offset.clamp(0.0, 1.0);
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if offset <= b.offset {
                let width = b.offset - a.offset;
                let u = if width > 0.0 {
                    (offset - a.offset) / width
                } else {
                    1.0
                };
                return color::lerp(a.color, b.color, u);
            }
        }
        self.stops[3].color
    }

    /// Samples the gradient at a drawing angle in degrees.
    pub fn color_at_angle(&self, degrees: f64) -> Color {
        let turn = FULL_CIRCLE as f64;
        self.color_at((degrees.rem_euclid(turn) / turn) as f32)
    }
}

/// Bounds of the decorative inset wedge: the pie bounds shrunk around their center by the
/// item's fraction.
pub fn inset_bounds(item: &Item, pie_bounds: &Rect) -> Rect {
    let fraction = item.fraction() as f64;
    Rect::from_center(
        pie_bounds.center(),
        pie_bounds.width() / 2.0 * fraction,
        pie_bounds.height() / 2.0 * fraction,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceRender {
    pub arc: Arc,
    pub inset_bounds: Rect,
    /// Fill of the full-radius wedge.
    pub item_gradient: SweepGradient,
    /// Fill of the inset wedge.
    pub slice_gradient: SweepGradient,
}

impl SliceRender {
    pub fn new(item: &Item, pie_bounds: &Rect) -> Self {
        let center = pie_bounds.center();
        Self {
            arc: arc(item),
            inset_bounds: inset_bounds(item, pie_bounds),
            item_gradient: SweepGradient::for_slice(
                item,
                center,
                item.item_highlight(),
                item.item_color(),
            ),
            slice_gradient: SweepGradient::for_slice(
                item,
                center,
                item.slice_highlight(),
                item.slice_color(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelRender {
    pub text: String,
    pub position: Point,
    pub align: TextAlign,
}

/// Line from the label to the pointer tip, capped by a filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLine {
    pub from: Point,
    pub to: Point,
    pub radius: f64,
}

pub fn pointer_line(layout: &Layout) -> PointerLine {
    PointerLine {
        from: Point::new(layout.text_x, layout.pointer.y),
        to: layout.pointer,
        radius: layout.pointer_radius,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub pie_bounds: Rect,
    pub shadow_bounds: Rect,
    /// Clockwise rotation of the whole wheel about the pie center, in degrees.
    pub rotation: i32,
    pub slices: Vec<SliceRender>,
    pub label: Option<LabelRender>,
    pub pointer: PointerLine,
}

impl RenderState {
    pub fn derive(chart: &PieChart) -> Self {
        let layout = chart.layout();
        let slices = chart
            .items()
            .iter()
            .map(|it| SliceRender::new(it, &layout.pie_bounds))
            .collect();

        let label = chart
            .current_label()
            .filter(|_| layout.show_text)
            .map(|text| LabelRender {
                text: text.to_string(),
                position: Point::new(layout.text_x, layout.text_y),
                align: layout.text_align,
            });

        Self {
            pie_bounds: layout.pie_bounds,
            shadow_bounds: layout.shadow_bounds,
            rotation: chart.rotation(),
            slices,
            label,
            pointer: pointer_line(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SliceModel;
    use palette::Srgba;

    fn three_items() -> SliceModel {
        let mut model = SliceModel::default();
        let base = Srgba::new(100, 100, 100, 255);
        model.add_item("a", 0.25, base, base).unwrap();
        model.add_item("b", 0.5, base, base).unwrap();
        model.add_item("c", 1.0, base, base).unwrap();
        model
    }

    #[test]
    fn test_arc_uses_complement_of_end_angle() {
        let model = three_items();
        let arcs: Vec<Arc> = model.items().iter().map(arc).collect();
        assert_eq!(
            arcs,
            vec![
                Arc {
                    start: 240,
                    sweep: 120
                },
                Arc {
                    start: 120,
                    sweep: 120
                },
                Arc { start: 0, sweep: 120 },
            ]
        );
    }

    #[test]
    fn test_gradient_stop_layout() {
        let model = three_items();
        let hl = Srgba::new(255, 0, 0, 255);
        let base = Srgba::new(0, 0, 255, 255);
        let gradient = SweepGradient::for_slice(&model.items()[0], Point::default(), hl, base);

        let offsets: Vec<f32> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 240.0 / 360.0, 1.0, 1.0]);
        let colors: Vec<Color> = gradient.stops.iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![hl, hl, base, base]);
    }

    #[test]
    fn test_gradient_sampling() {
        let model = three_items();
        let hl = Srgba::new(200, 0, 0, 255);
        let base = Srgba::new(0, 0, 200, 255);
        // item b spans drawing angles 120..240
        let gradient = SweepGradient::for_slice(&model.items()[1], Point::default(), hl, base);

        assert_eq!(gradient.color_at_angle(60.0), hl);
        assert_eq!(gradient.color_at_angle(120.0), hl);
        assert_eq!(gradient.color_at_angle(180.0), Srgba::new(100, 0, 100, 255));
        assert_eq!(gradient.color_at_angle(240.0), base);
        assert_eq!(gradient.color_at_angle(300.0), base);
        assert_eq!(gradient.color_at_angle(-60.0), base);
    }

    #[test]
    fn test_inset_bounds_scale_with_fraction() {
        let model = three_items();
        let pie = Rect::new(100.0, 0.0, 300.0, 200.0);
        assert_eq!(
            inset_bounds(&model.items()[0], &pie),
            Rect::new(175.0, 75.0, 225.0, 125.0)
        );
        assert_eq!(inset_bounds(&model.items()[2], &pie), pie);
    }

    #[test]
    fn test_pointer_line_runs_from_label_edge() {
        let layout = Layout {
            text_x: 100.0,
            pointer: Point::new(150.0, 50.0),
            pointer_radius: 3.0,
            ..Layout::default()
        };
        let line = pointer_line(&layout);
        assert_eq!(line.from, Point::new(100.0, 50.0));
        assert_eq!(line.to, Point::new(150.0, 50.0));
        assert_eq!(line.radius, 3.0);
    }
}
