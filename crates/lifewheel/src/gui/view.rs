use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use piechart::Color;
use piechart::geometry::{Point, Rect};
use piechart::layout::TextAlign;
use piechart::render::{LabelRender, PointerLine, RenderState, SliceRender, SweepGradient};
use std::f64::consts::PI;

/// Cairo has no sweep gradient, so wedges are shaded as flat segments of at most this many
/// degrees, each sampled at its middle.
const GRADIENT_STEP_DEG: f64 = 2.0;
/// Segments overlap by this much to hide antialiasing seams.
const SEAM_OVERLAP_DEG: f64 = 0.5;
const LABEL_FONT_SIZE: f64 = 16.0;
const POINTER_LINE_WIDTH: f64 = 2.0;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn set_source_u8(cr: &Context, color: Color) {
    set_source(cr, color.into_format());
}

pub fn draw(cr: &Context, state: &RenderState, colors: &ThemeColors) -> Result<(), cairo::Error> {
    draw_shadow(cr, &state.shadow_bounds, colors)?;

    let center = state.pie_bounds.center();
    cr.save()?;
    cr.translate(center.x, center.y);
    cr.rotate((state.rotation as f64).to_radians());
    cr.translate(-center.x, -center.y);
    for slice in &state.slices {
        draw_slice(cr, slice, &state.pie_bounds)?;
    }
    cr.restore()?;

    if let Some(label) = &state.label {
        draw_label(cr, label, colors)?;
    }
    draw_pointer(cr, &state.pointer, colors)
}

fn draw_shadow(cr: &Context, bounds: &Rect, colors: &ThemeColors) -> Result<(), cairo::Error> {
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Ok(());
    }

    let center = bounds.center();
    cr.save()?;
    cr.translate(center.x, center.y);
    cr.scale(bounds.width() / 2.0, bounds.height() / 2.0);
    cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    cr.restore()?;
    set_source(cr, colors.shadow);
    cr.fill()
}

fn draw_slice(cr: &Context, slice: &SliceRender, pie_bounds: &Rect) -> Result<(), cairo::Error> {
    let start = slice.arc.start as f64;
    let sweep = slice.arc.sweep as f64;

    fill_wedge(
        cr,
        pie_bounds.center(),
        pie_bounds.width() / 2.0,
        start,
        sweep,
        &slice.item_gradient,
    )?;
    fill_wedge(
        cr,
        slice.inset_bounds.center(),
        slice.inset_bounds.width() / 2.0,
        start,
        sweep,
        &slice.slice_gradient,
    )
}

fn fill_wedge(
    cr: &Context,
    center: Point,
    radius: f64,
    start: f64,
    sweep: f64,
    gradient: &SweepGradient,
) -> Result<(), cairo::Error> {
    if sweep <= 0.0 || radius <= 0.0 {
        return Ok(());
    }

    let end = start + sweep;
    let steps = (sweep / GRADIENT_STEP_DEG).ceil().max(1.0);
    let step = sweep / steps;

    for i in 0..steps as usize {
        let a0 = start + step * i as f64;
        let a1 = (a0 + step + SEAM_OVERLAP_DEG).min(end);

        set_source_u8(cr, gradient.color_at_angle(a0 + step / 2.0));
        cr.move_to(center.x, center.y);
        cr.arc(center.x, center.y, radius, a0.to_radians(), a1.to_radians());
        cr.close_path();
        cr.fill()?;
    }
    Ok(())
}

fn draw_label(cr: &Context, label: &LabelRender, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_source(cr, colors.label);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(LABEL_FONT_SIZE);

    let ext = cr.text_extents(&label.text)?;
    let x = match label.align {
        TextAlign::Left => label.position.x,
        TextAlign::Right => label.position.x - ext.x_advance(),
    };
    cr.move_to(x, label.position.y);
    cr.show_text(&label.text)
}

fn draw_pointer(cr: &Context, pointer: &PointerLine, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_source(cr, colors.pointer);
    cr.set_line_width(POINTER_LINE_WIDTH);
    cr.move_to(pointer.from.x, pointer.from.y);
    cr.line_to(pointer.to.x, pointer.to.y);
    cr.stroke()?;

    cr.arc(pointer.to.x, pointer.to.y, pointer.radius, 0.0, 2.0 * PI);
    cr.fill()
}
