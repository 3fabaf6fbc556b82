use std::borrow::Cow;

use crate::animation::{place, AnimationSpec, Placement};
use crate::composition::layout::TextLayer;
use crate::composition::paste::paste_with_opacity;
use crate::video::RasterSurface;

/// Render one composited frame at segment time `t`
///
/// `foreground` must already be scaled to the placement's target size. The
/// background is copied, never mutated, so the same template can back every
/// frame of every segment concurrently.
pub fn render_frame(
    background: &RasterSurface,
    foreground: &RasterSurface,
    placement: &Placement,
    text: &TextLayer,
    t: f64,
    spec: &AnimationSpec,
) -> RasterSurface {
    let mut frame = background.clone();

    let entrance = place(t, spec, placement);
    if entrance.is_visible() {
        let mut layer = Cow::Borrowed(foreground);
        if let Some(crop) = entrance.crop {
            layer = Cow::Owned(layer.cropped(crop.x, crop.y, crop.width, crop.height));
        }
        if layer.dimensions() != (entrance.width, entrance.height) {
            layer = Cow::Owned(layer.resized(entrance.width, entrance.height));
        }
        paste_with_opacity(&mut frame, &layer, entrance.x, entrance.y, entrance.opacity);
    }

    draw_text(&mut frame, text, spec.text_opacity(t));
    frame
}

/// Draw the text layer at `opacity`; partial opacity cross-fades a copy
fn draw_text(frame: &mut RasterSurface, text: &TextLayer, opacity: f32) {
    if text.is_empty() || opacity <= 0.0 {
        return;
    }
    if opacity >= 1.0 {
        text.draw(frame);
        return;
    }

    let mut with_text = frame.clone();
    text.draw(&mut with_text);
    paste_with_opacity(frame, &with_text, 0, 0, opacity);
}
