//! Safe compositing: paste one surface onto another at any offset.
//!
//! Entrance animations routinely park the foreground partly or entirely off
//! the canvas mid-flight, so pasting clips to the visible intersection and
//! never fails.

use crate::video::RasterSurface;

/// Visible part of a paste, in foreground and background coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteRegion {
    pub src_x: u32,
    pub src_y: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Intersect a foreground box placed at `(x, y)` with the background canvas
///
/// Returns `None` when nothing of the foreground would be visible.
pub fn visible_region(
    background: (u32, u32),
    foreground: (u32, u32),
    x: i64,
    y: i64,
) -> Option<PasteRegion> {
    let (bg_w, bg_h) = (background.0 as i64, background.1 as i64);
    let (fg_w, fg_h) = (foreground.0 as i64, foreground.1 as i64);

    let src_x1 = (-x).max(0);
    let src_y1 = (-y).max(0);
    let src_x2 = fg_w.min(bg_w - x);
    let src_y2 = fg_h.min(bg_h - y);

    if src_x2 <= src_x1 || src_y2 <= src_y1 {
        return None;
    }

    Some(PasteRegion {
        src_x: src_x1 as u32,
        src_y: src_y1 as u32,
        dst_x: x.max(0) as u32,
        dst_y: y.max(0) as u32,
        width: (src_x2 - src_x1) as u32,
        height: (src_y2 - src_y1) as u32,
    })
}

/// Paste `foreground` onto `background` with its top-left corner at `(x, y)`
///
/// The foreground alpha channel is the paste mask: fully transparent pixels
/// leave the background untouched.
pub fn paste(background: &mut RasterSurface, foreground: &RasterSurface, x: i64, y: i64) {
    paste_with_opacity(background, foreground, x, y, 1.0);
}

/// Paste with the foreground mask scaled by `opacity`
///
/// `opacity` of 0 is a no-op and 1 is a plain masked paste. Intermediate
/// values give the same result as blending the background-only frame with
/// the fully composited frame.
pub fn paste_with_opacity(
    background: &mut RasterSurface,
    foreground: &RasterSurface,
    x: i64,
    y: i64,
    opacity: f32,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    let Some(region) = visible_region(background.dimensions(), foreground.dimensions(), x, y) else {
        return;
    };

    for row in 0..region.height {
        for col in 0..region.width {
            let s = foreground.get_pixel(region.src_x + col, region.src_y + row);
            let mask = s[3] as f32 / 255.0 * opacity;
            if mask <= 0.0 {
                continue;
            }

            let (dx, dy) = (region.dst_x + col, region.dst_y + row);
            if mask >= 1.0 {
                background.set_pixel(dx, dy, s);
            } else {
                background.blend_pixel(dx as i64, dy as i64, [s[0], s[1], s[2]], mask);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_left_paste_writes_visible_columns_only() {
        let mut bg = RasterSurface::new_filled(200, 200, [0, 0, 0]);
        let fg = RasterSurface::new_filled(100, 100, [255, 0, 0]);

        paste(&mut bg, &fg, -50, 0);

        for x in 0..50 {
            assert_eq!(bg.get_pixel(x, 10), [255, 0, 0, 255], "column {}", x);
        }
        assert_eq!(bg.get_pixel(50, 10), [0, 0, 0, 255]);
        assert_eq!(bg.get_pixel(10, 100), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fully_outside_paste_is_noop() {
        let mut bg = RasterSurface::new_filled(200, 200, [9, 9, 9]);
        let before = bg.clone();
        let fg = RasterSurface::new_filled(100, 100, [255, 0, 0]);

        paste(&mut bg, &fg, 300, 0);
        paste(&mut bg, &fg, 0, -100);
        paste(&mut bg, &fg, -100, -100);

        assert_eq!(bg, before);
    }

    #[test]
    fn test_visible_region_crops_source() {
        let region = visible_region((200, 200), (100, 100), -50, 150).unwrap();
        assert_eq!(
            region,
            PasteRegion { src_x: 50, src_y: 0, dst_x: 0, dst_y: 150, width: 50, height: 50 }
        );
    }

    #[test]
    fn test_transparent_pixels_do_not_overwrite() {
        let mut bg = RasterSurface::new_filled(4, 4, [10, 20, 30]);
        let mut fg = RasterSurface::new_transparent(2, 2);
        fg.set_pixel(1, 1, [255, 255, 255, 255]);

        paste(&mut bg, &fg, 1, 1);

        assert_eq!(bg.get_pixel(1, 1), [10, 20, 30, 255]);
        assert_eq!(bg.get_pixel(2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_half_opacity_blends() {
        let mut bg = RasterSurface::new_filled(1, 1, [0, 0, 0]);
        let fg = RasterSurface::new_filled(1, 1, [200, 200, 200]);

        paste_with_opacity(&mut bg, &fg, 0, 0, 0.5);
        assert_eq!(bg.get_pixel(0, 0), [100, 100, 100, 255]);
    }
}
