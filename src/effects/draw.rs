use crate::video::RasterSurface;

/// Alpha-over a filled disc of radius `radius` centred on `(cx, cy)`
///
/// The covered box is `[cx - r, cx + r]` inclusive on both axes; pixels off
/// the surface are skipped.
pub fn fill_disc(
    surface: &mut RasterSurface,
    cx: i64,
    cy: i64,
    radius: i64,
    color: [u8; 3],
    alpha: u8,
) {
    if alpha == 0 || radius < 0 {
        return;
    }
    let a = alpha as f32 / 255.0;
    // (r + 0.5)² keeps small discs round instead of diamond shaped
    let limit = radius * radius + radius;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= limit {
                surface.blend_pixel(cx + dx, cy + dy, color, a);
            }
        }
    }
}

/// One-pixel axis-aligned line from `(x0, y0)` towards `(x0 + dx, y0 + dy)`
///
/// Only horizontal and vertical arms are needed for star crosses.
pub fn axis_line(
    surface: &mut RasterSurface,
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
    color: [u8; 3],
    alpha: u8,
) {
    if alpha == 0 {
        return;
    }
    let a = alpha as f32 / 255.0;
    let steps = dx.abs().max(dy.abs());

    for i in 0..=steps {
        let x = x0 + dx.signum() * i;
        let y = y0 + dy.signum() * i;
        surface.blend_pixel(x, y, color, a);
    }
}

/// Convert a possibly out-of-range float alpha to a byte
pub fn alpha_byte(value: f64) -> u8 {
    (value as i64).clamp(0, 255) as u8
}
