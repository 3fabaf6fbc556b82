use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::ease_out_cubic;

/// The eight entrance variants a foreground image can arrive with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    ZoomIn,
    ZoomOut,
    Unfold,
    ScrollUp,
    SlideLeft,
    SlideRight,
    FadeIn,
    DropBounce,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 8] = [
        AnimationKind::ZoomIn,
        AnimationKind::ZoomOut,
        AnimationKind::Unfold,
        AnimationKind::ScrollUp,
        AnimationKind::SlideLeft,
        AnimationKind::SlideRight,
        AnimationKind::FadeIn,
        AnimationKind::DropBounce,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::Unfold => "unfold",
            Self::ScrollUp => "scroll_up",
            Self::SlideLeft => "slide_left",
            Self::SlideRight => "slide_right",
            Self::FadeIn => "fade_in",
            Self::DropBounce => "drop_bounce",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| format!("unknown animation '{}'", s))
    }
}

/// Timing of one segment's entrance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    /// Seconds the foreground takes to settle
    pub entrance_duration: f64,
    /// Seconds before the text layer starts to appear
    pub hold_before_text: f64,
    /// Seconds the text layer takes to reach full opacity; zero means always visible
    pub text_fade_in: f64,
}

impl AnimationSpec {
    /// # Panics
    ///
    /// Panics if `entrance_duration` is not strictly positive or a text
    /// timing is negative. These are construction bugs, not render-time
    /// conditions.
    pub fn new(kind: AnimationKind, entrance_duration: f64) -> Self {
        assert!(
            entrance_duration > 0.0 && entrance_duration.is_finite(),
            "entrance duration must be positive, got {}",
            entrance_duration
        );
        Self {
            kind,
            entrance_duration,
            hold_before_text: 0.0,
            text_fade_in: 0.0,
        }
    }

    pub fn with_text_timing(mut self, hold_before_text: f64, text_fade_in: f64) -> Self {
        assert!(
            hold_before_text >= 0.0 && text_fade_in >= 0.0,
            "text timings must not be negative"
        );
        self.hold_before_text = hold_before_text;
        self.text_fade_in = text_fade_in;
        self
    }

    /// Linear progress through the entrance, clamped to [0, 1]
    pub fn progress(&self, t: f64) -> f64 {
        (t / self.entrance_duration).clamp(0.0, 1.0)
    }

    /// Opacity of the text layer at time `t`
    pub fn text_opacity(&self, t: f64) -> f32 {
        if self.text_fade_in <= 0.0 {
            return if t >= self.hold_before_text { 1.0 } else { 0.0 };
        }
        ((t - self.hold_before_text) / self.text_fade_in).clamp(0.0, 1.0) as f32
    }
}

/// Where the foreground settles, and the canvas it lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub target_width: u32,
    pub target_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Source rectangle cut out of the foreground before pasting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The transformed foreground for a single instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceFrame {
    pub x: i64,
    pub y: i64,
    /// Size the (possibly cropped) foreground is drawn at
    pub width: u32,
    pub height: u32,
    pub crop: Option<Crop>,
    pub opacity: f32,
    /// Scale factor applied to the target size; 1.0 once settled
    pub scale: f64,
}

impl EntranceFrame {
    /// The static, settled placement
    pub fn settled(placement: &Placement) -> Self {
        Self {
            x: placement.x,
            y: placement.y,
            width: placement.target_width,
            height: placement.target_height,
            crop: None,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    /// Whether anything would be drawn at all
    pub fn is_visible(&self) -> bool {
        self.width > 0 && self.height > 0 && self.opacity > 0.0
    }
}

/// Compute the foreground placement at time `t` (segment-local seconds)
pub fn place(t: f64, spec: &AnimationSpec, placement: &Placement) -> EntranceFrame {
    if t >= spec.entrance_duration {
        return EntranceFrame::settled(placement);
    }

    let progress = spec.progress(t);
    let ease = ease_out_cubic(progress);
    let tw = placement.target_width as f64;
    let th = placement.target_height as f64;
    let settled = EntranceFrame::settled(placement);

    match spec.kind {
        AnimationKind::ZoomIn => {
            let bounce = 1.0 + 0.08 * (PI * progress).sin() * (1.0 - progress);
            zoomed(placement, (0.3 + 0.7 * ease) * bounce)
        }
        AnimationKind::ZoomOut => {
            let bounce = 1.0 + 0.06 * (PI * progress).sin() * (1.0 - progress);
            zoomed(placement, (1.6 - 0.6 * ease) * bounce)
        }
        AnimationKind::Unfold => {
            let reveal_w = ((tw * ease) as i64).max(1);
            let reveal_h = ((th * (0.4 + 0.6 * ease)) as i64).max(1);

            let left = placement.target_width as i64 / 2 - reveal_w / 2;
            let top = placement.target_height as i64 / 2 - reveal_h / 2;
            let x1 = left.max(0);
            let y1 = top.max(0);
            let x2 = (left + reveal_w).min(placement.target_width as i64);
            let y2 = (top + reveal_h).min(placement.target_height as i64);
            let crop_w = (x2 - x1).max(0) as u32;
            let crop_h = (y2 - y1).max(0) as u32;

            EntranceFrame {
                x: placement.x + (placement.target_width as i64 - crop_w as i64).div_euclid(2),
                y: placement.y + (placement.target_height as i64 - crop_h as i64).div_euclid(2),
                width: crop_w,
                height: crop_h,
                crop: Some(Crop { x: x1 as u32, y: y1 as u32, width: crop_w, height: crop_h }),
                ..settled
            }
        }
        AnimationKind::ScrollUp => {
            let start_y = placement.canvas_height as f64 + 50.0;
            EntranceFrame { y: lerp_px(start_y, placement.y as f64, ease), ..settled }
        }
        AnimationKind::SlideLeft => {
            let start_x = placement.canvas_width as f64 + 50.0;
            EntranceFrame { x: lerp_px(start_x, placement.x as f64, ease), ..settled }
        }
        AnimationKind::SlideRight => {
            let start_x = -tw - 50.0;
            EntranceFrame { x: lerp_px(start_x, placement.x as f64, ease), ..settled }
        }
        AnimationKind::FadeIn => EntranceFrame { opacity: ease as f32, ..settled },
        AnimationKind::DropBounce => {
            let wobble = (-5.0 * progress).exp() * (3.0 * PI * progress).cos();
            let bounce = (1.0 - wobble).clamp(0.0, 1.3);
            let start_y = -th - 50.0;
            EntranceFrame { y: lerp_px(start_y, placement.y as f64, bounce), ..settled }
        }
    }
}

fn zoomed(placement: &Placement, scale: f64) -> EntranceFrame {
    let sw = (placement.target_width as f64 * scale) as i64;
    let sh = (placement.target_height as f64 * scale) as i64;
    let sw = sw.max(0);
    let sh = sh.max(0);

    EntranceFrame {
        x: placement.x + (placement.target_width as i64 - sw).div_euclid(2),
        y: placement.y + (placement.target_height as i64 - sh).div_euclid(2),
        width: sw as u32,
        height: sh as u32,
        crop: None,
        opacity: 1.0,
        scale,
    }
}

/// Interpolate a screen coordinate, truncating toward zero like pixel math elsewhere
fn lerp_px(start: f64, end: f64, factor: f64) -> i64 {
    (start + (end - start) * factor) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            x: 0,
            y: 600,
            target_width: 1080,
            target_height: 720,
            canvas_width: 1080,
            canvas_height: 1920,
        }
    }

    #[test]
    fn test_every_variant_settles_at_entrance_end() {
        let p = placement();
        for kind in AnimationKind::ALL {
            let spec = AnimationSpec::new(kind, 0.6);
            let frame = place(0.6, &spec, &p);
            assert_eq!(frame, EntranceFrame::settled(&p), "{} did not settle", kind);
            assert_eq!(place(5.0, &spec, &p), EntranceFrame::settled(&p));
        }
    }

    #[test]
    fn test_zoom_in_starts_at_thirty_percent() {
        let p = placement();
        let frame = place(0.0, &AnimationSpec::new(AnimationKind::ZoomIn, 0.6), &p);
        assert!((frame.scale - 0.3).abs() < 1e-9);
        assert_eq!(frame.width, 324);
        assert_eq!(frame.height, 216);
        assert_eq!(frame.x, (1080 - 324) / 2);
        assert_eq!(frame.y, 600 + (720 - 216) / 2);
    }

    #[test]
    fn test_zoom_out_starts_oversized_and_centered() {
        let p = placement();
        let frame = place(0.0, &AnimationSpec::new(AnimationKind::ZoomOut, 0.6), &p);
        assert!((frame.scale - 1.6).abs() < 1e-9);
        assert_eq!(frame.width, 1728);
        assert_eq!(frame.x, -324);
    }

    #[test]
    fn test_slides_start_fully_off_canvas() {
        let p = placement();
        let left = place(0.0, &AnimationSpec::new(AnimationKind::SlideLeft, 0.6), &p);
        assert_eq!(left.x, 1080 + 50);

        let right = place(0.0, &AnimationSpec::new(AnimationKind::SlideRight, 0.6), &p);
        assert_eq!(right.x + right.width as i64, -50);

        let up = place(0.0, &AnimationSpec::new(AnimationKind::ScrollUp, 0.6), &p);
        assert_eq!(up.y, 1920 + 50);

        let drop = place(0.0, &AnimationSpec::new(AnimationKind::DropBounce, 0.6), &p);
        assert_eq!(drop.y, -720 - 50);
    }

    #[test]
    fn test_fade_in_starts_invisible() {
        let p = placement();
        let spec = AnimationSpec::new(AnimationKind::FadeIn, 0.6);
        let start = place(0.0, &spec, &p);
        assert_eq!(start.opacity, 0.0);
        assert!(!start.is_visible());
        let mid = place(0.3, &spec, &p);
        assert!(mid.opacity > 0.5 && mid.opacity < 1.0);
    }

    #[test]
    fn test_unfold_starts_as_thin_centered_strip() {
        let p = placement();
        let frame = place(0.0, &AnimationSpec::new(AnimationKind::Unfold, 0.6), &p);
        let crop = frame.crop.unwrap();
        assert_eq!(crop.width, 1);
        assert_eq!(crop.height, 288);
        assert_eq!(crop.x, 540);
        assert_eq!(frame.width, 1);
        assert_eq!(frame.x, 539);
    }

    #[test]
    fn test_drop_bounce_overshoots_then_returns() {
        let p = placement();
        let spec = AnimationSpec::new(AnimationKind::DropBounce, 1.0);
        let overshoot = (1..100)
            .map(|i| place(i as f64 / 100.0, &spec, &p).y)
            .max()
            .unwrap();
        assert!(overshoot > p.y, "expected a bounce past the final y");
    }

    #[test]
    fn test_place_is_replayable() {
        let p = placement();
        for kind in AnimationKind::ALL {
            let spec = AnimationSpec::new(kind, 0.6);
            assert_eq!(place(0.217, &spec, &p), place(0.217, &spec, &p));
        }
    }

    #[test]
    fn test_negative_time_clamps_to_start() {
        let p = placement();
        let spec = AnimationSpec::new(AnimationKind::SlideLeft, 0.6);
        assert_eq!(place(-1.0, &spec, &p), place(0.0, &spec, &p));
    }

    #[test]
    fn test_text_opacity_defaults_to_visible() {
        let spec = AnimationSpec::new(AnimationKind::ZoomIn, 0.6);
        assert_eq!(spec.text_opacity(0.0), 1.0);

        let fading = spec.with_text_timing(0.8, 0.4);
        assert_eq!(fading.text_opacity(0.5), 0.0);
        assert!((fading.text_opacity(1.0) - 0.5).abs() < 1e-6);
        assert_eq!(fading.text_opacity(2.0), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("drop-bounce".parse::<AnimationKind>().unwrap(), AnimationKind::DropBounce);
        assert_eq!("zoom_in".parse::<AnimationKind>().unwrap(), AnimationKind::ZoomIn);
        assert!("spin".parse::<AnimationKind>().is_err());
    }

    #[test]
    #[should_panic]
    fn test_zero_entrance_duration_panics() {
        AnimationSpec::new(AnimationKind::ZoomIn, 0.0);
    }
}
