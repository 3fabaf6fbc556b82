//! # Entrance Animation
//!
//! Time-parameterized placement of the foreground image during its first
//! `entrance_duration` seconds. Every function here is a pure function of
//! `(t, spec)`, so any frame can be replayed in isolation.

pub mod entrance;

pub use entrance::{place, AnimationKind, AnimationSpec, Crop, EntranceFrame, Placement};

/// Decelerating ease-out curve `1 - (1 - p)^3`, with `p` clamped to [0, 1]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}
