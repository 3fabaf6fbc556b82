use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// An RGBA pixel buffer, the unit of data passed between compositing stages
///
/// This is a thin wrapper around an RGBA image buffer that provides the
/// pixel helpers used by the paste, text and particle passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    buffer: RgbaImage,
}

impl RasterSurface {
    /// Wrap an existing RGBA buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a fully transparent surface
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self {
            buffer: ImageBuffer::new(width, height),
        }
    }

    /// Create an opaque surface filled with the given color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer =
            ImageBuffer::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]));
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Get a pixel at the given coordinates (RGBA)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// Alpha-over blend a non-premultiplied color onto the pixel at signed coordinates
    ///
    /// Coordinates outside the surface are ignored, so shape rasterizers can
    /// stamp partially visible primitives without clipping first.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let dst = self.buffer.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        if out_a <= 0.0 {
            return;
        }

        for c in 0..3 {
            let blended = (color[c] as f32 * alpha + dst[c] as f32 * dst_a * (1.0 - alpha)) / out_a;
            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Resize to the exact target size with a Lanczos3 filter
    pub fn resized(&self, width: u32, height: u32) -> Self {
        use image::imageops::FilterType;

        if self.dimensions() == (width, height) {
            return self.clone();
        }
        Self::new(image::imageops::resize(&self.buffer, width, height, FilterType::Lanczos3))
    }

    /// Copy out a sub-rectangle; the rectangle must lie inside the surface
    pub fn cropped(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(image::imageops::crop_imm(&self.buffer, x, y, width, height).to_image())
    }

    /// Save the surface as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// Output video parameters handed to the encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoParams {
    /// Frame rate the encoder pulls frames at
    pub fps: f64,

    /// Canvas resolution (width, height) for the article layout
    pub resolution: (u32, u32),

    /// Video codec to use for output
    pub codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            fps: 24.0,
            resolution: (1080, 1920),
            codec: "libx264".to_string(),
            quality: 85,
        }
    }
}

/// The pixels behind one segment: a still image or a frame sequence
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Still(RasterSurface),
    /// Pre-extracted frames shown picture-in-picture style, looping at `fps`
    Frames { frames: Vec<RasterSurface>, fps: f64 },
}

impl MediaSource {
    /// # Panics
    ///
    /// Panics when `frames` is empty or `fps` is not positive.
    pub fn sequence(frames: Vec<RasterSurface>, fps: f64) -> Self {
        assert!(!frames.is_empty(), "a frame sequence needs at least one frame");
        assert!(fps > 0.0, "frame sequence fps must be positive");
        MediaSource::Frames { frames, fps }
    }

    /// Size of the (first) frame
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            MediaSource::Still(surface) => surface.dimensions(),
            MediaSource::Frames { frames, .. } => frames[0].dimensions(),
        }
    }

    pub fn frame_count(&self) -> usize {
        match self {
            MediaSource::Still(_) => 1,
            MediaSource::Frames { frames, .. } => frames.len(),
        }
    }

    /// Frame shown at segment time `t`: `floor(t * fps) mod n` for sequences
    pub fn frame_at(&self, t: f64) -> &RasterSurface {
        match self {
            MediaSource::Still(surface) => surface,
            MediaSource::Frames { frames, fps } => {
                let index = (t.max(0.0) * fps) as usize % frames.len();
                &frames[index]
            }
        }
    }

    /// Resize every frame to exactly `width`×`height`
    pub fn scaled_to(self, width: u32, height: u32) -> Self {
        match self {
            MediaSource::Still(surface) => MediaSource::Still(surface.resized(width, height)),
            MediaSource::Frames { frames, fps } => MediaSource::Frames {
                frames: frames.iter().map(|f| f.resized(width, height)).collect(),
                fps,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut surface = RasterSurface::new_transparent(2, 2);
        surface.blend_pixel(0, 0, [200, 100, 50], 0.5);

        let px = surface.get_pixel(0, 0);
        assert_eq!(&px[..3], &[200, 100, 50]);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn test_blend_outside_is_ignored() {
        let mut surface = RasterSurface::new_filled(2, 2, [0, 0, 0]);
        let before = surface.clone();
        surface.blend_pixel(-1, 0, [255, 255, 255], 1.0);
        surface.blend_pixel(0, 5, [255, 255, 255], 1.0);
        assert_eq!(surface, before);
    }

    #[test]
    fn test_blend_onto_opaque_mixes() {
        let mut surface = RasterSurface::new_filled(1, 1, [0, 0, 0]);
        surface.blend_pixel(0, 0, [255, 255, 255], 0.5);
        let px = surface.get_pixel(0, 0);
        assert!((126..=129).contains(&px[0]));
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_sequence_frame_index_wraps() {
        let frames: Vec<RasterSurface> = (0..3u8)
            .map(|i| RasterSurface::new_filled(2, 2, [i * 100, 0, 0]))
            .collect();
        let media = MediaSource::sequence(frames, 10.0);

        assert_eq!(media.frame_count(), 3);
        assert_eq!(media.frame_at(0.0).get_pixel(0, 0)[0], 0);
        assert_eq!(media.frame_at(0.15).get_pixel(0, 0)[0], 100);
        assert_eq!(media.frame_at(0.25).get_pixel(0, 0)[0], 200);
        assert_eq!(media.frame_at(0.35).get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_scaled_to_resizes_every_frame() {
        let frames = vec![RasterSurface::new_filled(4, 4, [1, 2, 3]); 2];
        let media = MediaSource::sequence(frames, 24.0).scaled_to(2, 3);
        assert_eq!(media.dimensions(), (2, 3));
        if let MediaSource::Frames { frames, .. } = media {
            assert!(frames.iter().all(|f| f.dimensions() == (2, 3)));
        }
    }
}
