use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::animation::{AnimationKind, AnimationSpec, Placement};
use crate::audio::{AudioInfo, AudioPlan};
use crate::composition::frame::render_frame;
use crate::composition::layout::{LayoutMode, PageLayout, TextLayer};
use crate::config::Config;
use crate::effects::ParticleCompositor;
use crate::error::{Result, TimelineError};
use crate::text::FontSet;
use crate::video::{MediaSource, RasterSurface, ResolvedSource};

/// Everything needed to render one per-source clip
#[derive(Debug, Clone)]
pub struct Segment {
    /// 1-based position in the timeline
    pub index: usize,
    pub name: String,
    /// Media already scaled to the placement's target size
    pub source: MediaSource,
    pub animation: AnimationSpec,
    pub placement: Placement,
    pub text: Arc<TextLayer>,
    /// Seconds from the start of the video
    pub start: f64,
    pub duration: f64,
    pub effect: String,
    pub seed: u64,
}

impl Segment {
    /// Render this segment at local time `t`, clamped to the segment
    pub fn render(
        &self,
        background: &RasterSurface,
        t: f64,
        effects: &ParticleCompositor,
    ) -> RasterSurface {
        let t = t.clamp(0.0, self.duration);
        let frame = render_frame(
            background,
            self.source.frame_at(t),
            &self.placement,
            &self.text,
            t,
            &self.animation,
        );
        effects.apply(frame, t, &self.effect, self.duration, self.seed)
    }

    /// The settled frame saved as a preview image
    ///
    /// Uses the same render path as the video, so a preview always matches
    /// the last frame of its segment.
    pub fn preview(
        &self,
        background: &RasterSurface,
        effects: &ParticleCompositor,
    ) -> RasterSurface {
        self.render(background, self.duration, effects)
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

fn frames_for(duration: f64, fps: f64) -> usize {
    ((duration * fps).round() as usize).max(1)
}

/// An ordered, immutable list of segments ready to render
pub struct Timeline {
    segments: Vec<Segment>,
    background: Arc<RasterSurface>,
    effects: ParticleCompositor,
    fps: f64,
    total_duration: f64,
    audio: Option<AudioPlan>,
}

impl Timeline {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn background(&self) -> &RasterSurface {
        &self.background
    }

    pub fn canvas(&self) -> (u32, u32) {
        self.background.dimensions()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn audio(&self) -> Option<&AudioPlan> {
        self.audio.as_ref()
    }

    /// Number of frames the encoder pulls
    pub fn frame_count(&self) -> usize {
        frames_for(self.total_duration, self.fps)
    }

    /// Length of the encoded video, which is whole frames at `fps`
    pub fn encoded_duration(&self) -> f64 {
        self.frame_count() as f64 / self.fps
    }

    /// The segment playing at video time `t`, with the segment-local time
    ///
    /// Times past the end resolve to the last segment.
    pub fn segment_at(&self, t: f64) -> (&Segment, f64) {
        let t = t.max(0.0);
        let segment = self
            .segments
            .iter()
            .find(|s| t < s.end())
            .unwrap_or_else(|| &self.segments[self.segments.len() - 1]);
        (segment, t - segment.start)
    }

    /// Render the frame shown at video time `t`
    pub fn render_at(&self, t: f64) -> RasterSurface {
        let (segment, local) = self.segment_at(t);
        segment.render(&self.background, local, &self.effects)
    }

    /// Render output frame number `index`
    pub fn render_frame(&self, index: usize) -> RasterSurface {
        self.render_at(index as f64 / self.fps)
    }

    pub fn preview(&self, segment: &Segment) -> RasterSurface {
        segment.preview(&self.background, &self.effects)
    }
}

/// Text and media for one render request
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Title, optionally `"main|subtitle"`
    pub title: String,
    pub summary: String,
    pub effect: String,
}

/// Shuffle the eight entrance variants and deal them out to `count` segments
///
/// Every run of eight consecutive segments starting at a multiple of eight
/// is a permutation of all variants, and no two adjacent segments share one.
pub fn assign_variants(count: usize, rng: &mut StdRng) -> Vec<AnimationKind> {
    let mut variants = Vec::with_capacity(count);

    while variants.len() < count {
        let mut cycle = AnimationKind::ALL.to_vec();
        cycle.shuffle(rng);
        if variants.last() == Some(&cycle[0]) {
            cycle.swap(0, 1);
        }
        let take = (count - variants.len()).min(cycle.len());
        variants.extend_from_slice(&cycle[..take]);
    }

    variants
}

/// Builds a `Timeline` from resolved sources
pub struct TimelineAssembler {
    config: Config,
    fonts: FontSet,
    effects: ParticleCompositor,
}

impl TimelineAssembler {
    pub fn new(config: Config, fonts: FontSet, effects: ParticleCompositor) -> Self {
        Self {
            config,
            fonts,
            effects,
        }
    }

    fn shuffle_rng(&self) -> StdRng {
        match self.config.timeline.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn animation(&self, kind: AnimationKind) -> AnimationSpec {
        let timing = &self.config.animation;
        let spec = AnimationSpec::new(kind, timing.entrance_duration);
        if timing.fade_text {
            spec.with_text_timing(timing.hold_no_text, timing.text_fade_in)
        } else {
            spec
        }
    }

    fn page(
        &self,
        sources: &[ResolvedSource],
        content: &PageContent,
        background: Option<&RasterSurface>,
    ) -> PageLayout {
        let text = &self.config.text;
        match self.config.timeline.layout {
            LayoutMode::Article => {
                let canvas = background
                    .map(|bg| bg.dimensions())
                    .unwrap_or(self.config.render.params.resolution);
                PageLayout::article(
                    canvas,
                    &content.title,
                    &content.summary,
                    &self.fonts,
                    text.article_margin_ratio,
                )
            }
            LayoutMode::Showcase => {
                let canvas =
                    PageLayout::showcase_canvas(sources.iter().map(|s| s.media.dimensions()))
                        .unwrap_or(self.config.render.params.resolution);
                PageLayout::showcase(
                    canvas,
                    &content.title,
                    &self.fonts,
                    text.showcase_margin_ratio,
                )
            }
        }
    }

    /// Lay out every source as a segment of constant duration
    ///
    /// Fails with `EmptyBatch` when there is nothing to show and with
    /// `InvalidParameters` for an unknown effect name.
    pub fn assemble(
        &self,
        sources: Vec<ResolvedSource>,
        content: &PageContent,
        background: Option<RasterSurface>,
        audio: Option<AudioInfo>,
    ) -> Result<Timeline> {
        if sources.is_empty() {
            return Err(TimelineError::EmptyBatch { requested: 0 }.into());
        }
        self.effects.validate_effect(&content.effect)?;

        let duration = self.config.clip_duration();
        let page = self.page(&sources, content, background.as_ref());

        let background = match background {
            Some(bg) if bg.dimensions() == page.canvas() => bg,
            Some(bg) => bg.resized(page.canvas_width, page.canvas_height),
            None => page.default_background(),
        };

        let mut rng = self.shuffle_rng();
        let variants = assign_variants(sources.len(), &mut rng);
        let text = Arc::new(page.text.clone());

        let segments: Vec<Segment> = sources
            .into_iter()
            .zip(variants)
            .enumerate()
            .map(|(i, (source, kind))| {
                let target = page.target_size(source.media.dimensions());
                let placement = page.place(target);
                info!(
                    "Segment {}: {} animation={} image={}x{} at ({}, {})",
                    i + 1,
                    source.name,
                    kind,
                    target.0,
                    target.1,
                    placement.x,
                    placement.y
                );

                Segment {
                    index: i + 1,
                    name: source.name,
                    source: source.media.scaled_to(target.0, target.1),
                    animation: self.animation(kind),
                    placement,
                    text: Arc::clone(&text),
                    start: i as f64 * duration,
                    duration,
                    effect: content.effect.clone(),
                    seed: (i + 1) as u64,
                }
            })
            .collect();

        let total_duration = segments.last().map(Segment::end).unwrap_or(0.0);
        let fps = self.config.render.params.fps;
        // the track is cut to the frames actually encoded, not the nominal length
        let encoded_duration = frames_for(total_duration, fps) as f64 / fps;

        let audio = audio.map(|info| {
            let plan = AudioPlan::new(
                info.path,
                info.duration,
                self.config.audio.speed,
                encoded_duration,
            );
            debug!(
                "Audio plan: {:.2}s source at {}x -> {:.2}s, {} loop(s), trimmed to {:.2}s",
                plan.source_duration,
                plan.speed,
                plan.sped_duration(),
                plan.loops(),
                plan.duration()
            );
            plan
        });

        info!(
            "Timeline: {} segments, {:.2}s at {} fps, canvas {}x{}",
            segments.len(),
            total_duration,
            self.config.render.params.fps,
            page.canvas_width,
            page.canvas_height
        );

        Ok(Timeline {
            segments,
            background: Arc::new(background),
            effects: self.effects.clone(),
            fps,
            total_duration,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectRegistry;
    use crate::text::FontFace;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn fonts() -> FontSet {
        FontSet {
            title: FontFace::embedded(40.0),
            subtitle: FontFace::embedded(34.0),
            summary: FontFace::embedded(28.0),
        }
    }

    fn assembler(config: Config) -> TimelineAssembler {
        let effects =
            ParticleCompositor::new(Arc::new(EffectRegistry::new()), config.effect.max_particles);
        TimelineAssembler::new(config, fonts(), effects)
    }

    fn small_config() -> Config {
        let mut config = Config::default();
        config.render.params.resolution = (360, 640);
        config.timeline.shuffle_seed = Some(7);
        config
    }

    fn still(name: &str, w: u32, h: u32, color: [u8; 3]) -> ResolvedSource {
        ResolvedSource {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.png", name)),
            media: MediaSource::Still(RasterSurface::new_filled(w, h, color)),
        }
    }

    fn content(effect: &str) -> PageContent {
        PageContent {
            title: "A|B".to_string(),
            summary: "C".to_string(),
            effect: effect.to_string(),
        }
    }

    #[test]
    fn test_eight_sources_get_every_variant_once() {
        let variants = assign_variants(8, &mut StdRng::seed_from_u64(1));
        let distinct: HashSet<_> = variants.iter().collect();
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn test_nine_sources_repeat_exactly_one_variant() {
        for seed in 0..20 {
            let variants = assign_variants(9, &mut StdRng::seed_from_u64(seed));
            let distinct: HashSet<_> = variants.iter().collect();
            assert_eq!(distinct.len(), 8);
            assert_ne!(variants[7], variants[8], "seed {}", seed);
        }
    }

    #[test]
    fn test_adjacent_variants_always_differ() {
        for seed in 0..20 {
            let variants = assign_variants(40, &mut StdRng::seed_from_u64(seed));
            assert!(variants.windows(2).all(|w| w[0] != w[1]), "seed {}", seed);
        }
    }

    #[test]
    fn test_shuffle_seed_is_reproducible() {
        let a = assign_variants(12, &mut StdRng::seed_from_u64(99));
        let b = assign_variants(12, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_batch_fails() {
        let result = assembler(small_config()).assemble(Vec::new(), &content("none"), None, None);
        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Timeline(TimelineError::EmptyBatch { .. }))
        ));
    }

    #[test]
    fn test_unknown_effect_is_rejected_before_rendering() {
        let sources = vec![still("one", 100, 100, [255, 0, 0])];
        let result = assembler(small_config()).assemble(sources, &content("confetti"), None, None);
        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Timeline(TimelineError::InvalidParameters { .. }))
        ));
    }

    /// Pixels within a small tolerance of `color`, with their bounding box
    fn foreground(frame: &RasterSurface, color: [u8; 3]) -> (usize, Option<[u32; 4]>) {
        let mut count = 0;
        let mut bounds: Option<[u32; 4]> = None;
        for (x, y, px) in frame.as_image().enumerate_pixels() {
            if (0..3).any(|c| (px[c] as i32 - color[c] as i32).abs() > 3) {
                continue;
            }
            count += 1;
            bounds = Some(match bounds {
                None => [x, y, x, y],
                Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
            });
        }
        (count, bounds)
    }

    /// Check the first frame of a segment against its entrance variant
    fn assert_entrance_start(timeline: &Timeline, segment: &Segment, color: [u8; 3]) {
        let start = segment.render(&timeline.background, 0.0, &timeline.effects);
        let settled = timeline.preview(segment);
        let (start_count, start_bounds) = foreground(&start, color);
        let (settled_count, _) = foreground(&settled, color);
        let p = segment.placement;
        let kind = segment.animation.kind;
        assert!(settled_count > 0, "{} never shows its source", kind);

        match kind {
            AnimationKind::SlideLeft
            | AnimationKind::SlideRight
            | AnimationKind::ScrollUp
            | AnimationKind::DropBounce
            | AnimationKind::FadeIn => {
                assert_eq!(start_count, 0, "{} should start with nothing on screen", kind);
            }
            AnimationKind::ZoomIn => {
                // about 0.3 x 0.3 of the settled area, centred on the placement
                let ratio = start_count as f64 / settled_count as f64;
                assert!((0.05..0.15).contains(&ratio), "zoom-in start ratio {}", ratio);
                let [x0, y0, x1, y1] = start_bounds.unwrap();
                let cx = p.x + p.target_width as i64 / 2;
                let cy = p.y + p.target_height as i64 / 2;
                assert!((((x0 + x1) / 2) as i64 - cx).abs() <= 2);
                assert!((((y0 + y1) / 2) as i64 - cy).abs() <= 2);
                let width = (x1 - x0 + 1) as f64;
                assert!((width / p.target_width as f64 - 0.3).abs() < 0.05);
            }
            AnimationKind::ZoomOut => {
                assert!(start_count > settled_count, "zoom-out should start oversized");
            }
            AnimationKind::Unfold => {
                // a one pixel wide sliver 40% of the height
                let [x0, y0, x1, y1] = start_bounds.unwrap();
                assert!(x1 - x0 <= 1);
                let height = (y1 - y0 + 1) as f64;
                assert!((height / p.target_height as f64 - 0.4).abs() < 0.05);
            }
        }
    }

    #[test]
    fn test_every_variant_starts_from_its_own_state() {
        let colors: Vec<[u8; 3]> = (0..8).map(|i| [255, 30 * i as u8, 0]).collect();
        let sources = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| still(&format!("s{}", i), 240, 180, c))
            .collect();
        let timeline = assembler(small_config())
            .assemble(sources, &content("none"), None, None)
            .unwrap();

        let kinds: HashSet<_> = timeline.segments().iter().map(|s| s.animation.kind).collect();
        assert_eq!(kinds.len(), 8);
        for (segment, color) in timeline.segments().iter().zip(colors) {
            assert_entrance_start(&timeline, segment, color);
        }
    }

    #[test]
    fn test_three_images_end_to_end() {
        let sources = vec![
            still("one", 300, 200, [255, 0, 0]),
            still("two", 200, 300, [0, 255, 0]),
            still("three", 400, 400, [0, 0, 255]),
        ];
        let timeline = assembler(small_config())
            .assemble(sources, &content("none"), None, None)
            .unwrap();

        assert_eq!(timeline.segments().len(), 3);
        assert!((timeline.total_duration() - 8.1).abs() < 1e-9);
        assert_eq!(timeline.canvas(), (360, 640));
        assert!(timeline.audio().is_none());

        let text = &timeline.segments()[0].text;
        assert_eq!(text.title.as_ref().unwrap().line_texts(), vec!["A"]);
        assert_eq!(text.subtitle.as_ref().unwrap().line_texts(), vec!["B"]);
        assert_eq!(text.summary.as_ref().unwrap().line_texts(), vec!["C"]);

        let colors = [[255u8, 0, 0], [0, 255, 0], [0, 0, 255]];
        for (segment, color) in timeline.segments().iter().zip(colors) {
            assert_entrance_start(&timeline, segment, color);
            let settled = timeline.preview(segment);

            let p = segment.placement;
            let cx = (p.x + p.target_width as i64 / 2) as u32;
            let cy = (p.y + p.target_height as i64 / 2) as u32;
            let px = settled.get_pixel(cx, cy);
            assert_eq!(&px[..3], &color, "segment {}", segment.index);

            // main title and summary are white, the subtitle yellow
            let pixels: Vec<[u8; 4]> = settled.as_image().pixels().map(|p| p.0).collect();
            assert!(pixels.iter().any(|p| p[0] >= 250 && p[1] >= 250 && p[2] <= 20));
            assert!(pixels.iter().any(|p| p[0] >= 250 && p[1] >= 250 && p[2] >= 250));
        }
    }

    #[test]
    fn test_segment_lookup_and_frame_count() {
        let sources = vec![still("a", 50, 50, [1, 1, 1]), still("b", 50, 50, [2, 2, 2])];
        let timeline = assembler(small_config())
            .assemble(sources, &content("none"), None, None)
            .unwrap();

        let (segment, local) = timeline.segment_at(2.8);
        assert_eq!(segment.index, 2);
        assert!((local - 0.1).abs() < 1e-9);

        let (segment, _) = timeline.segment_at(100.0);
        assert_eq!(segment.index, 2);

        // 5.4s at 24 fps
        assert_eq!(timeline.frame_count(), 130);
        assert_eq!(timeline.segments()[1].seed, 2);
    }

    #[test]
    fn test_audio_plan_covers_the_video() {
        let sources = vec![still("a", 50, 50, [1, 1, 1]); 3];
        let audio = AudioInfo {
            path: PathBuf::from("bgm.wav"),
            duration: 3.0,
            sample_rate: 44100,
            channels: 2,
            format: crate::audio::AudioFormat { extension: "wav".to_string(), bit_depth: Some(16) },
        };
        let timeline = assembler(small_config())
            .assemble(sources, &content("none"), None, Some(audio))
            .unwrap();

        let plan = timeline.audio().unwrap();
        assert_eq!(plan.speed, 1.1);
        assert_eq!(plan.loops(), 3);
        // trimmed to the 194 frames actually rendered, not the nominal 8.1s
        assert_eq!(timeline.frame_count(), 194);
        assert!((plan.duration() - timeline.encoded_duration()).abs() < 1e-9);
        assert!((plan.duration() - 194.0 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_showcase_canvas_follows_sources() {
        let mut config = small_config();
        config.timeline.layout = LayoutMode::Showcase;
        let sources = vec![still("a", 121, 80, [9, 9, 9]), still("b", 60, 99, [9, 9, 9])];

        let content = PageContent { effect: "none".into(), ..Default::default() };
        let timeline = assembler(config).assemble(sources, &content, None, None).unwrap();

        assert_eq!(timeline.canvas(), (122, 100));
        let first = &timeline.segments()[0];
        assert_eq!((first.placement.target_width, first.placement.target_height), (121, 80));
        assert_eq!(timeline.background().get_pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_frames_are_pure_functions_of_time() {
        let sources = vec![still("a", 80, 60, [200, 10, 10])];
        let timeline = assembler(small_config())
            .assemble(sources, &content("sparkle"), None, None)
            .unwrap();

        assert_eq!(timeline.render_frame(5), timeline.render_frame(5));
        assert_eq!(timeline.render_at(1.0), timeline.render_at(1.0));
    }
}
