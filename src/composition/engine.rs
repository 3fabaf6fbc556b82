use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    audio::{AudioInfo, AudioLoader},
    composition::timeline::{PageContent, Timeline, TimelineAssembler},
    config::Config,
    effects::{EffectRegistry, ParticleCompositor},
    error::{CompositorError, Result, TimelineError},
    text::FontSet,
    video::{EncodedVideo, FileSourceResolver, FrameEncoder, RasterSurface, SourceResolver},
};

/// Where a render request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    CollectingSources,
    BuildingSegments,
    RenderingFrames,
    Encoding,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectingSources => "collecting sources",
            Self::BuildingSegments => "building segments",
            Self::RenderingFrames => "rendering frames",
            Self::Encoding => "encoding",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One video to produce
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Images or frame directories, one segment each, in order
    pub sources: Vec<PathBuf>,
    pub content: PageContent,
    pub audio: Option<PathBuf>,
    pub output: PathBuf,
}

/// What a finished request produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub video: EncodedVideo,
    pub previews: Vec<PathBuf>,
    pub segments: usize,
}

/// Main composition engine that drives a request through the pipeline
///
/// The stages run strictly in order:
/// 1. Collecting sources - resolve references, skipping unreadable ones
/// 2. Building segments - probe audio, load the background, lay out the timeline
/// 3. Rendering frames - render in parallel, hand frames to the encoder in order
/// 4. Encoding - mux the frame sequence with the planned audio
pub struct CompositionEngine {
    config: Config,
    resolver: Arc<dyn SourceResolver>,
    effects: ParticleCompositor,
    stage: PipelineStage,
    cancelled: Arc<AtomicBool>,
}

impl CompositionEngine {
    /// Create an engine reading sources from disk
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let resolver = Arc::new(FileSourceResolver::new(config.timeline.frame_sequence_fps));
        let effects =
            ParticleCompositor::new(Arc::new(EffectRegistry::new()), config.effect.max_particles);

        Ok(Self {
            config,
            resolver,
            effects,
            stage: PipelineStage::CollectingSources,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Swap the source resolver, e.g. for sources that do not live on disk
    pub fn with_resolver(mut self, resolver: Arc<dyn SourceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Flag that stops frame submission when set
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the whole pipeline for one request
    pub async fn compose(&mut self, request: &RenderRequest) -> Result<RenderSummary> {
        info!("🎬 Starting Reel-Compositor composition");
        info!("   Sources: {}", request.sources.len());
        info!("   Audio: {:?}", request.audio);
        info!("   Output: {:?}", request.output);
        info!("   Effect: {}", request.content.effect);

        let result = self.run(request).await;
        match &result {
            Ok(summary) => {
                self.stage = PipelineStage::Done;
                info!("🎉 Composition complete! Output saved to: {:?}", summary.video.path);
            }
            Err(e) => {
                warn!("Composition failed during {}: {}", self.stage, e);
                self.stage = PipelineStage::Failed;
            }
        }
        result
    }

    async fn run(&mut self, request: &RenderRequest) -> Result<RenderSummary> {
        let timeline = self.build_timeline(request).await?;

        let previews = if self.config.render.preview_frames {
            let dir = match request.output.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            self.save_previews(&timeline, &dir)?
        } else {
            Vec::new()
        };

        let mut encoder =
            FrameEncoder::new(self.config.render.params.clone(), self.config.audio.codec.clone());
        self.render_frames(&timeline, |_, frame| encoder.write_frame(&frame))?;

        self.stage = PipelineStage::Encoding;
        info!("📼 Step 4: Encoding video...");
        let video = encoder.finish(&request.output, timeline.audio()).await?;

        info!("   ✅ Output generation complete:");
        info!("      Duration: {:.1}s", video.duration);
        info!("      Frame count: {}", video.frame_count);
        info!("      File size: {:.1} MB", video.file_size as f64 / 1024.0 / 1024.0);

        Ok(RenderSummary {
            video,
            previews,
            segments: timeline.segments().len(),
        })
    }

    // ==========================================
    // STAGES 1-2: SOURCES AND SEGMENTS
    // ==========================================

    /// Resolve sources and lay out the timeline
    ///
    /// Fails with `EmptyBatch` when none of the requested sources load.
    pub async fn build_timeline(&mut self, request: &RenderRequest) -> Result<Timeline> {
        let result = self.collect_and_assemble(request).await;
        if result.is_err() {
            self.stage = PipelineStage::Failed;
        }
        result
    }

    async fn collect_and_assemble(&mut self, request: &RenderRequest) -> Result<Timeline> {
        self.stage = PipelineStage::CollectingSources;
        info!("📂 Step 1: Collecting sources...");

        let resolver = Arc::clone(&self.resolver);
        let references = request.sources.clone();
        let sources = tokio::task::spawn_blocking(move || resolver.resolve_all(&references))
            .await
            .map_err(|e| CompositorError::generic(format!("source loading task failed: {}", e)))?;

        if sources.is_empty() {
            return Err(TimelineError::EmptyBatch {
                requested: request.sources.len(),
            }
            .into());
        }
        info!("   ✅ {} of {} sources usable", sources.len(), request.sources.len());

        self.stage = PipelineStage::BuildingSegments;
        info!("🧩 Step 2: Building segments...");

        let audio = match &request.audio {
            Some(path) => self.probe_audio(path).await,
            None => None,
        };
        let background = self.load_background();
        let fonts = FontSet::load(&self.config.text);

        let assembler = TimelineAssembler::new(self.config.clone(), fonts, self.effects.clone());
        assembler.assemble(sources, &request.content, background, audio)
    }

    /// A broken audio reference drops the soundtrack, not the video
    async fn probe_audio(&self, path: &Path) -> Option<AudioInfo> {
        match AudioLoader::probe(path).await {
            Ok(info) => {
                info!(
                    "   Audio: {:.1}s, {} Hz, {} channels",
                    info.duration, info.sample_rate, info.channels
                );
                Some(info)
            }
            Err(e) => {
                warn!("Continuing without audio: {}", e);
                None
            }
        }
    }

    fn load_background(&self) -> Option<RasterSurface> {
        let path = self.config.render.background.as_ref()?;
        match image::open(path) {
            Ok(image) => {
                debug!("Loaded background template {:?}", path);
                Some(RasterSurface::new(image.to_rgba8()))
            }
            Err(e) => {
                warn!("Background {:?} unusable ({}); using the default", path, e);
                None
            }
        }
    }

    // ==========================================
    // STAGE 3: FRAME RENDERING
    // ==========================================

    /// Render every frame of the timeline and hand them to `sink` in order
    ///
    /// Frames are rendered in parallel batches on a dedicated pool; the sink
    /// always sees them sequentially. Returns the number of frames submitted.
    pub fn render_frames<F>(&mut self, timeline: &Timeline, mut sink: F) -> Result<usize>
    where
        F: FnMut(usize, RasterSurface) -> Result<()>,
    {
        self.stage = PipelineStage::RenderingFrames;
        let total = timeline.frame_count();
        let threads = self.config.render.processing_threads.max(1);
        info!("🎨 Step 3: Rendering {} frames on {} threads...", total, threads);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| CompositorError::generic(format!("failed to build render pool: {}", e)))?;

        let batch = threads * 4;
        let mut submitted = 0;

        while submitted < total {
            if self.cancelled.load(Ordering::Relaxed) {
                warn!("Rendering cancelled after {} of {} frames", submitted, total);
                self.stage = PipelineStage::Failed;
                return Err(CompositorError::generic("rendering cancelled"));
            }

            let end = (submitted + batch).min(total);
            let frames: Vec<RasterSurface> = pool.install(|| {
                (submitted..end)
                    .into_par_iter()
                    .map(|index| timeline.render_frame(index))
                    .collect()
            });

            for (offset, frame) in frames.into_iter().enumerate() {
                if let Err(e) = sink(submitted + offset, frame) {
                    self.stage = PipelineStage::Failed;
                    return Err(e);
                }
            }
            submitted = end;
            debug!("Rendered {}/{} frames", submitted, total);
        }

        info!("   ✅ {} frames rendered", submitted);
        Ok(submitted)
    }

    /// Save one settled frame per segment as `preview_NN.png` in `dir`
    pub fn save_previews(&self, timeline: &Timeline, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let previews: Vec<PathBuf> = timeline
            .segments()
            .par_iter()
            .map(|segment| -> Result<PathBuf> {
                let path = dir.join(format!("preview_{:02}.png", segment.index));
                timeline.preview(segment).save_png(&path)?;
                Ok(path)
            })
            .collect::<Result<_>>()?;

        info!("   🖼️  Saved {} preview frames to {:?}", previews.len(), dir);
        Ok(previews)
    }
}
