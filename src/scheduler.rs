//! Per-frame driver: inject -> propagate -> render -> present -> swap.
//!
//! The scheduler owns all simulation state (both grids, the video texture and
//! the output frame) and is advanced by an outside clock calling [`tick`]
//! once per display refresh. Pointer, theme and resize events are plain
//! method calls made between ticks on the same thread, so the injector always
//! finishes before propagation reads the grid.
//!
//! [`tick`]: FrameScheduler::tick

use crate::error::Error;
use crate::inject::inject;
use crate::refract::render;
use crate::texture::VideoTexture;
use crate::theme::ThemeConfig;
use crate::types::{Dimensions, FrameOutcome, FrameSink, InteractionPoint, SkipReason, VideoSource};
use crate::wave::WaveField;
use image::RgbaImage;
use log::{debug, info};

/// Everything sized by the current dimensions. Replaced as a whole on resize.
struct Pipeline {
    dims: Dimensions,
    field: WaveField,
    texture: VideoTexture,
    output: RgbaImage,
}

impl Pipeline {
    fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            field: WaveField::new(dims),
            texture: VideoTexture::new(dims),
            output: RgbaImage::new(dims.width as u32, dims.height as u32),
        }
    }

    /// Grids, texture and output still agree with `dims`.
    fn check(&self) -> Result<(), Error> {
        if self.field.dims() != self.dims {
            return Err(Error::DimensionMismatch { expected: self.dims.len(), actual: self.field.dims().len() });
        }
        self.field.check()?;
        let (ow, oh) = self.output.dimensions();
        if ow as usize != self.dims.width || oh as usize != self.dims.height {
            return Err(Error::DimensionMismatch { expected: self.dims.len(), actual: ow as usize * oh as usize });
        }
        Ok(())
    }
}

pub struct FrameScheduler {
    pipeline: Option<Pipeline>,
    theme: ThemeConfig,
    pointer: InteractionPoint,
    frames: u64,
}

impl FrameScheduler {
    /// Scheduler for a display of `display_w × display_h` pixels. The field
    /// runs at half that size; a zero-sized display yields a scheduler that
    /// skips frames until the first valid resize.
    pub fn new(display_w: usize, display_h: usize, theme: ThemeConfig) -> Self {
        let mut s = Self { pipeline: None, theme, pointer: InteractionPoint::inactive(), frames: 0 };
        s.on_resize(display_w, display_h);
        s
    }

    /// Recompute the field size and reallocate everything zero-filled. Old
    /// amplitude is discarded. Invalid sizes park the scheduler until the
    /// next resize.
    pub fn on_resize(&mut self, display_w: usize, display_h: usize) {
        match Dimensions::from_display(display_w, display_h) {
            Some(dims) => {
                info!("Field resized to {}x{} (display {}x{})", dims.width, dims.height, display_w, display_h);
                self.pipeline = Some(Pipeline::new(dims));
            }
            None => {
                debug!("Display {}x{} too small for a field; frames will be skipped", display_w, display_h);
                self.pipeline = None;
            }
        }
    }

    /// Latest interaction state; overwrites the previous one.
    pub fn on_pointer(&mut self, point: InteractionPoint) {
        self.pointer = point;
    }

    /// Takes effect from the next tick.
    pub fn set_theme(&mut self, theme: ThemeConfig) {
        info!("Theme: {} (damping {:.3}, shimmer {:.1})", theme.label, theme.damping, theme.shimmer);
        self.theme = theme;
    }

    /// Flatten the water (both grids to zero) without resizing.
    pub fn clear(&mut self) {
        if let Some(p) = self.pipeline.as_mut() {
            p.field.clear();
        }
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn pointer(&self) -> InteractionPoint {
        self.pointer
    }

    pub fn dims(&self) -> Option<Dimensions> {
        self.pipeline.as_ref().map(|p| p.dims)
    }

    pub fn field(&self) -> Option<&WaveField> {
        self.pipeline.as_ref().map(|p| &p.field)
    }

    /// Last rendered frame (all zeros before the first presented tick).
    pub fn output(&self) -> Option<&RgbaImage> {
        self.pipeline.as_ref().map(|p| &p.output)
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Degraded input never fails: missing dimensions or
    /// stale buffers skip the frame, a not-ready source renders over the
    /// fallback fill. Only the sink can return an error.
    pub fn tick(&mut self, source: &mut dyn VideoSource, sink: &mut dyn FrameSink) -> Result<FrameOutcome, Error> {
        let Some(p) = self.pipeline.as_mut() else {
            debug!("Frame skipped: no valid dimensions");
            return Ok(FrameOutcome::Skipped(SkipReason::NoDimensions));
        };
        if let Err(e) = p.check() {
            debug!("Frame skipped: {e}");
            return Ok(FrameOutcome::Skipped(SkipReason::StaleBuffers));
        }
        let dims = p.dims;

        // 1) camera -> texture (or fallback fill)
        p.texture.refresh(source, dims);

        // 2) splash, then 3) propagate into the previous grid
        inject(p.field.current_mut(), &self.pointer, dims);
        let next = match p.field.step(self.theme.damping) {
            Ok(next) => next,
            Err(e) => {
                debug!("Frame skipped: {e}");
                return Ok(FrameOutcome::Skipped(SkipReason::StaleBuffers));
            }
        };

        // 4) refract + tint
        if let Err(e) = render(next, p.texture.image(), &self.theme, dims, &mut p.output) {
            debug!("Frame skipped: {e}");
            return Ok(FrameOutcome::Skipped(SkipReason::StaleBuffers));
        }

        // 5) present, 6) swap roles for the next frame
        let presented = sink.present(&p.output);
        p.field.swap();
        presented?;
        self.frames += 1;
        Ok(FrameOutcome::Presented)
    }
}
